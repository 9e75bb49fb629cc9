use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn unprocessable(why: impl Into<String>) -> Self {
        Error::Unprocessable(why.into())
    }

    /// Status code sent to the client for this error.
    pub fn code(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::NotFound(_) => 404,
            Error::MethodNotAllowed => 405,
            Error::Unprocessable(_) => 422,
            Error::Internal(_) => 500,
        }
    }

    /// Client-facing message. Details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "bad request",
            Error::NotFound(_) => "resource not found",
            Error::MethodNotAllowed => "method not allowed",
            Error::Unprocessable(_) => "unprocessable",
            Error::Internal(_) => "Internal server error",
        }
    }
}

// read paths: a failing store is an internal fault, mutations map their own failures
impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        Error::Internal(error.into())
    }
}

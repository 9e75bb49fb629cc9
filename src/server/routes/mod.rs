mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{error::Error, trivia::page_number};

pub type ApiResponse<T> = Result<T, Error>;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match &self {
            Error::Internal(err) => tracing::error!("Internal error: {err:#}"),
            other => tracing::info!("Request failed: {other}"),
        }
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub fn number(&self) -> usize {
        page_number(self.page.as_deref())
    }
}

pub async fn not_found() -> Error {
    Error::not_found("no such route")
}

pub async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

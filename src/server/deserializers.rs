use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

// the frontend sends ids both as numbers and as numeric strings ("1" from <select> values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct LooseI64(pub i64);

impl TryFrom<Value> for LooseI64 {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match &value {
            Value::Number(number) => number
                .as_i64()
                .map(LooseI64)
                .ok_or_else(|| format!("Wrong value {value}, can not convert to i64")),
            Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(LooseI64)
                .map_err(|_| format!("Wrong value {value}, can not parse to i64")),
            _ => Err(format!("Wrong value {value}, expected an integer")),
        }
    }
}

/// Category reference as sent by the quiz screen: a bare id or `{"type": ..., "id": ...}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(LooseI64),
    Object { id: LooseI64 },
}

impl CategoryRef {
    pub fn id(&self) -> i64 {
        match self {
            CategoryRef::Id(id) | CategoryRef::Object { id } => id.0,
        }
    }
}

/// Missing, non-JSON or wrongly typed bodies are a bad request.
pub fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, Error> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(Error::BadRequest(rejection.body_text())),
    }
}

/// Like [`json_body`], but an empty object or a non-object is also rejected.
pub fn non_empty_object(body: Result<Json<Value>, JsonRejection>) -> Result<Value, Error> {
    let value = json_body(body)?;
    match value.as_object() {
        Some(map) if !map.is_empty() => Ok(value),
        _ => Err(Error::BadRequest("expected a non-empty JSON object".to_owned())),
    }
}

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::error::EngineError;

/// Body returned by every endpoint that reports success or failure without a payload.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Status {
    pub code: String,
    pub message: String,
}

pub fn new_status(code: &str, message: impl Into<String>) -> Json<Status> {
    Json(Status {
        code: code.to_string(),
        message: message.into(),
    })
}

pub fn error_status(error: &EngineError) -> Json<Status> {
    new_status(error.code(), error.to_string())
}

pub fn success_status(message: impl Into<String>) -> Json<Status> {
    new_status("success", message)
}

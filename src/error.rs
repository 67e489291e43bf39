use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::students::{repo::StoreError, repo_types::ConflictField, validate::ValidationErrors};

pub const ALREADY_REGISTERED: &str = "User already registered!";
pub const INVALID_SUBMISSION: &str = "Invalid submission";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Outcome of a failed request. Each variant owns its own status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid submission")]
    Validation(ValidationErrors),

    #[error("User already registered!")]
    Conflict(Option<ConflictField>),

    #[error("store failure: {0}")]
    Store(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => AppError::Conflict(field),
            StoreError::Backend(err) => AppError::Store(err),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(fields) => json!({ "error": INVALID_SUBMISSION, "fields": fields }),
            AppError::Conflict(_) => json!({ "error": ALREADY_REGISTERED }),
            // Store details stay in the logs.
            AppError::Store(_) => json!({ "error": INTERNAL_ERROR }),
        };
        (status, Json(body)).into_response()
    }
}

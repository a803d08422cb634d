//! HTTP error taxonomy and its mapping to status codes.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::SwotError;

/// Message returned for failures whose detail stays in the server log.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid input
    #[error("{0}")]
    Validation(String),

    /// No document with the requested id
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Anything else, including database failures
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn required(field: &str) -> Self {
        ApiError::Validation(format!("{} is required", field))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref detail) = self {
            tracing::error!(error = %detail, "request failed");
        }
        let body = Json(json!({ "message": self.public_message() }));
        (self.status_code(), body).into_response()
    }
}

impl From<SwotError> for ApiError {
    fn from(err: SwotError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

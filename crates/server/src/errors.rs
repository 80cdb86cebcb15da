use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use service::auth::errors::AuthError;
use service::errors::{ServiceError, StoreError};
use service::validation::{FieldViolation, ValidationFailure};

/// JSON error body returned by every handler.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, error: error.into(), detail, fields: Vec::new() }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", None)
    }

    fn validation(v: ValidationFailure) -> Self {
        let mut e = Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(v.to_string()));
        e.fields = v.violations().to_vec();
        e
    }

    /// Backend details go to the log only.
    fn internal(source: &dyn std::fmt::Display) -> Self {
        error!(error = %source, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
    }

    fn storage(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            other => Self::internal(&other),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        warn!(error = %r.body_text(), "rejected request body");
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(r.body_text()))
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(v) => Self::validation(v),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            AuthError::Unauthorized => Self::unauthorized(),
            AuthError::Storage(s) => Self::storage(s),
            AuthError::HashError(_) | AuthError::TokenError(_) => Self::internal(&e),
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => Self::validation(v),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Storage(s) => Self::storage(s),
        }
    }
}

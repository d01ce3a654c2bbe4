//! API error handling
//!
//! Every error leaves the service as `{ "error": kind, "message": text }`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::CoreError;
use domain_policy::PolicyError;
use domain_subscriber::SubscriberError;

use crate::auth::AuthError;

/// Message returned when a quote hits a corrupt stored component
pub const QUOTE_SUPPORT_MESSAGE: &str = "Something went wrong, please contact support";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    /// Maps a failure from the quote endpoint
    ///
    /// Quotes answer a missing policy and an incomplete component set with
    /// their own messages, and hide corrupt stored components behind a
    /// support message.
    pub fn from_quote(err: PolicyError) -> Self {
        match err {
            PolicyError::NotFound(_) => {
                ApiError::NotFound("Policy not found, cannot request quote".to_string())
            }
            PolicyError::InvalidComponentValue { .. } => {
                error!(error = %err, "Corrupt component data encountered during quote");
                ApiError::BadRequest(QUOTE_SUPPORT_MESSAGE.to_string())
            }
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PolicyError::DuplicateIdentifier(_) => ApiError::Conflict(err.to_string()),
            PolicyError::InvalidSequence(_)
            | PolicyError::InvalidComponentValue { .. }
            | PolicyError::InvalidPolicy(_)
            | PolicyError::UnknownOperation(_) => ApiError::Validation(err.to_string()),
            PolicyError::IncompleteComponentSet { .. } => {
                ApiError::NotFound("Cannot calculate quote for this policy".to_string())
            }
            PolicyError::InvalidMarketValue(msg) => ApiError::BadRequest(msg),
            PolicyError::NoEffectiveChange => {
                ApiError::BadRequest("Policy update failed: nothing was changed".to_string())
            }
            PolicyError::Unexpected(source) => {
                error!(error = %source, "Policy storage failure");
                ApiError::Internal("An unexpected error occurred".to_string())
            }
        }
    }
}

impl From<SubscriberError> for ApiError {
    fn from(err: SubscriberError) -> Self {
        match err {
            SubscriberError::EmailTaken(_) => ApiError::Conflict(err.to_string()),
            SubscriberError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            SubscriberError::Validation(msg) => ApiError::Validation(msg),
            SubscriberError::Hashing(_) | SubscriberError::Unexpected(_) => {
                error!(error = %err, "Subscriber operation failed");
                ApiError::Internal("An unexpected error occurred".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation(_) => {
                error!(error = %err, "Token creation failed");
                ApiError::Internal("An unexpected error occurred".to_string())
            }
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::MissingToken => {
                ApiError::Unauthorized(err.to_string())
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ApiError::Validation(msg),
            CoreError::Configuration(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

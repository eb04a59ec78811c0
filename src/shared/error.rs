//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a request failed authentication.
///
/// Serialized into the `reason` field of 401 responses so clients can tell
/// a missing token apart from an expired one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingToken,
    MalformedHeader,
    TokenExpired,
    InvalidToken,
    InvalidCredentials,
}

impl AuthFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingToken => "token_missing",
            Self::MalformedHeader => "token_malformed",
            Self::TokenExpired => "token_expired",
            Self::InvalidToken => "token_invalid",
            Self::InvalidCredentials => "invalid_credentials",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Authentication credentials were not provided",
            Self::MalformedHeader => "Invalid authorization header format",
            Self::TokenExpired => "Token expired",
            Self::InvalidToken => "Token is invalid",
            Self::InvalidCredentials => "No active account found with the given credentials",
        }
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(AuthFailure),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {}", summarize(.0))]
    Validation(Vec<FieldError>),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into())
}

impl AppError {
    /// Validation error on a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    /// Map a unique-constraint violation to `Conflict`, pass anything else through.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(message.to_string())
            }
            _ => AppError::Database(err),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::NotFound(msg) => ErrorResponse {
                code: 10001,
                message: msg,
                reason: None,
                errors: None,
            },
            AppError::BadRequest(msg) => ErrorResponse {
                code: 10002,
                message: msg,
                reason: None,
                errors: None,
            },
            AppError::Unauthorized(failure) => ErrorResponse {
                code: 10003,
                message: failure.message().into(),
                reason: Some(failure.reason()),
                errors: None,
            },
            AppError::Conflict(msg) => ErrorResponse {
                code: 10005,
                message: msg,
                reason: None,
                errors: None,
            },
            AppError::Validation(errors) => ErrorResponse {
                code: 10007,
                message: summarize(&errors),
                reason: None,
                errors: Some(errors),
            },
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse {
                    code: 10000,
                    message: "Internal server error".into(),
                    reason: None,
                    errors: None,
                }
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ErrorResponse {
                    code: 10000,
                    message: "Internal server error".into(),
                    reason: None,
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AppError::NotFound("x".into()), StatusCode::NOT_FOUND; "not found")]
    #[test_case(AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST; "bad request")]
    #[test_case(AppError::field("email", "taken"), StatusCode::BAD_REQUEST; "validation")]
    #[test_case(AppError::Conflict("x".into()), StatusCode::CONFLICT; "conflict")]
    #[test_case(AppError::Unauthorized(AuthFailure::TokenExpired), StatusCode::UNAUTHORIZED; "unauthorized")]
    #[test_case(AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR; "internal")]
    fn status_codes(error: AppError, expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn auth_failures_have_distinct_reasons() {
        let reasons = [
            AuthFailure::MissingToken,
            AuthFailure::MalformedHeader,
            AuthFailure::TokenExpired,
            AuthFailure::InvalidToken,
            AuthFailure::InvalidCredentials,
        ]
        .map(|f| f.reason());

        for (i, a) in reasons.iter().enumerate() {
            for b in &reasons[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn validation_message_uses_first_field() {
        let err = AppError::Validation(vec![
            FieldError::new("name", "This field is required."),
            FieldError::new("email", "Enter a valid email address."),
        ]);
        assert_eq!(err.to_string(), "Validation error: name: This field is required.");
    }

    #[test]
    fn non_database_sqlx_errors_are_not_conflicts() {
        let err = AppError::conflict_on_unique(sqlx::Error::RowNotFound, "dup");
        assert!(matches!(err, AppError::Database(_)));
    }
}

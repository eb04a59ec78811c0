//! Custom Extractors
//!
//! Axum extractors for request parsing.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::shared::error::{AppError, FieldError};
use crate::shared::validation::validation_error;

/// JSON extractor that validates the deserialized value automatically.
///
/// Syntax errors land on `non_field_errors`. Missing or mistyped fields and
/// failed `validator` rules become 400 responses naming the field.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

const NON_FIELD_ERRORS: &str = "non_field_errors";

fn body_error(rejection: JsonRejection) -> AppError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        _ => rejection.body_text(),
    };
    AppError::Validation(vec![FieldError::new(NON_FIELD_ERRORS, message)])
}

/// Map a deserialization failure onto the field it happened at.
///
/// A missing field is reported at `parent.field`; a mistyped value at its
/// own path, e.g. `items[1].quantity`.
fn data_error(err: serde_path_to_error::Error<serde_json::Error>) -> AppError {
    let path = err.path();
    let parent = path.iter().next().is_some().then(|| path.to_string());
    let message = err.inner().to_string();

    let field_error = match missing_field(&message) {
        Some(name) => FieldError::new(
            match parent {
                Some(parent) => format!("{}.{}", parent, name),
                None => name.to_string(),
            },
            "This field is required.",
        ),
        None => FieldError::new(
            parent.unwrap_or_else(|| NON_FIELD_ERRORS.to_string()),
            format!("Invalid value: {}", message),
        ),
    };

    AppError::Validation(vec![field_error])
}

fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'))
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(body_error)?;
        let value: T = serde_path_to_error::deserialize(raw).map_err(data_error)?;
        value.validate().map_err(validation_error)?;
        Ok(ValidatedJson(value))
    }
}

/// Numeric `{id}` path segment; anything else is a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.parse::<i64>()
            .map(ResourceId)
            .map_err(|_| AppError::BadRequest(format!("Invalid id \"{}\"", raw)))
    }
}

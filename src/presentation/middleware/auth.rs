//! Authentication Middleware
//!
//! JWT validation middleware for protected routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::application::services::decode_access_token;
use crate::infrastructure::metrics;
use crate::shared::error::{AppError, AuthFailure};
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

fn reject(failure: AuthFailure) -> AppError {
    metrics::record_auth_failure(failure.reason());
    AppError::Unauthorized(failure)
}

/// Pull the bearer token out of the `Authorization` header.
fn bearer_token(request: &Request) -> Result<String, AppError> {
    match request.headers().typed_try_get::<Authorization<Bearer>>() {
        Ok(Some(Authorization(bearer))) => Ok(bearer.token().to_string()),
        Ok(None) => Err(reject(AuthFailure::MissingToken)),
        Err(_) => Err(reject(AuthFailure::MalformedHeader)),
    }
}

/// Authentication middleware that validates JWT access tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;

    let claims = decode_access_token(&token, &state.settings.jwt.secret)?;
    let user_id = claims.user_id()?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

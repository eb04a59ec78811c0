//! Authentication Handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::dto::request::{RefreshTokenRequest, TokenRequest};
use crate::application::dto::response::TokenResponse;
use crate::application::services::{AuthService, AuthServiceImpl};
use crate::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> AuthServiceImpl<PgUserRepository, PgSessionRepository> {
    AuthServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgSessionRepository::new(state.db.clone())),
        state.settings.jwt.clone(),
    )
}

/// Exchange username and password for an access/refresh pair
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = auth_service(&state)
        .authenticate(&body.username, &body.password)
        .await?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Rotate a refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = auth_service(&state).refresh_token(&body.refresh).await?;

    Ok(Json(TokenResponse::from(tokens)))
}

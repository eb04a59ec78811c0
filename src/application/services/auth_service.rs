//! Authentication Service
//!
//! Handles credential checks, JWT access tokens, and refresh-token rotation.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::JwtSettings;
use crate::domain::{Session, SessionRepository, User, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::{AppError, AuthFailure};

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange username and password for a token pair
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError>;

    /// Exchange a refresh token for a new pair; the old refresh token stops working
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;

    /// Create the account if no user has this username yet
    async fn ensure_user(&self, username: &str, password: &str) -> Result<User, AuthError>;
}

/// Issued token pair
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl AuthError {
    fn failure(&self) -> Option<AuthFailure> {
        match self {
            AuthError::InvalidCredentials => Some(AuthFailure::InvalidCredentials),
            AuthError::TokenExpired => Some(AuthFailure::TokenExpired),
            AuthError::InvalidToken => Some(AuthFailure::InvalidToken),
            AuthError::Internal(_) | AuthError::Storage(_) => None,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if let Some(failure) = err.failure() {
            metrics::record_auth_failure(failure.reason());
            return AppError::Unauthorized(failure);
        }
        match err {
            AuthError::Storage(e) => e,
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Sign an access token for `user_id`, returning the token and its lifetime in seconds.
pub fn issue_access_token(user_id: i64, settings: &JwtSettings) -> Result<(String, i64), AuthError> {
    let now = Utc::now();
    let lifetime = Duration::minutes(settings.access_token_expiry_minutes);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

    Ok((token, lifetime.num_seconds()))
}

/// Decode and validate an access token signed with `secret`.
///
/// `exp` is enforced with no leeway.
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Hash refresh token for storage
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// AuthService implementation
pub struct AuthServiceImpl<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    jwt_settings: JwtSettings,
}

impl<U, S> AuthServiceImpl<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            session_repo,
            jwt_settings,
        }
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: i64) -> Result<AuthTokens, AuthError> {
        let (access_token, expires_in) = issue_access_token(user_id, &self.jwt_settings)?;

        // Opaque refresh token, no user data inside
        let refresh_token = format!("{}.{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_in,
            token_type: "Bearer".to_string(),
        })
    }

    fn refresh_expiry(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::days(self.jwt_settings.refresh_token_expiry_days)
    }
}

#[async_trait]
impl<U, S> AuthService for AuthServiceImpl<U, S>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.generate_tokens(user.id)?;

        let session = Session::new(
            user.id,
            hash_refresh_token(&tokens.refresh_token),
            self.refresh_expiry(),
        );
        self.session_repo.create(&session).await?;

        tracing::info!(user_id = user.id, "Issued token pair");
        Ok(tokens)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let session = self
            .session_repo
            .find_by_token_hash(&hash_refresh_token(refresh_token))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if session.is_expired() {
            self.session_repo.revoke(session.id).await?;
            return Err(AuthError::TokenExpired);
        }

        if self.user_repo.find_by_id(session.user_id).await?.is_none() {
            return Err(AuthError::InvalidToken);
        }

        let tokens = self.generate_tokens(session.user_id)?;

        // Rotation: the presented token no longer matches any session
        self.session_repo
            .rotate(
                session.id,
                &hash_refresh_token(&tokens.refresh_token),
                self.refresh_expiry(),
            )
            .await?;

        Ok(tokens)
    }

    async fn ensure_user(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if let Some(existing) = self.user_repo.find_by_username(username).await? {
            return Ok(existing);
        }

        let password_hash = hash_password(password)?;
        let user = self.user_repo.create(username, &password_hash).await?;

        tracing::info!(user_id = user.id, username = %user.username, "Created bootstrap user");
        Ok(user)
    }
}

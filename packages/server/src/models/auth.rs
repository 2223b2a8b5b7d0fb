use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_email, validate_password};
use crate::entity::user;
use crate::error::AppError;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "papa@example.com")]
    pub email: String,
    /// Optional unique username (3-50 chars, letters/digits/underscores).
    #[schema(example = "papa_aventurier")]
    pub username: Option<String>,
    /// Password (8-128 characters).
    #[schema(example = "TestPass123!")]
    pub password: String,
    /// Must match `password`.
    #[schema(example = "TestPass123!")]
    pub confirm_password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_email(&payload.email)?;
    if let Some(ref username) = payload.username {
        let username = username.trim();
        if username.chars().count() < 3 || username.chars().count() > 50 {
            return Err(AppError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::Validation(
                "Username must contain only letters, digits, and underscores".into(),
            ));
        }
    }
    validate_password(&payload.password)?;
    if payload.password != payload.confirm_password {
        return Err(AppError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "papa@example.com")]
    pub email: String,
    #[schema(example = "TestPass123!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// OAuth authorization-code exchange request.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct OAuthRequest {
    /// Authorization code returned by the provider.
    pub code: String,
    /// Redirect URI used in the authorization request.
    pub redirect_uri: String,
}

pub fn validate_oauth_request(payload: &OAuthRequest) -> Result<(), AppError> {
    if payload.code.trim().is_empty() {
        return Err(AppError::Validation(
            "Authorization code must not be empty".into(),
        ));
    }
    if payload.redirect_uri.trim().is_empty() {
        return Err(AppError::Validation("Redirect URI must not be empty".into()));
    }
    Ok(())
}

/// Token refresh request.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response returned by all token-issuing endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(example = "papa@example.com")]
    pub email: String,
    #[schema(example = "papa_aventurier")]
    pub username: Option<String>,
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    #[schema(example = 1800)]
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Current authenticated account, without credentials.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub user_id: i32,
    pub email: String,
    pub username: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub oauth_provider: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for MeResponse {
    fn from(u: user::Model) -> Self {
        Self {
            user_id: u.id,
            email: u.email,
            username: u.username,
            is_active: u.is_active,
            is_verified: u.is_verified,
            oauth_provider: u.oauth_provider,
            created_at: u.created_at,
            last_login_at: u.last_login_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LogoutResponse {
    #[schema(example = "Logged out successfully")]
    pub message: &'static str,
}

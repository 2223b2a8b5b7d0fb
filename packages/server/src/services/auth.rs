use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::config::AuthConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::TokenResponse;
use crate::utils::{hash, jwt, oauth::OAuthIdentity};

/// Account creation, credential checks, and token issuance.
pub struct AuthService<'a, C: ConnectionTrait> {
    conn: &'a C,
    auth: &'a AuthConfig,
}

impl<'a, C: ConnectionTrait> AuthService<'a, C> {
    pub fn new(conn: &'a C, auth: &'a AuthConfig) -> Self {
        Self { conn, auth }
    }

    /// Create a local account. Duplicate email surfaces as `EmailRegistered`
    /// even under concurrent registration, via the unique constraint.
    pub async fn register(
        &self,
        email: &str,
        username: Option<&str>,
        password: &str,
    ) -> Result<user::Model, AppError> {
        let email = email.trim().to_lowercase();
        let username = username.map(|u| u.trim().to_string());

        if let Some(ref username) = username {
            let taken = user::Entity::find()
                .filter(user::Column::Username.eq(username))
                .one(self.conn)
                .await?
                .is_some();
            if taken {
                return Err(AppError::Validation("Username is already taken".into()));
            }
        }

        let password_hash = hash::hash_password(password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

        let now = Utc::now();
        let new_user = user::ActiveModel {
            email: Set(email),
            username: Set(username),
            password_hash: Set(Some(password_hash)),
            oauth_provider: Set(None),
            oauth_subject: Set(None),
            is_active: Set(true),
            // Email verification is a later step; local accounts start unverified.
            is_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(Some(now)),
            ..Default::default()
        };

        new_user.insert(self.conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailRegistered,
            _ => AppError::from(e),
        })
    }

    /// Check credentials and stamp the login time.
    pub async fn login(&self, email: &str, password: &str) -> Result<user::Model, AppError> {
        let email = email.trim().to_lowercase();
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(&email))
            .one(self.conn)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // OAuth-only accounts have no password to check.
        let stored = user
            .password_hash
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;

        let valid = hash::verify_password(password, stored)
            .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        self.touch_login(user).await
    }

    /// Link or create an account from a verified OAuth identity.
    pub async fn oauth_login(
        &self,
        provider: &str,
        identity: &OAuthIdentity,
    ) -> Result<user::Model, AppError> {
        let email = identity.email.trim().to_lowercase();
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(&email))
            .one(self.conn)
            .await?;

        match existing {
            Some(user) => {
                if !user.is_active {
                    return Err(AppError::AccountDisabled);
                }
                let mut active: user::ActiveModel = user.into();
                active.oauth_provider = Set(Some(provider.to_string()));
                active.oauth_subject = Set(Some(identity.subject.clone()));
                active.last_login_at = Set(Some(Utc::now()));
                active.updated_at = Set(Utc::now());
                Ok(active.update(self.conn).await?)
            }
            None => {
                let now = Utc::now();
                let new_user = user::ActiveModel {
                    email: Set(email),
                    username: Set(None),
                    password_hash: Set(None),
                    oauth_provider: Set(Some(provider.to_string())),
                    oauth_subject: Set(Some(identity.subject.clone())),
                    is_active: Set(true),
                    // The provider already verified the address.
                    is_verified: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    last_login_at: Set(Some(now)),
                    ..Default::default()
                };
                new_user.insert(self.conn).await.map_err(|e| match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailRegistered,
                    _ => AppError::from(e),
                })
            }
        }
    }

    /// Validate a refresh token and reload its user.
    pub async fn refresh(&self, refresh_token: &str) -> Result<user::Model, AppError> {
        let claims = jwt::verify(refresh_token, &self.auth.secret_key)
            .map_err(|_| AppError::TokenInvalid)?;
        if claims.token_type != jwt::REFRESH {
            return Err(AppError::TokenInvalid);
        }
        let user_id = claims.user_id().map_err(|_| AppError::TokenInvalid)?;

        let user = user::Entity::find_by_id(user_id)
            .one(self.conn)
            .await?
            .ok_or(AppError::TokenInvalid)?;
        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }
        Ok(user)
    }

    /// Issue the access/refresh token pair for a user.
    pub fn token_response(&self, user: user::Model) -> Result<TokenResponse, AppError> {
        let access = jwt::sign_access(
            user.id,
            &self.auth.secret_key,
            self.auth.access_token_ttl_minutes,
        )
        .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;
        let refresh = jwt::sign_refresh(
            user.id,
            &self.auth.secret_key,
            self.auth.refresh_token_ttl_days,
        )
        .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

        Ok(TokenResponse {
            user_id: user.id,
            email: user.email,
            username: user.username,
            access_token: access,
            token_type: "bearer",
            expires_in: self.auth.access_token_ttl_minutes * 60,
            refresh_token: refresh,
        })
    }

    async fn touch_login(&self, user: user::Model) -> Result<user::Model, AppError> {
        let mut active: user::ActiveModel = user.into();
        active.last_login_at = Set(Some(Utc::now()));
        Ok(active.update(self.conn).await?)
    }
}

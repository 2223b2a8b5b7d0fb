use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sea_orm::EntityTrait;

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. Only access-type
/// tokens pass; the backing user row is loaded so deactivated accounts are
/// rejected on every request, not just at login.
pub struct AuthUser {
    pub user: user::Model,
}

impl AuthUser {
    pub fn user_id(&self) -> i32 {
        self.user.id
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.secret_key)
            .map_err(|_| AppError::TokenInvalid)?;
        if claims.token_type != jwt::ACCESS {
            return Err(AppError::TokenInvalid);
        }
        let user_id = claims.user_id().map_err(|_| AppError::TokenInvalid)?;

        let user = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        Ok(AuthUser { user })
    }
}

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entity::{user, user_profile};
use crate::error::AppError;
use crate::models::profile::{CreateProfileRequest, UpdateAccountRequest, UpdateProfileRequest};

/// Account and profile reads/writes.
pub struct UserService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_user(&self, user_id: i32) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(user_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub async fn find_profile(&self, user_id: i32) -> Result<Option<user_profile::Model>, AppError> {
        Ok(user_profile::Entity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .one(self.conn)
            .await?)
    }

    pub async fn update_account(
        &self,
        user: user::Model,
        payload: UpdateAccountRequest,
    ) -> Result<user::Model, AppError> {
        if payload.username.is_none() {
            return Ok(user);
        }

        if let Some(ref username) = payload.username {
            let username = username.trim();
            let taken = user::Entity::find()
                .filter(user::Column::Username.eq(username))
                .filter(user::Column::Id.ne(user.id))
                .one(self.conn)
                .await?
                .is_some();
            if taken {
                return Err(AppError::Validation("Username is already taken".into()));
            }
        }

        let mut active: user::ActiveModel = user.into();
        active.username = Set(payload.username.map(|u| u.trim().to_string()));
        active.updated_at = Set(Utc::now());
        Ok(active.update(self.conn).await?)
    }

    /// Create the user's profile. At most one per user.
    pub async fn create_profile(
        &self,
        user_id: i32,
        payload: CreateProfileRequest,
    ) -> Result<user_profile::Model, AppError> {
        if self.find_profile(user_id).await?.is_some() {
            return Err(AppError::Validation("Profile already exists".into()));
        }

        let now = Utc::now();
        let profile = user_profile::ActiveModel {
            user_id: Set(user_id),
            display_name: Set(payload.display_name.trim().to_string()),
            avatar_url: Set(payload.avatar_url),
            bio: Set(payload.bio),
            age: Set(payload.age),
            challenge_preferences: Set(payload.challenge_preferences),
            timezone: Set(payload.timezone),
            language: Set(payload.language.unwrap_or_else(|| "fr".to_string())),
            is_public: Set(payload.is_public.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(profile.insert(self.conn).await?)
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        payload: UpdateProfileRequest,
    ) -> Result<user_profile::Model, AppError> {
        let existing = self
            .find_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;

        let mut active: user_profile::ActiveModel = existing.into();
        if let Some(display_name) = payload.display_name {
            active.display_name = Set(display_name.trim().to_string());
        }
        if let Some(avatar_url) = payload.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(bio) = payload.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(age) = payload.age {
            active.age = Set(Some(age));
        }
        if let Some(preferences) = payload.challenge_preferences {
            active.challenge_preferences = Set(Some(preferences));
        }
        if let Some(timezone) = payload.timezone {
            active.timezone = Set(Some(timezone));
        }
        if let Some(language) = payload.language {
            active.language = Set(language);
        }
        if let Some(is_public) = payload.is_public {
            active.is_public = Set(is_public);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(self.conn).await?)
    }
}

/// Best display name for a user in a season context:
/// nickname, then profile display name, then username, then email local part.
pub fn display_name(
    nickname: Option<&str>,
    profile_name: Option<&str>,
    username: Option<&str>,
    email: &str,
) -> String {
    if let Some(nickname) = nickname
        && !nickname.trim().is_empty()
    {
        return nickname.trim().to_string();
    }
    if let Some(profile_name) = profile_name {
        return profile_name.to_string();
    }
    if let Some(username) = username {
        return username.to_string();
    }
    email
        .split_once('@')
        .map(|(local, _)| local.to_string())
        .unwrap_or_else(|| email.to_string())
}

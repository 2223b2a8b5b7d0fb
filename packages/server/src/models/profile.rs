use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_length, validate_url_field};
use crate::entity::{user, user_profile};
use crate::error::AppError;

/// PATCH-style account update.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateAccountRequest {
    #[schema(example = "maman_photographe")]
    pub username: Option<String>,
}

pub fn validate_update_account(payload: &UpdateAccountRequest) -> Result<(), AppError> {
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
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProfileRequest {
    #[schema(example = "Maman Photographe")]
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    /// Free-form preference flags used when generating challenges.
    pub challenge_preferences: Option<serde_json::Value>,
    #[schema(example = "Europe/Paris")]
    pub timezone: Option<String>,
    /// BCP 47-ish language tag; defaults to "fr".
    pub language: Option<String>,
    /// Whether other members may see this profile.
    pub is_public: Option<bool>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub challenge_preferences: Option<serde_json::Value>,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub is_public: Option<bool>,
}

fn validate_profile_fields(
    display_name: Option<&str>,
    avatar_url: Option<&str>,
    bio: Option<&str>,
    age: Option<i32>,
    language: Option<&str>,
) -> Result<(), AppError> {
    if let Some(name) = display_name {
        validate_length("display_name", name, 1, 100)?;
    }
    if let Some(url) = avatar_url {
        validate_url_field("avatar_url", url)?;
    }
    if let Some(bio) = bio
        && bio.chars().count() > 500
    {
        return Err(AppError::Validation(
            "bio must be at most 500 characters".into(),
        ));
    }
    if let Some(age) = age
        && !(0..=130).contains(&age)
    {
        return Err(AppError::Validation("age must be between 0 and 130".into()));
    }
    if let Some(language) = language
        && (language.is_empty() || language.len() > 10)
    {
        return Err(AppError::Validation(
            "language must be 1-10 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_profile(payload: &CreateProfileRequest) -> Result<(), AppError> {
    validate_profile_fields(
        Some(&payload.display_name),
        payload.avatar_url.as_deref(),
        payload.bio.as_deref(),
        payload.age,
        payload.language.as_deref(),
    )
}

pub fn validate_update_profile(payload: &UpdateProfileRequest) -> Result<(), AppError> {
    validate_profile_fields(
        payload.display_name.as_deref(),
        payload.avatar_url.as_deref(),
        payload.bio.as_deref(),
        payload.age,
        payload.language.as_deref(),
    )
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub challenge_preferences: Option<serde_json::Value>,
    pub timezone: Option<String>,
    pub language: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_profile::Model> for ProfileResponse {
    fn from(p: user_profile::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            display_name: p.display_name,
            avatar_url: p.avatar_url,
            bio: p.bio,
            age: p.age,
            challenge_preferences: p.challenge_preferences,
            timezone: p.timezone,
            language: p.language,
            is_public: p.is_public,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Another user as visible to fellow members. The profile is omitted unless
/// the owner marked it public.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PublicUserResponse {
    pub user_id: i32,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub profile: Option<ProfileResponse>,
}

impl PublicUserResponse {
    pub fn new(user: user::Model, profile: Option<user_profile::Model>) -> Self {
        let profile = profile.filter(|p| p.is_public).map(ProfileResponse::from);
        Self {
            user_id: user.id,
            username: user.username,
            created_at: user.created_at,
            profile,
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_length, validate_url_field};
use crate::entity::{season, season_member};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSeasonRequest {
    #[schema(example = "Summer at the Lake 2025")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "Lake Annecy, France")]
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cover_image_url: Option<String>,
    /// Cap on participants, unlimited when absent.
    #[schema(example = 6)]
    pub max_members: Option<i32>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateSeasonRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cover_image_url: Option<String>,
    pub max_members: Option<i32>,
    pub is_active: Option<bool>,
    pub is_completed: Option<bool>,
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    if let Some(lat) = latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        return Err(AppError::Validation(
            "latitude must be between -90 and 90".into(),
        ));
    }
    if let Some(lon) = longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        return Err(AppError::Validation(
            "longitude must be between -180 and 180".into(),
        ));
    }
    Ok(())
}

fn validate_max_members(max_members: Option<i32>) -> Result<(), AppError> {
    if let Some(max) = max_members
        && max < 1
    {
        return Err(AppError::Validation("max_members must be at least 1".into()));
    }
    Ok(())
}

pub fn validate_create_season(payload: &CreateSeasonRequest) -> Result<(), AppError> {
    validate_length("title", &payload.title, 1, 200)?;
    validate_length("location", &payload.location, 1, 200)?;
    if let Some(ref description) = payload.description
        && description.chars().count() > 2000
    {
        return Err(AppError::Validation(
            "description must be at most 2000 characters".into(),
        ));
    }
    if payload.end_date < payload.start_date {
        return Err(AppError::Validation(
            "end_date must not be before start_date".into(),
        ));
    }
    if let Some(ref url) = payload.cover_image_url {
        validate_url_field("cover_image_url", url)?;
    }
    validate_coordinates(payload.latitude, payload.longitude)?;
    validate_max_members(payload.max_members)
}

pub fn validate_update_season(payload: &UpdateSeasonRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_length("title", title, 1, 200)?;
    }
    if let Some(ref location) = payload.location {
        validate_length("location", location, 1, 200)?;
    }
    if let Some(ref description) = payload.description
        && description.chars().count() > 2000
    {
        return Err(AppError::Validation(
            "description must be at most 2000 characters".into(),
        ));
    }
    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date)
        && end < start
    {
        return Err(AppError::Validation(
            "end_date must not be before start_date".into(),
        ));
    }
    if let Some(ref url) = payload.cover_image_url {
        validate_url_field("cover_image_url", url)?;
    }
    validate_coordinates(payload.latitude, payload.longitude)?;
    validate_max_members(payload.max_members)
}

/// Join a season by invitation code.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct JoinByCodeRequest {
    #[schema(example = "K7M2PQ")]
    pub invitation_code: String,
    /// Display name override for this season.
    pub nickname: Option<String>,
}

/// Join a season by id (the season must be open).
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct JoinSeasonRequest {
    pub nickname: Option<String>,
}

pub fn validate_nickname(nickname: Option<&str>) -> Result<(), AppError> {
    if let Some(nickname) = nickname {
        validate_length("nickname", nickname, 1, 50)?;
    }
    Ok(())
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SeasonListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SeasonResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cover_image_url: Option<String>,
    pub max_members: Option<i32>,
    /// Share this code to invite family members.
    pub invitation_code: String,
    pub is_active: bool,
    pub is_completed: bool,
    pub created_by: i32,
    /// Number of active members.
    pub member_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SeasonResponse {
    pub fn from_model(m: season::Model, member_count: u64) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            location: m.location,
            latitude: m.latitude,
            longitude: m.longitude,
            start_date: m.start_date,
            end_date: m.end_date,
            cover_image_url: m.cover_image_url,
            max_members: m.max_members,
            invitation_code: m.invitation_code,
            is_active: m.is_active,
            is_completed: m.is_completed,
            created_by: m.created_by,
            member_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SeasonListResponse {
    pub data: Vec<SeasonResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MemberResponse {
    pub season_id: i32,
    pub user_id: i32,
    /// Season nickname, else profile display name, else username/email local part.
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
    pub total_points: i32,
    pub challenges_completed: i32,
    pub badges_earned: i32,
    pub joined_at: DateTime<Utc>,
}

impl MemberResponse {
    pub fn from_model(m: season_member::Model, display_name: String) -> Self {
        Self {
            season_id: m.season_id,
            user_id: m.user_id,
            display_name,
            role: m.role,
            is_active: m.is_active,
            total_points: m.total_points,
            challenges_completed: m.challenges_completed,
            badges_earned: m.badges_earned,
            joined_at: m.joined_at,
        }
    }
}

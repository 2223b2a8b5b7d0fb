use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_length, validate_one_of, validate_url_field};
use crate::entity::{challenge, challenge_submission};
use crate::error::AppError;

pub const CHALLENGE_TYPES: &[&str] = &["photo", "video", "text", "quiz", "location", "drawing"];
pub const CHALLENGE_STATUSES: &[&str] =
    &["draft", "published", "active", "completed", "cancelled"];
pub const SUBMISSION_STATUSES: &[&str] = &["pending", "approved", "rejected", "needs_revision"];
/// Review verdicts a season manager may set.
pub const REVIEW_STATUSES: &[&str] = &["approved", "rejected", "needs_revision"];

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateChallengeRequest {
    pub season_id: i32,
    #[schema(example = "Sunset photo contest")]
    pub title: String,
    #[schema(example = "Catch the best sunset over the lake")]
    pub description: String,
    #[schema(example = "photo")]
    pub challenge_type: String,
    /// Points awarded on approval (1-1000).
    #[schema(example = 50)]
    pub points: i32,
    pub instructions: Option<String>,
    /// Hint strings shown on demand.
    pub hints: Option<Vec<String>>,
    pub media_url: Option<String>,
    /// 1 (easy) to 5 (hard), defaults to 1.
    pub difficulty: Option<i32>,
    pub estimated_minutes: Option<i32>,
    pub scheduled_date: Option<NaiveDate>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateChallengeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub challenge_type: Option<String>,
    pub points: Option<i32>,
    pub instructions: Option<String>,
    pub hints: Option<Vec<String>>,
    pub media_url: Option<String>,
    pub difficulty: Option<i32>,
    pub estimated_minutes: Option<i32>,
    pub status: Option<String>,
    pub position: Option<i32>,
    pub scheduled_date: Option<NaiveDate>,
}

fn validate_challenge_fields(
    title: Option<&str>,
    description: Option<&str>,
    challenge_type: Option<&str>,
    points: Option<i32>,
    instructions: Option<&str>,
    media_url: Option<&str>,
    difficulty: Option<i32>,
    estimated_minutes: Option<i32>,
) -> Result<(), AppError> {
    if let Some(title) = title {
        validate_length("title", title, 1, 200)?;
    }
    if let Some(description) = description {
        validate_length("description", description, 1, 1000)?;
    }
    if let Some(challenge_type) = challenge_type {
        validate_one_of("challenge_type", challenge_type, CHALLENGE_TYPES)?;
    }
    if let Some(points) = points
        && !(1..=1000).contains(&points)
    {
        return Err(AppError::Validation(
            "points must be between 1 and 1000".into(),
        ));
    }
    if let Some(instructions) = instructions
        && instructions.chars().count() > 2000
    {
        return Err(AppError::Validation(
            "instructions must be at most 2000 characters".into(),
        ));
    }
    if let Some(url) = media_url {
        validate_url_field("media_url", url)?;
    }
    if let Some(difficulty) = difficulty
        && !(1..=5).contains(&difficulty)
    {
        return Err(AppError::Validation(
            "difficulty must be between 1 and 5".into(),
        ));
    }
    if let Some(minutes) = estimated_minutes
        && minutes < 1
    {
        return Err(AppError::Validation(
            "estimated_minutes must be at least 1".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_challenge(payload: &CreateChallengeRequest) -> Result<(), AppError> {
    validate_challenge_fields(
        Some(&payload.title),
        Some(&payload.description),
        Some(&payload.challenge_type),
        Some(payload.points),
        payload.instructions.as_deref(),
        payload.media_url.as_deref(),
        payload.difficulty,
        payload.estimated_minutes,
    )
}

pub fn validate_update_challenge(payload: &UpdateChallengeRequest) -> Result<(), AppError> {
    validate_challenge_fields(
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.challenge_type.as_deref(),
        payload.points,
        payload.instructions.as_deref(),
        payload.media_url.as_deref(),
        payload.difficulty,
        payload.estimated_minutes,
    )?;
    if let Some(ref status) = payload.status {
        validate_one_of("status", status, CHALLENGE_STATUSES)?;
    }
    if let Some(position) = payload.position
        && position < 0
    {
        return Err(AppError::Validation("position must be >= 0".into()));
    }
    Ok(())
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ChallengeListQuery {
    pub season_id: i32,
    /// Filter to a single status.
    pub status: Option<String>,
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct SubmitChallengeRequest {
    pub content: Option<String>,
    /// URLs of media uploaded via `/media`.
    pub media: Option<Vec<String>>,
    pub metadata: Option<serde_json::Value>,
}

pub fn validate_submit_challenge(payload: &SubmitChallengeRequest) -> Result<(), AppError> {
    if let Some(ref content) = payload.content
        && content.chars().count() > 2000
    {
        return Err(AppError::Validation(
            "content must be at most 2000 characters".into(),
        ));
    }
    let has_content = payload.content.as_deref().is_some_and(|c| !c.trim().is_empty());
    let has_media = payload.media.as_ref().is_some_and(|m| !m.is_empty());
    if !has_content && !has_media {
        return Err(AppError::Validation(
            "A submission needs content or at least one media item".into(),
        ));
    }
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReviewSubmissionRequest {
    /// One of: approved, rejected, needs_revision.
    #[schema(example = "approved")]
    pub status: String,
    /// Override for the challenge's default points.
    pub points_awarded: Option<i32>,
    pub feedback: Option<String>,
}

pub fn validate_review_submission(payload: &ReviewSubmissionRequest) -> Result<(), AppError> {
    validate_one_of("status", &payload.status, REVIEW_STATUSES)?;
    if let Some(points) = payload.points_awarded
        && points < 0
    {
        return Err(AppError::Validation("points_awarded must be >= 0".into()));
    }
    if let Some(ref feedback) = payload.feedback
        && feedback.chars().count() > 1000
    {
        return Err(AppError::Validation(
            "feedback must be at most 1000 characters".into(),
        ));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChallengeResponse {
    pub id: i32,
    pub season_id: i32,
    pub title: String,
    pub description: String,
    pub challenge_type: String,
    pub points: i32,
    pub instructions: Option<String>,
    pub hints: Option<serde_json::Value>,
    pub media_url: Option<String>,
    pub difficulty: i32,
    pub estimated_minutes: Option<i32>,
    pub status: String,
    pub position: i32,
    pub scheduled_date: Option<NaiveDate>,
    pub created_by: i32,
    pub submission_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChallengeResponse {
    pub fn from_model(m: challenge::Model, submission_count: u64) -> Self {
        Self {
            id: m.id,
            season_id: m.season_id,
            title: m.title,
            description: m.description,
            challenge_type: m.challenge_type,
            points: m.points,
            instructions: m.instructions,
            hints: m.hints,
            media_url: m.media_url,
            difficulty: m.difficulty,
            estimated_minutes: m.estimated_minutes,
            status: m.status,
            position: m.position,
            scheduled_date: m.scheduled_date,
            created_by: m.created_by,
            submission_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    pub id: i32,
    pub challenge_id: i32,
    pub user_id: i32,
    pub content: Option<String>,
    pub media: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub status: String,
    pub points_awarded: Option<i32>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<i32>,
}

impl From<challenge_submission::Model> for SubmissionResponse {
    fn from(s: challenge_submission::Model) -> Self {
        Self {
            id: s.id,
            challenge_id: s.challenge_id,
            user_id: s.user_id,
            content: s.content,
            media: s.media,
            metadata: s.metadata,
            status: s.status,
            points_awarded: s.points_awarded,
            feedback: s.feedback,
            submitted_at: s.submitted_at,
            reviewed_at: s.reviewed_at,
            reviewed_by: s.reviewed_by,
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_length, validate_one_of};
use crate::entity::{badge, score, user_badge};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AwardPointsRequest {
    pub user_id: i32,
    pub season_id: i32,
    /// Negative values record a penalty.
    #[schema(example = 25)]
    pub points: i32,
    /// Defaults to "manual". See the score entity for allowed values.
    pub score_type: Option<String>,
    #[schema(example = "Helped set up the picnic")]
    pub description: String,
    pub challenge_id: Option<i32>,
}

pub fn validate_award_points(payload: &AwardPointsRequest) -> Result<(), AppError> {
    if payload.points == 0 {
        return Err(AppError::Validation("points must not be zero".into()));
    }
    validate_length("description", &payload.description, 1, 200)?;
    if let Some(ref score_type) = payload.score_type {
        validate_one_of("score_type", score_type, score::SCORE_TYPES)?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScoreResponse {
    pub id: i32,
    pub user_id: i32,
    pub season_id: i32,
    pub challenge_id: Option<i32>,
    pub points: i32,
    pub score_type: String,
    pub description: String,
    pub score_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<score::Model> for ScoreResponse {
    fn from(s: score::Model) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            season_id: s.season_id,
            challenge_id: s.challenge_id,
            points: s.points,
            score_type: s.score_type,
            description: s.description,
            score_date: s.score_date,
            created_at: s.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based rank, ties ordered by join time.
    pub rank: u64,
    pub user_id: i32,
    pub display_name: String,
    pub total_points: i32,
    pub challenges_completed: i32,
    pub badges_earned: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    pub season_id: i32,
    pub season_title: String,
    pub total_participants: u64,
    pub entries: Vec<LeaderboardEntry>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserStatsQuery {
    /// Restrict season-scoped figures to this season.
    pub season_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserStatsResponse {
    pub user_id: i32,
    pub season_id: Option<i32>,
    /// Sum of all ledger entries across seasons.
    pub total_points: i64,
    /// Sum within `season_id`, zero when unscoped.
    pub season_points: i64,
    pub challenges_completed: u64,
    pub badges_earned: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BadgeResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub icon_url: Option<String>,
    pub color: String,
    pub rarity: String,
    pub bonus_points: i32,
}

impl From<badge::Model> for BadgeResponse {
    fn from(b: badge::Model) -> Self {
        Self {
            id: b.id,
            name: b.name,
            description: b.description,
            category: b.category,
            icon_url: b.icon_url,
            color: b.color,
            rarity: b.rarity,
            bonus_points: b.bonus_points,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserBadgeResponse {
    pub badge: BadgeResponse,
    pub season_id: Option<i32>,
    pub earned_at: DateTime<Utc>,
    pub is_showcased: bool,
}

impl UserBadgeResponse {
    pub fn from_models(earned: user_badge::Model, badge: badge::Model) -> Self {
        Self {
            badge: badge.into(),
            season_id: earned.season_id,
            earned_at: earned.earned_at,
            is_showcased: earned.is_showcased,
        }
    }
}

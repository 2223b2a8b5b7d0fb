use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allowed values for `score_type`.
pub const SCORE_TYPES: &[&str] = &[
    "challenge_completion",
    "speed_bonus",
    "streak_bonus",
    "team_bonus",
    "daily_bonus",
    "badge_bonus",
    "penalty",
    "manual",
];

/// Immutable ledger entry of points attributed to a user within a season.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "score")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,

    pub season_id: i32,
    #[sea_orm(belongs_to, from = "season_id", to = "id")]
    pub season: BelongsTo<super::season::Entity>,

    /// NULL for entries not tied to a challenge (manual awards, badge bonuses).
    pub challenge_id: Option<i32>,
    #[sea_orm(belongs_to, from = "challenge_id", to = "id")]
    pub challenge: BelongsTo<Option<super::challenge::Entity>>,

    /// Negative for penalties.
    pub points: i32,
    pub score_type: String,
    pub description: String,

    /// Day the points count toward, drives streak computation.
    pub score_date: Date,
    pub metadata: Option<Json>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Achievement catalog entry with JSON-encoded unlock criteria.
///
/// Criteria formats understood by the scoring service:
/// `{"type": "points_total", "points": 1000}`,
/// `{"type": "challenge_count", "count": 10}`,
/// `{"type": "streak_days", "days": 7}`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "badge")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// One of: achievement, streak, milestone, special, team.
    pub category: String,

    pub icon_url: Option<String>,
    /// Hex display color.
    pub color: String,

    pub criteria: Json,

    /// One of: common, rare, epic, legendary.
    pub rarity: String,
    /// Extra points granted when the badge is earned.
    pub bonus_points: i32,

    pub is_active: bool,
    /// Hidden badges are not listed until earned.
    pub is_hidden: bool,

    #[sea_orm(has_many, via = "user_badge")]
    pub holders: HasMany<super::user::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

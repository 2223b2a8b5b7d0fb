use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership of a user in a season, with cumulative stats.
///
/// The composite primary key is what makes joining idempotent-safe: concurrent
/// join requests for the same (season, user) pair surface as a unique-constraint
/// violation instead of a duplicate row.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "season_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub season_id: i32,
    #[sea_orm(primary_key)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "season_id", to = "id")]
    pub season: BelongsTo<super::season::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,

    /// "creator", "admin", or "member".
    pub role: String,
    /// Display name override for this season only.
    pub nickname: Option<String>,
    pub is_active: bool,

    pub total_points: i32,
    pub challenges_completed: i32,
    pub badges_earned: i32,

    pub joined_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Membership roles allowed to manage a season's content.
pub const MANAGER_ROLES: &[&str] = &["creator", "admin"];

impl Model {
    pub fn is_manager(&self) -> bool {
        MANAGER_ROLES.contains(&self.role.as_str())
    }
}

impl ActiveModelBehavior for ActiveModel {}

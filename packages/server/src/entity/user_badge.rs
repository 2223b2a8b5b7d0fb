use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Record of a badge earned by a user. The composite primary key guarantees a
/// badge is earned at most once per user.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_badge")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i32,
    #[sea_orm(primary_key)]
    pub badge_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,
    #[sea_orm(belongs_to, from = "badge_id", to = "id")]
    pub badge: BelongsTo<super::badge::Entity>,

    /// Season the badge was earned in, when season-scoped.
    pub season_id: Option<i32>,
    #[sea_orm(belongs_to, from = "season_id", to = "id")]
    pub season: BelongsTo<Option<super::season::Entity>>,

    pub earned_at: DateTimeUtc,
    /// Stats snapshot at the moment the badge unlocked.
    pub progress: Option<Json>,
    /// Whether the user showcases this badge on their profile.
    pub is_showcased: bool,
}

impl ActiveModelBehavior for ActiveModel {}

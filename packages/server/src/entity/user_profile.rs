use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Display data and preferences, 1:1 with `user`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,

    pub display_name: String,
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub age: Option<i32>,

    /// Preferences steering challenge generation, e.g.
    /// {"sport": true, "photo": true, "difficulty": "medium"}.
    pub challenge_preferences: Option<Json>,

    pub timezone: Option<String>,
    pub language: String,
    pub is_public: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

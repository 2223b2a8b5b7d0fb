use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenge")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub season_id: i32,
    #[sea_orm(belongs_to, from = "season_id", to = "id")]
    pub season: BelongsTo<super::season::Entity>,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// One of: photo, video, text, quiz, location, drawing.
    pub challenge_type: String,
    /// Points awarded on approval, before review overrides.
    pub points: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    /// JSON array of hint strings.
    pub hints: Option<Json>,
    pub media_url: Option<String>,
    /// 1 (easy) to 5 (hard).
    pub difficulty: i32,
    pub estimated_minutes: Option<i32>,

    /// One of: draft, published, active, completed, cancelled.
    pub status: String,
    /// Ordering within the season, auto-assigned on create.
    pub position: i32,
    pub scheduled_date: Option<Date>,

    pub created_by: i32,
    #[sea_orm(belongs_to, from = "created_by", to = "id")]
    pub creator: BelongsTo<super::user::Entity>,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::challenge_submission::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

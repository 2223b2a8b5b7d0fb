use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A time-boxed vacation event with participants and challenges.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "season")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub location: String,

    /// Coordinates of the vacation spot, used for location challenges.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub start_date: Date,
    pub end_date: Date,

    pub cover_image_url: Option<String>,
    pub max_members: Option<i32>,

    /// Share code handed to family members; see `utils::invite`.
    #[sea_orm(unique)]
    pub invitation_code: String,

    pub is_active: bool,
    pub is_completed: bool,

    pub created_by: i32,
    #[sea_orm(belongs_to, from = "created_by", to = "id", relation_enum = "Creator")]
    pub creator: BelongsTo<super::user::Entity>,

    #[sea_orm(has_many, via = "season_member", relation_enum = "Members")]
    pub members: HasMany<super::user::Entity>,

    #[sea_orm(has_many)]
    pub challenges: HasMany<super::challenge::Entity>,

    #[sea_orm(has_many)]
    pub scores: HasMany<super::score::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

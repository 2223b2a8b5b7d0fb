use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A member's response to a challenge, with its review state.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenge_submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub challenge_id: i32,
    #[sea_orm(belongs_to, from = "challenge_id", to = "id")]
    pub challenge: BelongsTo<super::challenge::Entity>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,

    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    /// JSON array of media URLs (uploaded via /media).
    pub media: Option<Json>,
    pub metadata: Option<Json>,

    /// One of: pending, approved, rejected, needs_revision.
    pub status: String,
    pub points_awarded: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,

    pub submitted_at: DateTimeUtc,
    pub reviewed_at: Option<DateTimeUtc>,
    /// User id of the reviewer; NULL until reviewed. Kept as a plain column so the
    /// user relation stays unambiguous.
    pub reviewed_by: Option<i32>,
}

impl ActiveModelBehavior for ActiveModel {}

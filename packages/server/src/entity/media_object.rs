use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registry row for an uploaded media file. The bytes live in the
/// content-addressed store; this row carries the serving metadata.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_object")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// SHA-256 hex digest addressing the blob.
    pub content_hash: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: i64,
    /// One of: image, video, audio, document.
    pub category: String,

    pub uploaded_by: i32,
    #[sea_orm(belongs_to, from = "uploaded_by", to = "id")]
    pub uploader: BelongsTo<super::user::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

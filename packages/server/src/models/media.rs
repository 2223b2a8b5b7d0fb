use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::media_object;

/// Metadata for an uploaded media file.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaResponse {
    pub id: Uuid,
    /// Path to stream the file back, relative to the API root.
    #[schema(example = "/media/0192d1f6-4f1e-7c3a-b2f4-1c9e4a8b6d21")]
    pub url: String,
    pub content_hash: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<media_object::Model> for MediaResponse {
    fn from(m: media_object::Model) -> Self {
        Self {
            id: m.id,
            url: format!("/media/{}", m.id),
            content_hash: m.content_hash,
            filename: m.filename,
            content_type: m.content_type,
            size: m.size,
            category: m.category,
            created_at: m.created_at,
        }
    }
}

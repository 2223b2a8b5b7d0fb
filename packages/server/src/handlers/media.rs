use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::media_object;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::media::MediaResponse;
use crate::state::AppState;
use crate::storage::{ContentHash, MediaReader};
use crate::utils::upload::{media_category, validate_filename};

pub fn upload_body_limit() -> DefaultBodyLimit {
    // Upload cap plus multipart framing headroom.
    DefaultBodyLimit::max(16 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/media",
    tag = "Media",
    operation_id = "uploadMedia",
    summary = "Upload a media file",
    description = "Multipart upload with a required `file` field. The extension decides the \
        category (image/video/audio/document); anything else is rejected. Bytes are stored \
        content-addressed, so re-uploading identical content is cheap.",
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 201, description = "Media stored", body = MediaResponse),
        (status = 400, description = "Missing file, bad filename, or oversized upload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id()))]
pub async fn upload_media(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut stored: Option<(ContentHash, String, &'static str)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue; // Ignore unknown fields.
        }

        let filename = field
            .file_name()
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
        let filename = validate_filename(filename)
            .map_err(AppError::Validation)?
            .to_string();
        let category = media_category(&filename).ok_or_else(|| {
            AppError::Validation(format!("File type of '{filename}' is not allowed"))
        })?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
        if bytes.len() as u64 > state.config.storage.max_upload_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {} bytes",
                state.config.storage.max_upload_size
            )));
        }

        let reader: MediaReader = Box::new(std::io::Cursor::new(bytes.to_vec()));
        let hash = state.media.store(reader).await?;
        stored = Some((hash, filename, category));
    }

    let (hash, filename, category) =
        stored.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    let content_type = mime_guess::from_path(&filename)
        .first()
        .map(|m| m.to_string());
    let size = state.media.len(&hash).await?;

    let model = media_object::ActiveModel {
        id: Set(Uuid::now_v7()),
        content_hash: Set(hash.to_hex()),
        filename: Set(filename),
        content_type: Set(content_type),
        size: Set(size as i64),
        category: Set(category.to_string()),
        uploaded_by: Set(auth_user.user_id()),
        created_at: Set(Utc::now()),
    };
    let model = model.insert(&state.db).await?;

    tracing::info!(media_id = %model.id, size, "Media uploaded");
    Ok((StatusCode::CREATED, Json(MediaResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/media/{id}",
    tag = "Media",
    operation_id = "downloadMedia",
    summary = "Stream a media file",
    description = "Streams the stored bytes with the recorded content type. The content hash \
        doubles as a strong ETag; If-None-Match returns 304.",
    params(("id" = String, Path, description = "Media object ID (UUID)")),
    responses(
        (status = 200, description = "Media content"),
        (status = 304, description = "Not modified (ETag match)"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, headers), fields(id))]
pub async fn download_media(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let media_id =
        Uuid::parse_str(&id).map_err(|_| AppError::Validation("Invalid media ID".into()))?;

    let model = media_object::Entity::find_by_id(media_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".into()))?;

    let etag_value = format!("\"{}\"", model.content_hash);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let hash = ContentHash::parse(&model.content_hash)?;
    let reader = state.media.open(&hash).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = model
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, model.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&model.filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    format!("inline; filename=\"{ascii_name}\"")
}

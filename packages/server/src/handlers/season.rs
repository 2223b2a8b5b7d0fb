use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use tracing::instrument;

use crate::entity::season;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::season::{
    CreateSeasonRequest, JoinByCodeRequest, JoinSeasonRequest, MemberResponse, SeasonListQuery,
    SeasonListResponse, SeasonResponse, UpdateSeasonRequest, validate_create_season,
    validate_nickname, validate_update_season,
};
use crate::models::shared::Pagination;
use crate::services::season::SeasonService;
use crate::services::user::{UserService, display_name};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/seasons",
    tag = "Holiday Seasons",
    operation_id = "listSeasons",
    summary = "List seasons",
    description = "Returns seasons newest first with active member counts.",
    params(SeasonListQuery),
    responses(
        (status = 200, description = "Season page", body = SeasonListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_seasons(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SeasonListQuery>,
) -> Result<Json<SeasonListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let service = SeasonService::new(&state.db);
    let (seasons, total) = service.list(page, per_page).await?;
    let ids: Vec<i32> = seasons.iter().map(|s| s.id).collect();
    let counts = service.member_counts(&ids).await?;

    let total_pages = total.div_ceil(per_page);
    let data = seasons
        .into_iter()
        .map(|s| {
            let count = counts.get(&s.id).copied().unwrap_or(0);
            SeasonResponse::from_model(s, count)
        })
        .collect();

    Ok(Json(SeasonListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/seasons",
    tag = "Holiday Seasons",
    operation_id = "createSeason",
    summary = "Create a season",
    description = "Allocates a unique invitation code and enrolls the caller as the season's \
        creator in one transaction.",
    request_body = CreateSeasonRequest,
    responses(
        (status = 201, description = "Season created", body = SeasonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_season(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSeasonRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_season(&payload)?;

    let txn = state.db.begin().await?;
    let (model, _member) = SeasonService::new(&txn)
        .create(&payload, auth_user.user_id())
        .await?;
    txn.commit().await?;

    tracing::info!(season_id = model.id, user_id = auth_user.user_id(), "Season created");
    Ok((
        StatusCode::CREATED,
        Json(SeasonResponse::from_model(model, 1)),
    ))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}",
    tag = "Holiday Seasons",
    operation_id = "getSeason",
    summary = "Get a season by ID",
    params(("id" = i32, Path, description = "Season ID")),
    responses(
        (status = 200, description = "Season details", body = SeasonResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_season(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SeasonResponse>, AppError> {
    let service = SeasonService::new(&state.db);
    let model = service.find(id).await?;
    let count = service.member_count(id).await?;
    Ok(Json(SeasonResponse::from_model(model, count)))
}

#[utoipa::path(
    patch,
    path = "/seasons/{id}",
    tag = "Holiday Seasons",
    operation_id = "updateSeason",
    summary = "Update a season",
    description = "PATCH semantics: absent fields are untouched. Requires a creator or admin \
        membership. Cross-field date checks hold against the stored values.",
    params(("id" = i32, Path, description = "Season ID")),
    request_body = UpdateSeasonRequest,
    responses(
        (status = 200, description = "Season updated", body = SeasonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a season manager (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_season(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateSeasonRequest>,
) -> Result<Json<SeasonResponse>, AppError> {
    validate_update_season(&payload)?;

    let txn = state.db.begin().await?;
    let service = SeasonService::new(&txn);
    let existing = service.find(id).await?;
    service.require_manager(id, auth_user.user_id()).await?;

    // Date ordering must hold after applying one-sided updates.
    let effective_start = payload.start_date.unwrap_or(existing.start_date);
    let effective_end = payload.end_date.unwrap_or(existing.end_date);
    if effective_end < effective_start {
        return Err(AppError::Validation(
            "end_date must not be before start_date".into(),
        ));
    }

    let mut active: season::ActiveModel = existing.into();
    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(ref location) = payload.location {
        active.location = Set(location.trim().to_string());
    }
    if let Some(latitude) = payload.latitude {
        active.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = payload.longitude {
        active.longitude = Set(Some(longitude));
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(cover_image_url) = payload.cover_image_url {
        active.cover_image_url = Set(Some(cover_image_url));
    }
    if let Some(max_members) = payload.max_members {
        active.max_members = Set(Some(max_members));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(is_completed) = payload.is_completed {
        active.is_completed = Set(is_completed);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    let count = SeasonService::new(&txn).member_count(id).await?;
    txn.commit().await?;

    Ok(Json(SeasonResponse::from_model(model, count)))
}

#[utoipa::path(
    delete,
    path = "/seasons/{id}",
    tag = "Holiday Seasons",
    operation_id = "deleteSeason",
    summary = "Delete a season",
    description = "Cascade-deletes members, challenges, submissions, and scores in one \
        transaction. Only the season's creator may delete it.",
    params(("id" = i32, Path, description = "Season ID")),
    responses(
        (status = 204, description = "Season deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the creator (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_season(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let service = SeasonService::new(&txn);
    let model = service.find(id).await?;
    if model.created_by != auth_user.user_id() {
        return Err(AppError::PermissionDenied);
    }

    service.delete(model).await?;
    txn.commit().await?;

    tracing::info!(season_id = id, user_id = auth_user.user_id(), "Season deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/seasons/join",
    tag = "Holiday Seasons",
    operation_id = "joinByCode",
    summary = "Join a season with an invitation code",
    request_body = JoinByCodeRequest,
    responses(
        (status = 201, description = "Joined", body = MemberResponse),
        (status = 400, description = "Full/completed season or already a member (VALIDATION_ERROR, ALREADY_MEMBER)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown invitation code (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn join_by_code(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<JoinByCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_nickname(payload.nickname.as_deref())?;

    let service = SeasonService::new(&state.db);
    let season = service.find_by_code(&payload.invitation_code).await?;
    let member = service
        .join(&season, auth_user.user_id(), payload.nickname)
        .await?;

    tracing::info!(season_id = season.id, user_id = auth_user.user_id(), "Member joined by code");
    Ok((StatusCode::CREATED, Json(member_response(&state, member).await?)))
}

#[utoipa::path(
    post,
    path = "/seasons/{id}/join",
    tag = "Holiday Seasons",
    operation_id = "joinSeason",
    summary = "Join a season by ID",
    params(("id" = i32, Path, description = "Season ID")),
    request_body = JoinSeasonRequest,
    responses(
        (status = 201, description = "Joined", body = MemberResponse),
        (status = 400, description = "Full/completed season or already a member (VALIDATION_ERROR, ALREADY_MEMBER)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn join_season(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<JoinSeasonRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_nickname(payload.nickname.as_deref())?;

    let service = SeasonService::new(&state.db);
    let season = service.find(id).await?;
    let member = service
        .join(&season, auth_user.user_id(), payload.nickname)
        .await?;

    tracing::info!(season_id = id, user_id = auth_user.user_id(), "Member joined");
    Ok((StatusCode::CREATED, Json(member_response(&state, member).await?)))
}

#[utoipa::path(
    get,
    path = "/seasons/{id}/members",
    tag = "Holiday Seasons",
    operation_id = "listMembers",
    summary = "List a season's members",
    description = "Members only. Ordered by join time, with resolved display names.",
    params(("id" = i32, Path, description = "Season ID")),
    responses(
        (status = 200, description = "Members", body = Vec<MemberResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_members(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let service = SeasonService::new(&state.db);
    service.find(id).await?;
    service.require_member(id, auth_user.user_id()).await?;

    let rows = service.members_with_users(id).await?;

    let user_ids: Vec<i32> = rows.iter().map(|(m, _)| m.user_id).collect();
    let profiles = load_profiles(&state, &user_ids).await?;

    let items = rows
        .into_iter()
        .map(|(member, account)| {
            let profile = profiles.get(&member.user_id);
            let name = match account {
                Some(ref account) => display_name(
                    member.nickname.as_deref(),
                    profile.map(|p| p.display_name.as_str()),
                    account.username.as_deref(),
                    &account.email,
                ),
                None => format!("user {}", member.user_id),
            };
            MemberResponse::from_model(member, name)
        })
        .collect();

    Ok(Json(items))
}

async fn load_profiles(
    state: &AppState,
    user_ids: &[i32],
) -> Result<std::collections::HashMap<i32, crate::entity::user_profile::Model>, AppError> {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    use crate::entity::user_profile;

    if user_ids.is_empty() {
        return Ok(Default::default());
    }
    Ok(user_profile::Entity::find()
        .filter(user_profile::Column::UserId.is_in(user_ids.to_vec()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.user_id, p))
        .collect())
}

async fn member_response(
    state: &AppState,
    member: crate::entity::season_member::Model,
) -> Result<MemberResponse, AppError> {
    let service = UserService::new(&state.db);
    let account = service.find_user(member.user_id).await?;
    let profile = service.find_profile(member.user_id).await?;
    let name = display_name(
        member.nickname.as_deref(),
        profile.as_ref().map(|p| p.display_name.as_str()),
        account.username.as_deref(),
        &account.email,
    );
    Ok(MemberResponse::from_model(member, name))
}

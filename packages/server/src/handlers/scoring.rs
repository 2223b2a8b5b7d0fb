use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::instrument;

use crate::entity::{badge, user_badge};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::scoring::{
    AwardPointsRequest, BadgeResponse, LeaderboardResponse, ScoreResponse, UserBadgeResponse,
    UserStatsQuery, UserStatsResponse, validate_award_points,
};
use crate::services::scoring::ScoringService;
use crate::services::season::SeasonService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/scoring/award-points",
    tag = "Scoring & Leaderboards",
    operation_id = "awardPoints",
    summary = "Award ad-hoc points",
    description = "Season managers append a manual ledger entry (negative for penalties). \
        Member stats update and badge criteria run in the same transaction.",
    request_body = AwardPointsRequest,
    responses(
        (status = 201, description = "Points awarded", body = ScoreResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a season manager (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Season or member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(season_id = payload.season_id, user_id = payload.user_id))]
pub async fn award_points(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AwardPointsRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_award_points(&payload)?;

    let txn = state.db.begin().await?;
    let seasons = SeasonService::new(&txn);
    seasons.find(payload.season_id).await?;
    seasons
        .require_manager(payload.season_id, auth_user.user_id())
        .await?;
    // The recipient must be enrolled.
    seasons
        .membership(payload.season_id, payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Season member not found".into()))?;

    let scoring = ScoringService::new(&txn);
    let score = scoring
        .award(
            payload.user_id,
            payload.season_id,
            payload.challenge_id,
            payload.points,
            payload.score_type.as_deref().unwrap_or("manual"),
            payload.description.trim(),
            None,
            false,
        )
        .await?;
    scoring
        .evaluate_badges(payload.user_id, payload.season_id)
        .await?;
    txn.commit().await?;

    tracing::info!(
        score_id = score.id,
        points = score.points,
        awarded_by = auth_user.user_id(),
        "Points awarded"
    );
    Ok((StatusCode::CREATED, Json(ScoreResponse::from(score))))
}

#[utoipa::path(
    get,
    path = "/scoring/leaderboard/{season_id}",
    tag = "Scoring & Leaderboards",
    operation_id = "seasonLeaderboard",
    summary = "Season leaderboard",
    description = "Active members ranked by total points, ties in join order. Members only.",
    params(("season_id" = i32, Path, description = "Season ID")),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(season_id))]
pub async fn season_leaderboard(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(season_id): Path<i32>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let seasons = SeasonService::new(&state.db);
    let season = seasons.find(season_id).await?;
    seasons.require_member(season_id, auth_user.user_id()).await?;

    let entries = ScoringService::new(&state.db)
        .leaderboard_entries(season_id)
        .await?;

    Ok(Json(LeaderboardResponse {
        season_id,
        season_title: season.title,
        total_participants: entries.len() as u64,
        entries,
        generated_at: chrono::Utc::now(),
    }))
}

#[utoipa::path(
    get,
    path = "/scoring/stats/{user_id}",
    tag = "Scoring & Leaderboards",
    operation_id = "userStats",
    summary = "A user's scoring statistics",
    description = "Totals across all seasons plus season-scoped figures when `season_id` is given. \
        Streaks count consecutive days with at least one ledger entry.",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        UserStatsQuery,
    ),
    responses(
        (status = 200, description = "Statistics", body = UserStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query), fields(user_id))]
pub async fn user_stats(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<UserStatsQuery>,
) -> Result<Json<UserStatsResponse>, AppError> {
    crate::services::user::UserService::new(&state.db)
        .find_user(user_id)
        .await?;

    let scoring = ScoringService::new(&state.db);
    let total_points = scoring.points_sum(user_id, None).await?;
    let season_points = match query.season_id {
        Some(season_id) => scoring.points_sum(user_id, Some(season_id)).await?,
        None => 0,
    };
    let challenges_completed = scoring.approved_submission_count(user_id).await?;
    let badges_earned = scoring.badge_count(user_id).await?;

    let dates = scoring.score_dates(user_id, query.season_id).await?;
    let (current_streak, longest_streak) =
        crate::services::scoring::streaks(&dates, chrono::Utc::now().date_naive());

    Ok(Json(UserStatsResponse {
        user_id,
        season_id: query.season_id,
        total_points,
        season_points,
        challenges_completed,
        badges_earned,
        current_streak,
        longest_streak,
    }))
}

#[utoipa::path(
    get,
    path = "/scoring/badges",
    tag = "Scoring & Leaderboards",
    operation_id = "listBadges",
    summary = "Badge catalog",
    description = "Active badges. Hidden badges appear only once the caller has earned them.",
    responses(
        (status = 200, description = "Badges", body = Vec<BadgeResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_badges(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<BadgeResponse>>, AppError> {
    let earned: std::collections::HashSet<i32> = user_badge::Entity::find()
        .filter(user_badge::Column::UserId.eq(auth_user.user_id()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|ub| ub.badge_id)
        .collect();

    let badges = badge::Entity::find()
        .filter(badge::Column::IsActive.eq(true))
        .order_by_asc(badge::Column::Name)
        .all(&state.db)
        .await?;

    let items = badges
        .into_iter()
        .filter(|b| !b.is_hidden || earned.contains(&b.id))
        .map(BadgeResponse::from)
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/scoring/my-badges",
    tag = "Scoring & Leaderboards",
    operation_id = "myBadges",
    summary = "Badges earned by the caller",
    responses(
        (status = 200, description = "Earned badges", body = Vec<UserBadgeResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id()))]
pub async fn my_badges(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserBadgeResponse>>, AppError> {
    let rows = user_badge::Entity::find()
        .filter(user_badge::Column::UserId.eq(auth_user.user_id()))
        .find_also_related(badge::Entity)
        .order_by_desc(user_badge::Column::EarnedAt)
        .all(&state.db)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(earned, badge)| badge.map(|b| UserBadgeResponse::from_models(earned, b)))
        .collect();

    Ok(Json(items))
}

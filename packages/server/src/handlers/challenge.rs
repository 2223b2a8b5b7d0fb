use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use tracing::instrument;

use crate::entity::challenge;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::challenge::{
    CHALLENGE_STATUSES, ChallengeListQuery, ChallengeResponse, CreateChallengeRequest,
    ReviewSubmissionRequest, SubmissionResponse, SubmitChallengeRequest, UpdateChallengeRequest,
    validate_create_challenge, validate_review_submission, validate_submit_challenge,
    validate_update_challenge,
};
use crate::models::shared::validate_one_of;
use crate::services::challenge::ChallengeService;
use crate::services::scoring::ScoringService;
use crate::services::season::SeasonService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/challenges",
    tag = "Daily Challenges",
    operation_id = "createChallenge",
    summary = "Create a challenge",
    description = "Creates a draft challenge in a season. Requires a creator or admin membership \
        in that season. Position within the season is assigned automatically.",
    request_body = CreateChallengeRequest,
    responses(
        (status = 201, description = "Challenge created", body = ChallengeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a season manager (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(season_id = payload.season_id))]
pub async fn create_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_challenge(&payload)?;

    let txn = state.db.begin().await?;
    let seasons = SeasonService::new(&txn);
    seasons.find(payload.season_id).await?;
    seasons
        .require_manager(payload.season_id, auth_user.user_id())
        .await?;

    let model = ChallengeService::new(&txn)
        .create(&payload, auth_user.user_id())
        .await?;
    txn.commit().await?;

    tracing::info!(challenge_id = model.id, "Challenge created");
    Ok((
        StatusCode::CREATED,
        Json(ChallengeResponse::from_model(model, 0)),
    ))
}

#[utoipa::path(
    get,
    path = "/challenges",
    tag = "Daily Challenges",
    operation_id = "listChallenges",
    summary = "List a season's challenges",
    description = "Ordered by position. Drafts are visible to season managers only.",
    params(ChallengeListQuery),
    responses(
        (status = 200, description = "Challenges", body = Vec<ChallengeResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Season not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(season_id = query.season_id))]
pub async fn list_challenges(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ChallengeListQuery>,
) -> Result<Json<Vec<ChallengeResponse>>, AppError> {
    if let Some(ref status) = query.status {
        validate_one_of("status", status, CHALLENGE_STATUSES)?;
    }

    let seasons = SeasonService::new(&state.db);
    seasons.find(query.season_id).await?;
    let member = seasons
        .require_member(query.season_id, auth_user.user_id())
        .await?;

    let service = ChallengeService::new(&state.db);
    let models = service
        .list(query.season_id, query.status.as_deref(), member.is_manager())
        .await?;

    let ids: Vec<i32> = models.iter().map(|c| c.id).collect();
    let counts = service.submission_counts(&ids).await?;

    let items = models
        .into_iter()
        .map(|c| {
            let count = counts.get(&c.id).copied().unwrap_or(0);
            ChallengeResponse::from_model(c, count)
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/challenges/{id}",
    tag = "Daily Challenges",
    operation_id = "getChallenge",
    summary = "Get a challenge by ID",
    params(("id" = i32, Path, description = "Challenge ID")),
    responses(
        (status = 200, description = "Challenge details", body = ChallengeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let service = ChallengeService::new(&state.db);
    let model = service.find(id).await?;

    let member = SeasonService::new(&state.db)
        .require_member(model.season_id, auth_user.user_id())
        .await?;
    if model.status == "draft" && !member.is_manager() {
        return Err(AppError::NotFound("Challenge not found".into()));
    }

    let count = service.submission_count(id).await?;
    Ok(Json(ChallengeResponse::from_model(model, count)))
}

#[utoipa::path(
    patch,
    path = "/challenges/{id}",
    tag = "Daily Challenges",
    operation_id = "updateChallenge",
    summary = "Update a challenge",
    description = "PATCH semantics. Requires a creator or admin membership in the season.",
    params(("id" = i32, Path, description = "Challenge ID")),
    request_body = UpdateChallengeRequest,
    responses(
        (status = 200, description = "Challenge updated", body = ChallengeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a season manager (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateChallengeRequest>,
) -> Result<Json<ChallengeResponse>, AppError> {
    validate_update_challenge(&payload)?;

    let txn = state.db.begin().await?;
    let service = ChallengeService::new(&txn);
    let existing = service.find(id).await?;
    SeasonService::new(&txn)
        .require_manager(existing.season_id, auth_user.user_id())
        .await?;

    let mut active: challenge::ActiveModel = existing.into();
    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(challenge_type) = payload.challenge_type {
        active.challenge_type = Set(challenge_type);
    }
    if let Some(points) = payload.points {
        active.points = Set(points);
    }
    if let Some(instructions) = payload.instructions {
        active.instructions = Set(Some(instructions));
    }
    if let Some(ref hints) = payload.hints {
        active.hints = Set(Some(serde_json::json!(hints)));
    }
    if let Some(media_url) = payload.media_url {
        active.media_url = Set(Some(media_url));
    }
    if let Some(difficulty) = payload.difficulty {
        active.difficulty = Set(difficulty);
    }
    if let Some(estimated_minutes) = payload.estimated_minutes {
        active.estimated_minutes = Set(Some(estimated_minutes));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }
    if let Some(scheduled_date) = payload.scheduled_date {
        active.scheduled_date = Set(Some(scheduled_date));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    let count = service.submission_count(id).await?;
    txn.commit().await?;

    Ok(Json(ChallengeResponse::from_model(model, count)))
}

#[utoipa::path(
    post,
    path = "/challenges/{id}/submissions",
    tag = "Daily Challenges",
    operation_id = "submitChallenge",
    summary = "Submit a response to a challenge",
    description = "One submission per member per challenge; a second attempt yields 400. \
        Draft and cancelled challenges do not accept submissions.",
    params(("id" = i32, Path, description = "Challenge ID")),
    request_body = SubmitChallengeRequest,
    responses(
        (status = 201, description = "Submission recorded", body = SubmissionResponse),
        (status = 400, description = "Closed challenge, empty body, or duplicate (VALIDATION_ERROR, ALREADY_SUBMITTED)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn submit_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SubmitChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_submit_challenge(&payload)?;

    let service = ChallengeService::new(&state.db);
    let model = service.find(id).await?;
    let seasons = SeasonService::new(&state.db);
    seasons
        .require_member(model.season_id, auth_user.user_id())
        .await?;

    let season = seasons.find(model.season_id).await?;
    let payload = annotate_location_distance(&season, &model, payload);
    let submission = service.submit(&model, auth_user.user_id(), payload).await?;

    tracing::info!(submission_id = submission.id, challenge_id = id, "Submission received");
    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(submission))))
}

#[utoipa::path(
    get,
    path = "/challenges/{id}/submissions",
    tag = "Daily Challenges",
    operation_id = "listSubmissions",
    summary = "List a challenge's submissions",
    description = "Season managers see every submission; other members only their own.",
    params(("id" = i32, Path, description = "Challenge ID")),
    responses(
        (status = 200, description = "Submissions", body = Vec<SubmissionResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let service = ChallengeService::new(&state.db);
    let model = service.find(id).await?;
    let member = SeasonService::new(&state.db)
        .require_member(model.season_id, auth_user.user_id())
        .await?;

    let only_user = (!member.is_manager()).then_some(auth_user.user_id());
    let submissions = service.list_submissions(id, only_user).await?;

    Ok(Json(
        submissions.into_iter().map(SubmissionResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/challenges/submissions/{id}/review",
    tag = "Daily Challenges",
    operation_id = "reviewSubmission",
    summary = "Review a submission",
    description = "Season managers set approved/rejected/needs_revision. Approval books the \
        challenge's points (or the override) on the scoreboard, bumps the member's stats, and \
        evaluates badge criteria, all in one transaction. Already-approved submissions cannot \
        be re-reviewed.",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body = ReviewSubmissionRequest,
    responses(
        (status = 200, description = "Review recorded", body = SubmissionResponse),
        (status = 400, description = "Validation error or already approved (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a season manager (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn review_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ReviewSubmissionRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    validate_review_submission(&payload)?;

    let txn = state.db.begin().await?;
    let service = ChallengeService::new(&txn);
    let submission = service.find_submission(id).await?;
    let challenge_model = service.find(submission.challenge_id).await?;
    SeasonService::new(&txn)
        .require_manager(challenge_model.season_id, auth_user.user_id())
        .await?;

    if submission.status == "approved" {
        return Err(AppError::Validation(
            "Submission has already been approved".into(),
        ));
    }

    let submitter = submission.user_id;
    let approved = payload.status == "approved";
    let points = payload.points_awarded.unwrap_or(challenge_model.points);

    let reviewed = service
        .record_review(
            submission,
            auth_user.user_id(),
            &payload.status,
            approved.then_some(points),
            payload.feedback,
        )
        .await?;

    if approved {
        let scoring = ScoringService::new(&txn);
        scoring
            .award(
                submitter,
                challenge_model.season_id,
                Some(challenge_model.id),
                points,
                "challenge_completion",
                &format!("Challenge completed: {}", challenge_model.title),
                None,
                true,
            )
            .await?;
        scoring
            .evaluate_badges(submitter, challenge_model.season_id)
            .await?;
    }

    txn.commit().await?;

    tracing::info!(
        submission_id = id,
        status = %reviewed.status,
        reviewer = auth_user.user_id(),
        "Submission reviewed"
    );
    Ok(Json(SubmissionResponse::from(reviewed)))
}

/// Location challenges get the distance to the season's spot stamped into the
/// submission metadata, so reviewers see how close the find was.
fn annotate_location_distance(
    season: &crate::entity::season::Model,
    challenge_model: &challenge::Model,
    mut payload: SubmitChallengeRequest,
) -> SubmitChallengeRequest {
    if challenge_model.challenge_type != "location" {
        return payload;
    }
    let (Some(season_lat), Some(season_lon)) = (season.latitude, season.longitude) else {
        return payload;
    };

    let coords = payload
        .metadata
        .as_ref()
        .and_then(|m| Some((m.get("latitude")?.as_f64()?, m.get("longitude")?.as_f64()?)));

    if let (Some((lat, lon)), Some(serde_json::Value::Object(meta))) =
        (coords, payload.metadata.as_mut())
    {
        let km = crate::utils::geo::distance_km(season_lat, season_lon, lat, lon);
        meta.insert("distance_km".to_string(), serde_json::json!(km));
    }
    payload
}

use axum::{Json, extract::Path, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::MeResponse;
use crate::models::profile::{
    CreateProfileRequest, ProfileResponse, PublicUserResponse, UpdateAccountRequest,
    UpdateProfileRequest, validate_create_profile, validate_update_account,
    validate_update_profile,
};
use crate::services::user::UserService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/profiles/me",
    tag = "User Profiles",
    operation_id = "getOwnAccount",
    summary = "Current account details",
    responses(
        (status = 200, description = "Account", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id()))]
pub async fn get_own_account(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse::from(auth_user.user))
}

#[utoipa::path(
    put,
    path = "/profiles/me",
    tag = "User Profiles",
    operation_id = "updateOwnAccount",
    summary = "Update the current account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account", body = MeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id()))]
pub async fn update_own_account(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateAccountRequest>,
) -> Result<Json<MeResponse>, AppError> {
    validate_update_account(&payload)?;

    let service = UserService::new(&state.db);
    let updated = service.update_account(auth_user.user, payload).await?;
    Ok(Json(MeResponse::from(updated)))
}

#[utoipa::path(
    post,
    path = "/profiles/me/profile",
    tag = "User Profiles",
    operation_id = "createOwnProfile",
    summary = "Create the current user's profile",
    description = "Each account has at most one profile; creating a second yields 400.",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Profile exists or validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id()))]
pub async fn create_own_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_profile(&payload)?;

    let service = UserService::new(&state.db);
    let profile = service.create_profile(auth_user.user_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

#[utoipa::path(
    put,
    path = "/profiles/me/profile",
    tag = "User Profiles",
    operation_id = "updateOwnProfile",
    summary = "Update the current user's profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No profile yet (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id()))]
pub async fn update_own_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    validate_update_profile(&payload)?;

    let service = UserService::new(&state.db);
    let profile = service.update_profile(auth_user.user_id(), payload).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/profiles/{user_id}",
    tag = "User Profiles",
    operation_id = "getUser",
    summary = "View another user",
    description = "Returns the account's public face. The profile body is included only when its \
        owner made it public.",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = PublicUserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(user_id))]
pub async fn get_user(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<PublicUserResponse>, AppError> {
    let service = UserService::new(&state.db);
    let user = service.find_user(user_id).await?;
    let profile = service.find_profile(user_id).await?;
    Ok(Json(PublicUserResponse::new(user, profile)))
}

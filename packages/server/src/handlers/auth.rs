use axum::{Json, extract::Path, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LogoutResponse, MeResponse, OAuthRequest, RefreshTokenRequest, RegisterRequest,
    TokenResponse, validate_login_request, validate_oauth_request, validate_register_request,
};
use crate::services::auth::AuthService;
use crate::state::AppState;
use crate::utils::oauth::{self, Provider};

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    operation_id = "register",
    summary = "Register a new account",
    description = "Creates a local account from email and password and returns the token pair. \
        Mismatched password confirmation and duplicate email both yield 400.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR, EMAIL_REGISTERED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let service = AuthService::new(&state.db, &state.config.auth);
    let user = service
        .register(&payload.email, payload.username.as_deref(), &payload.password)
        .await?;

    tracing::info!(user_id = user.id, "User registered");
    let tokens = service.token_response(user)?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    operation_id = "login",
    summary = "Log in with email and password",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials or disabled account (INVALID_CREDENTIALS, ACCOUNT_DISABLED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate_login_request(&payload)?;

    let service = AuthService::new(&state.db, &state.config.auth);
    let user = service.login(&payload.email, &payload.password).await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(service.token_response(user)?))
}

#[utoipa::path(
    post,
    path = "/auth/oauth/{provider}",
    tag = "Authentication",
    operation_id = "oauthLogin",
    summary = "Log in via an OAuth provider",
    description = "Exchanges an authorization code with Google or Microsoft and links or creates \
        the matching account. Provider failures pass through as 401; there is no retry.",
    params(("provider" = String, Path, description = "OAuth provider: google or microsoft")),
    request_body = OAuthRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 400, description = "Unknown provider or validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Provider rejected the exchange (OAUTH_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(provider = %provider))]
pub async fn oauth_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    AppJson(payload): AppJson<OAuthRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate_oauth_request(&payload)?;
    let provider = Provider::parse(&provider)?;

    let identity = oauth::fetch_identity(
        &state.http,
        &state.config.oauth,
        provider,
        &payload.code,
        &payload.redirect_uri,
    )
    .await?;

    let service = AuthService::new(&state.db, &state.config.auth);
    let user = service.oauth_login(provider.as_str(), &identity).await?;

    tracing::info!(user_id = user.id, provider = provider.as_str(), "OAuth login");
    Ok(Json(service.token_response(user)?))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Authentication",
    operation_id = "refreshToken",
    summary = "Exchange a refresh token for a new token pair",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 401, description = "Invalid refresh token (TOKEN_INVALID, ACCOUNT_DISABLED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn refresh_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let service = AuthService::new(&state.db, &state.config.auth);
    let user = service.refresh(&payload.refresh_token).await?;
    Ok(Json(service.token_response(user)?))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    operation_id = "logout",
    summary = "Log out",
    description = "Tokens are stateless and simply expire; logout is recorded for auditing.",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id()))]
pub async fn logout(auth_user: AuthUser) -> Json<LogoutResponse> {
    tracing::info!(user_id = auth_user.user_id(), "User logged out");
    Json(LogoutResponse {
        message: "Logged out successfully",
    })
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    operation_id = "me",
    summary = "Current account",
    responses(
        (status = 200, description = "Authenticated account", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id()))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse::from(auth_user.user))
}

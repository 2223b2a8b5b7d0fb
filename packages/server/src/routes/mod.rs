use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/profiles", profile_routes())
        .nest("/seasons", season_routes())
        .nest("/challenges", challenge_routes())
        .nest("/scoring", scoring_routes())
        .nest("/ai", ai_routes())
        .nest("/media", media_routes())
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/live", get(handlers::health::liveness_check))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/oauth/{provider}", post(handlers::auth::oauth_login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(handlers::profile::get_own_account).put(handlers::profile::update_own_account),
        )
        .route(
            "/me/profile",
            post(handlers::profile::create_own_profile)
                .put(handlers::profile::update_own_profile),
        )
        .route("/{user_id}", get(handlers::profile::get_user))
}

fn season_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::season::list_seasons).post(handlers::season::create_season),
        )
        .route("/join", post(handlers::season::join_by_code))
        .route(
            "/{id}",
            get(handlers::season::get_season)
                .patch(handlers::season::update_season)
                .delete(handlers::season::delete_season),
        )
        .route("/{id}/join", post(handlers::season::join_season))
        .route("/{id}/members", get(handlers::season::list_members))
}

fn challenge_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::challenge::list_challenges).post(handlers::challenge::create_challenge),
        )
        .route(
            "/{id}",
            get(handlers::challenge::get_challenge).patch(handlers::challenge::update_challenge),
        )
        .route(
            "/{id}/submissions",
            get(handlers::challenge::list_submissions)
                .post(handlers::challenge::submit_challenge),
        )
        .route(
            "/submissions/{id}/review",
            post(handlers::challenge::review_submission),
        )
}

fn scoring_routes() -> Router<AppState> {
    Router::new()
        .route("/award-points", post(handlers::scoring::award_points))
        .route(
            "/leaderboard/{season_id}",
            get(handlers::scoring::season_leaderboard),
        )
        .route("/stats/{user_id}", get(handlers::scoring::user_stats))
        .route("/badges", get(handlers::scoring::list_badges))
        .route("/my-badges", get(handlers::scoring::my_badges))
}

fn ai_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/generate-challenge",
            post(handlers::ai::generate_challenge),
        )
        .route(
            "/analyze-submission",
            post(handlers::ai::analyze_submission),
        )
        .route("/suggestions", get(handlers::ai::challenge_suggestions))
}

fn media_routes() -> Router<AppState> {
    let upload = Router::new()
        .route("/", post(handlers::media::upload_media))
        .layer(handlers::media::upload_body_limit());

    upload.route("/{id}", get(handlers::media::download_media))
}

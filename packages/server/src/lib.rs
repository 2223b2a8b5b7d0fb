pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lakeside API",
        version = "1.0.0",
        description = "API for gamified family vacation challenges"
    ),
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::health::liveness_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::oauth_login,
        handlers::auth::refresh_token,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::profile::get_own_account,
        handlers::profile::update_own_account,
        handlers::profile::create_own_profile,
        handlers::profile::update_own_profile,
        handlers::profile::get_user,
        handlers::season::list_seasons,
        handlers::season::create_season,
        handlers::season::get_season,
        handlers::season::update_season,
        handlers::season::delete_season,
        handlers::season::join_by_code,
        handlers::season::join_season,
        handlers::season::list_members,
        handlers::challenge::create_challenge,
        handlers::challenge::list_challenges,
        handlers::challenge::get_challenge,
        handlers::challenge::update_challenge,
        handlers::challenge::submit_challenge,
        handlers::challenge::list_submissions,
        handlers::challenge::review_submission,
        handlers::scoring::award_points,
        handlers::scoring::season_leaderboard,
        handlers::scoring::user_stats,
        handlers::scoring::list_badges,
        handlers::scoring::my_badges,
        handlers::ai::generate_challenge,
        handlers::ai::analyze_submission,
        handlers::ai::challenge_suggestions,
        handlers::media::upload_media,
        handlers::media::download_media,
    ),
    tags(
        (name = "Health", description = "Service health probes"),
        (name = "Authentication", description = "Registration, login, OAuth, tokens"),
        (name = "User Profiles", description = "Accounts and display profiles"),
        (name = "Holiday Seasons", description = "Vacation seasons and membership"),
        (name = "Daily Challenges", description = "Challenges, submissions, review"),
        (name = "Scoring & Leaderboards", description = "Points, rankings, badges"),
        (name = "AI Content Generation", description = "Generated challenge content"),
        (name = "Media", description = "Uploaded photos and videos"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the application router.
///
/// Interactive docs are only mounted outside production.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config);
    let production = state.config.is_production();

    let router = routes::api_routes().layer(cors).with_state(state);

    if production {
        router
    } else {
        router.merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
    }
}

fn cors_layer(config: &crate::config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors
        .allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.server.cors.max_age))
}

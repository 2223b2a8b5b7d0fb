use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::ai::{
    AnalyzeSubmissionRequest, ChallengeSuggestion, GenerateChallengeRequest,
    GeneratedChallengeResponse, SubmissionAnalysisResponse, SuggestionsResponse,
    validate_generate_challenge,
};

// Placeholder generation, pending a real model integration. The endpoint
// contracts are stable so the frontend can build against them.

#[utoipa::path(
    post,
    path = "/ai/generate-challenge",
    tag = "AI Content Generation",
    operation_id = "generateChallenge",
    summary = "Generate challenge content for a theme",
    request_body = GenerateChallengeRequest,
    responses(
        (status = 200, description = "Generated content", body = GeneratedChallengeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_auth_user, payload), fields(theme = %payload.theme))]
pub async fn generate_challenge(
    _auth_user: AuthUser,
    AppJson(payload): AppJson<GenerateChallengeRequest>,
) -> Result<Json<GeneratedChallengeResponse>, AppError> {
    validate_generate_challenge(&payload)?;

    let theme = payload.theme.trim();
    Ok(Json(GeneratedChallengeResponse {
        title: format!("Create a challenge about {theme}"),
        description: format!(
            "A {difficulty}-star challenge around {theme}",
            difficulty = payload.difficulty
        ),
        instructions: "Complete this challenge by following the steps below.".to_string(),
        hints: vec!["Take your time".to_string(), "Be creative".to_string()],
    }))
}

#[utoipa::path(
    post,
    path = "/ai/analyze-submission",
    tag = "AI Content Generation",
    operation_id = "analyzeSubmission",
    summary = "Analyze submission content",
    request_body = AnalyzeSubmissionRequest,
    responses(
        (status = 200, description = "Analysis", body = SubmissionAnalysisResponse),
        (status = 400, description = "Empty content (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_auth_user, payload))]
pub async fn analyze_submission(
    _auth_user: AuthUser,
    AppJson(payload): AppJson<AnalyzeSubmissionRequest>,
) -> Result<Json<SubmissionAnalysisResponse>, AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Submission content cannot be empty".into(),
        ));
    }

    Ok(Json(SubmissionAnalysisResponse {
        score: 85,
        feedback: "Nice work!".to_string(),
        suggestions: vec!["Keep it up".to_string()],
    }))
}

#[utoipa::path(
    get,
    path = "/ai/suggestions",
    tag = "AI Content Generation",
    operation_id = "challengeSuggestions",
    summary = "Challenge suggestions",
    responses(
        (status = 200, description = "Suggestions", body = SuggestionsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(_auth_user))]
pub async fn challenge_suggestions(_auth_user: AuthUser) -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: vec![
            ChallengeSuggestion {
                theme: "Nature".to_string(),
                difficulty: 2,
                description: "Find an interesting natural object and tell its story".to_string(),
            },
            ChallengeSuggestion {
                theme: "Creativity".to_string(),
                difficulty: 3,
                description: "Make something new out of everyday objects".to_string(),
            },
            ChallengeSuggestion {
                theme: "Movement".to_string(),
                difficulty: 1,
                description: "Learn a new move or gesture".to_string(),
            },
        ],
    })
}

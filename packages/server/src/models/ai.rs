use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct GenerateChallengeRequest {
    #[schema(example = "Nature")]
    pub theme: String,
    /// 1 (easy) to 5 (hard).
    #[schema(example = 2)]
    pub difficulty: i32,
}

pub fn validate_generate_challenge(payload: &GenerateChallengeRequest) -> Result<(), AppError> {
    if payload.theme.trim().is_empty() {
        return Err(AppError::Validation("theme must not be empty".into()));
    }
    if !(1..=5).contains(&payload.difficulty) {
        return Err(AppError::Validation(
            "Difficulty must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GeneratedChallengeResponse {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub hints: Vec<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AnalyzeSubmissionRequest {
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionAnalysisResponse {
    /// 0-100 quality estimate.
    pub score: i32,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChallengeSuggestion {
    pub theme: String,
    pub difficulty: i32,
    pub description: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<ChallengeSuggestion>,
}

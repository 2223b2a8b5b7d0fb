use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::storage::StorageError;
use crate::utils::oauth::OAuthError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `EMAIL_REGISTERED`,
    /// `ALREADY_MEMBER`, `ALREADY_SUBMITTED`, `TOKEN_MISSING`, `TOKEN_INVALID`,
    /// `INVALID_CREDENTIALS`, `ACCOUNT_DISABLED`, `OAUTH_FAILED`, `PERMISSION_DENIED`,
    /// `NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Passwords do not match")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    EmailRegistered,
    AlreadyMember,
    AlreadySubmitted,
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    AccountDisabled,
    OAuthFailed(String),
    PermissionDenied,
    NotFound(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::EmailRegistered => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "EMAIL_REGISTERED",
                    message: "Email is already registered".into(),
                },
            ),
            AppError::AlreadyMember => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "ALREADY_MEMBER",
                    message: "Already a member of this season".into(),
                },
            ),
            AppError::AlreadySubmitted => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "ALREADY_SUBMITTED",
                    message: "A submission for this challenge already exists".into(),
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid email or password".into(),
                },
            ),
            AppError::AccountDisabled => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "ACCOUNT_DISABLED",
                    message: "Account is deactivated".into(),
                },
            ),
            AppError::OAuthFailed(detail) => {
                tracing::warn!("OAuth authentication failed: {}", detail);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody {
                        code: "OAUTH_FAILED",
                        message: "OAuth authentication failed".into(),
                    },
                )
            }
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(hash) => {
                AppError::NotFound(format!("Media content {hash} not found"))
            }
            StorageError::SizeLimitExceeded { actual, limit } => AppError::Validation(format!(
                "Upload of {actual} bytes exceeds the {limit} byte limit"
            )),
            StorageError::InvalidHash(msg) => AppError::Validation(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<OAuthError> for AppError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::UnsupportedProvider(name) => {
                AppError::Validation(format!("Unsupported OAuth provider '{name}'"))
            }
            OAuthError::NotConfigured(name) => {
                AppError::Validation(format!("OAuth provider '{name}' is not configured"))
            }
            other => AppError::OAuthFailed(other.to_string()),
        }
    }
}

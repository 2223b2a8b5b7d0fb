use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 4)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 1)]
    pub total_pages: u64,
}

/// Validate a required trimmed string field against a character-count range.
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let count = value.trim().chars().count();
    if count < min || count > max {
        return Err(AppError::Validation(format!(
            "{field} must be {min}-{max} characters"
        )));
    }
    Ok(())
}

/// Structural email check: one `@` with non-empty local part and a dotted
/// domain. Deliverability is the mail system's problem.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = email.len() <= 255
        && matches!(email.split_once('@'), Some((local, domain))
            if !local.is_empty()
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
                && !email.contains(char::is_whitespace));
    if !valid {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

/// Validate that a value is one of an allowed set.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), AppError> {
    if !allowed.contains(&value) {
        return Err(AppError::Validation(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Validate an optional URL-ish field: bounded length, http(s) scheme.
pub fn validate_url_field(field: &str, value: &str) -> Result<(), AppError> {
    if value.len() > 500 || !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(AppError::Validation(format!(
            "{field} must be an http(s) URL of at most 500 characters"
        )));
    }
    Ok(())
}

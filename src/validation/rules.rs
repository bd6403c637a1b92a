//! Field rules shared by the request contracts.
//!
//! Each rule returns a `validator::ValidationError` whose message is the
//! human-readable text reported to the client.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    // Workspace slugs: lowercase letters, digits and hyphens
    static ref SLUG_REGEX: Regex =
        Regex::new(r"^[a-z0-9-]+$").expect("SLUG_REGEX should be a valid regex pattern");

    // Email validation: basic RFC 5322 compliant pattern
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("EMAIL_REGEX should be a valid regex pattern");
}

pub const WORKSPACE_NAME_MAX: usize = 100;
pub const WORKSPACE_SLUG_MAX: usize = 50;
pub const PROJECT_NAME_MAX: usize = 200;
pub const PROJECT_DESCRIPTION_MAX: usize = 2_000;
pub const TASK_TITLE_MAX: usize = 500;
pub const TASK_DESCRIPTION_MAX: usize = 10_000;
pub const EMAIL_MAX: usize = 254;
pub const DISPLAY_NAME_MAX: usize = 200;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 100;

fn failure(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

/// Length check in characters, bounds inclusive.
///
/// Callers pass already-trimmed text.
pub fn bounded_text(
    value: &str,
    label: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length < min {
        let message = if min == 1 {
            format!("{} is required", label)
        } else {
            format!("{} must be at least {} characters", label, min)
        };
        return Err(failure("length", message));
    }
    if length > max {
        return Err(failure("length", format!("{} must be {} characters or less", label, max)));
    }
    Ok(())
}

/// Validate a workspace slug
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    bounded_text(slug, "Slug", 1, WORKSPACE_SLUG_MAX)?;
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(failure(
            "slug",
            "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
        ))
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    bounded_text(email, "Email", 1, EMAIL_MAX)?;
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(failure("email", "Invalid email address".to_string()))
    }
}

pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page >= 1 {
        Ok(())
    } else {
        Err(failure("range", "Page must be at least 1".to_string()))
    }
}

pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if (1..=MAX_LIMIT).contains(&limit) {
        Ok(())
    } else {
        Err(failure("range", format!("Limit must be between 1 and {}", MAX_LIMIT)))
    }
}

//! Session request contracts.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::auth::SessionIdentity;
use crate::validation::rules::{bounded_text, validate_email, DISPLAY_NAME_MAX};
use crate::validation::{PayloadReader, RequestContract, Validated};

/// Identity an upstream proxy has already verified, submitted to open a session.
///
/// `name` falls back to the email address when left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSessionRequest {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

impl IssueSessionRequest {
    pub fn into_identity(self) -> SessionIdentity {
        SessionIdentity { user_id: self.user_id, email: self.email, name: self.name }
    }
}

impl Validate for IssueSessionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.user_id.is_nil() {
            errors.add(
                "userId",
                ValidationError::new("uuid").with_message("User ID cannot be the nil UUID".into()),
            );
        }
        if let Err(err) = validate_email(&self.email) {
            errors.add("email", err);
        }
        if let Err(err) = bounded_text(&self.name, "Name", 1, DISPLAY_NAME_MAX) {
            errors.add("name", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RequestContract for IssueSessionRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let user_id = reader.required_uuid("userId", "User ID");
        let email = reader.required_string("email", "Email").to_lowercase();
        let name = reader
            .optional_string("name", "Name")
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email.clone());
        reader.finish(Self { user_id, email, name })
    }
}

/// Logout options; an empty body revokes only the presented session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub all_sessions: bool,
}

impl Validate for LogoutRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl RequestContract for LogoutRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let all_sessions = reader.optional_bool("all_sessions", "all_sessions").unwrap_or_default();
        reader.finish(Self { all_sessions })
    }
}

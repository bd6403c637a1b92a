//! Workspace request contracts.

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::MemberRole;
use crate::validation::rules::{bounded_text, validate_email, validate_slug, WORKSPACE_NAME_MAX};
use crate::validation::{PayloadReader, RequestContract, Validated};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub slug: String,
}

impl Validate for CreateWorkspaceRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = bounded_text(&self.name, "Name", 1, WORKSPACE_NAME_MAX) {
            errors.add("name", err);
        }
        if let Err(err) = validate_slug(&self.slug) {
            errors.add("slug", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RequestContract for CreateWorkspaceRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self {
            name: reader.required_string("name", "Name"),
            slug: reader.required_string("slug", "Slug"),
        };
        reader.finish(request)
    }
}

/// Partial workspace update; absent fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateWorkspaceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl UpdateWorkspaceRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none()
    }
}

impl Validate for UpdateWorkspaceRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &self.name {
            if let Err(err) = bounded_text(name, "Name", 1, WORKSPACE_NAME_MAX) {
                errors.add("name", err);
            }
        }
        if let Some(slug) = &self.slug {
            if let Err(err) = validate_slug(slug) {
                errors.add("slug", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RequestContract for UpdateWorkspaceRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self {
            name: reader.patch_string("name", "Name"),
            slug: reader.patch_string("slug", "Slug"),
        };
        reader.finish(request)
    }
}

/// Invitation of a user into a workspace by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: MemberRole,
}

impl Validate for InviteMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = validate_email(&self.email) {
            errors.add("email", err);
        }
        if !self.role.is_invitable() {
            errors.add(
                "role",
                ValidationError::new("role").with_message(
                    format!("Role must be one of: {}", MemberRole::INVITABLE.join(", ")).into(),
                ),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RequestContract for InviteMemberRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let email = reader.required_string("email", "Email").to_lowercase();
        let role = reader
            .optional_enum("role", "Role", &MemberRole::INVITABLE)
            .unwrap_or(MemberRole::Member);
        reader.finish(Self { email, role })
    }
}

//! Project request contracts.

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::domain::ProjectStatus;
use crate::validation::rules::{bounded_text, PROJECT_DESCRIPTION_MAX, PROJECT_NAME_MAX};
use crate::validation::{PayloadReader, RequestContract, Validated};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for CreateProjectRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = bounded_text(&self.name, "Name", 1, PROJECT_NAME_MAX) {
            errors.add("name", err);
        }
        if let Some(description) = &self.description {
            if let Err(err) = bounded_text(description, "Description", 0, PROJECT_DESCRIPTION_MAX) {
                errors.add("description", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RequestContract for CreateProjectRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self {
            name: reader.required_string("name", "Name"),
            description: reader.optional_string("description", "Description"),
        };
        reader.finish(request)
    }
}

/// Partial project update.
///
/// `description: Some(None)` clears the description; `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl UpdateProjectRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

impl Validate for UpdateProjectRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &self.name {
            if let Err(err) = bounded_text(name, "Name", 1, PROJECT_NAME_MAX) {
                errors.add("name", err);
            }
        }
        if let Some(Some(description)) = &self.description {
            if let Err(err) = bounded_text(description, "Description", 0, PROJECT_DESCRIPTION_MAX) {
                errors.add("description", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RequestContract for UpdateProjectRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self {
            name: reader.patch_string("name", "Name"),
            description: reader.nullable_string("description", "Description"),
            status: reader.patch_enum("status", "Status", &ProjectStatus::ALL),
        };
        reader.finish(request)
    }
}

//! Task request contracts.
//!
//! Status is accepted as any [`TaskStatus`] value regardless of the task's
//! current one; workflow transitions are not policed here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::domain::{TaskPriority, TaskStatus, TaskVisibility};
use crate::validation::rules::{
    bounded_text, validate_limit, validate_page, DEFAULT_LIMIT, DEFAULT_PAGE, TASK_DESCRIPTION_MAX,
    TASK_TITLE_MAX,
};
use crate::validation::{PayloadReader, RequestContract, Validated};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskRequest {
    pub project_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub visibility: TaskVisibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_id: Option<Uuid>,
}

impl Validate for CreateTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = bounded_text(&self.title, "Title", 1, TASK_TITLE_MAX) {
            errors.add("title", err);
        }
        if let Some(description) = &self.description {
            if let Err(err) = bounded_text(description, "Description", 0, TASK_DESCRIPTION_MAX) {
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

impl RequestContract for CreateTaskRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self {
            project_id: reader.required_uuid("project_id", "Project ID"),
            title: reader.required_string("title", "Title"),
            description: reader.optional_string("description", "Description"),
            priority: reader
                .optional_enum("priority", "Priority", &TaskPriority::ALL)
                .unwrap_or_default(),
            visibility: reader
                .optional_enum("visibility", "Visibility", &TaskVisibility::ALL)
                .unwrap_or_default(),
            due_date: reader.optional_datetime("due_date", "Due date"),
            assigned_to_user_id: reader.optional_uuid("assigned_to_user_id", "Assignee ID"),
        };
        reader.finish(request)
    }
}

/// Partial task update.
///
/// Nullable fields use `Option<Option<_>>`: outer `None` leaves the field
/// unchanged, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<TaskVisibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_id: Option<Option<Uuid>>,
}

impl UpdateTaskRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Validate for UpdateTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            if let Err(err) = bounded_text(title, "Title", 1, TASK_TITLE_MAX) {
                errors.add("title", err);
            }
        }
        if let Some(Some(description)) = &self.description {
            if let Err(err) = bounded_text(description, "Description", 0, TASK_DESCRIPTION_MAX) {
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

impl RequestContract for UpdateTaskRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self {
            title: reader.patch_string("title", "Title"),
            description: reader.nullable_string("description", "Description"),
            status: reader.patch_enum("status", "Status", &TaskStatus::ALL),
            priority: reader.patch_enum("priority", "Priority", &TaskPriority::ALL),
            visibility: reader.patch_enum("visibility", "Visibility", &TaskVisibility::ALL),
            due_date: reader.nullable_datetime("due_date", "Due date"),
            assigned_to_user_id: reader.nullable_uuid("assigned_to_user_id", "Assignee ID"),
        };
        reader.finish(request)
    }
}

/// Assign a task to a user, or unassign it with `user_id: null`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignTaskRequest {
    pub user_id: Option<Uuid>,
}

impl Validate for AssignTaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl RequestContract for AssignTaskRequest {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self { user_id: reader.required_nullable_uuid("user_id", "User ID") };
        reader.finish(request)
    }
}

/// Query parameters of the task listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFilters {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

impl Default for TaskFilters {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT, status: None, priority: None, project_id: None }
    }
}

impl TaskFilters {
    /// Number of rows to skip for the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

impl Validate for TaskFilters {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(err) = validate_page(self.page) {
            errors.add("page", err);
        }
        if let Err(err) = validate_limit(self.limit) {
            errors.add("limit", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RequestContract for TaskFilters {
    fn validate_payload(payload: &Value) -> Validated<Self> {
        let mut reader = PayloadReader::new(payload);
        let request = Self {
            page: reader.count("page", "Page").map_or(DEFAULT_PAGE, clamp_to_u32),
            limit: reader.count("limit", "Limit").map_or(DEFAULT_LIMIT, clamp_to_u32),
            status: reader.optional_enum("status", "Status", &TaskStatus::ALL),
            priority: reader.optional_enum("priority", "Priority", &TaskPriority::ALL),
            project_id: reader.optional_uuid("project_id", "Project ID"),
        };
        reader.finish(request)
    }
}

//! Domain layer
//!
//! Value types shared by the request contracts: the enumerations that
//! workspace, project and task payloads are checked against. The entities
//! themselves live behind the API and are not modelled here.

pub mod project;
pub mod task;
pub mod workspace;

pub use project::ProjectStatus;
pub use task::{TaskPriority, TaskStatus, TaskVisibility};
pub use workspace::MemberRole;

use thiserror::Error;

/// Error returned when a string is not one of an enumeration's values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str, allowed: &[&str]) -> Self {
        Self { kind, value: value.to_string(), expected: allowed.join(", ") }
    }
}

//! # Validation Module
//!
//! Request contracts for workspace, project and task payloads.
//!
//! A contract takes the untyped JSON body (or query map) a handler received
//! and returns either the normalized, defaulted request or every violation
//! found, as `(path, message)` pairs. Checking happens in two layers:
//! 1. Shape, read field by field with [`PayloadReader`] (types, UUIDs, enums, nulls)
//! 2. Rules, via `validator::Validate` on the typed request (lengths, patterns, ranges)
//!
//! Both layers report into the same [`FieldErrors`], with at most one message
//! per path. Failing input is a value, never a panic or an `Err` of the crate
//! error type.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

pub mod reader;
pub mod requests;
pub mod rules;

pub use reader::PayloadReader;
pub use requests::*;

/// Outcome of applying a request contract
pub type Validated<T> = std::result::Result<T, FieldErrors>;

/// A single violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Every violation found in a payload, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("validation failed: {}", summarize(.0))]
pub struct FieldErrors(Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("{}: {}", e.path, e.message)).collect::<Vec<_>>().join("; ")
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation unless `path` already has one
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let path = path.into();
        if !self.contains(&path) {
            self.0.push(FieldError { path, message: message.into() });
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }

    /// Message recorded for `path`
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.iter().find(|e| e.path == path).map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// Fold rule failures reported by `validator` into this list.
    ///
    /// Paths that already carry a shape error keep it; rule failures are
    /// appended sorted by path so output is stable.
    pub fn merge(&mut self, errors: ValidationErrors) {
        let mut found: Vec<(String, String)> = errors
            .field_errors()
            .iter()
            .filter_map(|(field, errors)| {
                errors.first().map(|error| {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| format!("Invalid {}", field), |m| m.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        found.sort();

        for (path, message) in found {
            self.push(path, message);
        }
    }

    /// `Ok(value)` when nothing was recorded
    pub fn into_result<T>(self, value: T) -> Validated<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A request shape that can be checked from an untyped payload
pub trait RequestContract: Sized {
    fn validate_payload(payload: &Value) -> Validated<Self>;
}

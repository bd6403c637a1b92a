//! Field-by-field reading of untyped payloads.
//!
//! Every accessor records a shape error against the field's path and returns
//! `None` when the value is unusable, so a contract can keep reading and
//! report all problems at once. Strings come back trimmed.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use super::{FieldErrors, Validated};

/// Path used when the payload itself is not an object
pub const ROOT_PATH: &str = "$";

pub struct PayloadReader<'a> {
    fields: Option<&'a Map<String, Value>>,
    errors: FieldErrors,
}

/// What a key held
enum Slot<'a> {
    Absent,
    Null,
    Present(&'a Value),
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a Value) -> Self {
        let mut errors = FieldErrors::new();
        let fields = payload.as_object();
        if fields.is_none() {
            errors.push(ROOT_PATH, "Request body must be a JSON object");
        }
        Self { fields, errors }
    }

    fn slot(&self, key: &str) -> Slot<'a> {
        match self.fields.and_then(|fields| fields.get(key)) {
            None => Slot::Absent,
            Some(Value::Null) => Slot::Null,
            Some(value) => Slot::Present(value),
        }
    }

    fn text(&mut self, key: &str, label: &str, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(text) => Some(text.trim().to_string()),
            None => {
                self.errors.push(key, format!("{} must be a string", label));
                None
            }
        }
    }

    fn parse_uuid(&mut self, key: &str, label: &str, value: &Value) -> Option<Uuid> {
        let text = self.text(key, label, value)?;
        match Uuid::parse_str(&text) {
            Ok(id) => Some(id),
            Err(_) => {
                self.errors.push(key, format!("{} must be a valid UUID", label));
                None
            }
        }
    }

    fn parse_datetime(&mut self, key: &str, label: &str, value: &Value) -> Option<DateTime<Utc>> {
        let text = self.text(key, label, value)?;
        match DateTime::parse_from_rfc3339(&text) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(_) => {
                self.errors.push(key, format!("{} must be an ISO-8601 datetime", label));
                None
            }
        }
    }

    fn parse_enum<T: FromStr>(
        &mut self,
        key: &str,
        label: &str,
        allowed: &[&str],
        value: &Value,
    ) -> Option<T> {
        let text = self.text(key, label, value)?;
        match text.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.errors.push(key, format!("{} must be one of: {}", label, allowed.join(", ")));
                None
            }
        }
    }

    fn not_null(&mut self, key: &str, label: &str) {
        self.errors.push(key, format!("{} cannot be null", label));
    }

    /// A string that must be present. A missing or null value records
    /// "`label` is required" and yields an empty string so rule checks can
    /// still run on the rest of the request.
    pub fn required_string(&mut self, key: &str, label: &str) -> String {
        match self.slot(key) {
            Slot::Absent | Slot::Null => {
                self.errors.push(key, format!("{} is required", label));
                String::new()
            }
            Slot::Present(value) => self.text(key, label, value).unwrap_or_default(),
        }
    }

    /// A string that may be left out; null counts as left out
    pub fn optional_string(&mut self, key: &str, label: &str) -> Option<String> {
        match self.slot(key) {
            Slot::Absent | Slot::Null => None,
            Slot::Present(value) => self.text(key, label, value),
        }
    }

    /// A partial-update string that cannot be cleared
    pub fn patch_string(&mut self, key: &str, label: &str) -> Option<String> {
        match self.slot(key) {
            Slot::Absent => None,
            Slot::Null => {
                self.not_null(key, label);
                None
            }
            Slot::Present(value) => self.text(key, label, value),
        }
    }

    /// A partial-update string where null clears the field
    pub fn nullable_string(&mut self, key: &str, label: &str) -> Option<Option<String>> {
        match self.slot(key) {
            Slot::Absent => None,
            Slot::Null => Some(None),
            Slot::Present(value) => self.text(key, label, value).map(Some),
        }
    }

    /// A UUID that must be present. Failures yield the nil UUID as a placeholder.
    pub fn required_uuid(&mut self, key: &str, label: &str) -> Uuid {
        match self.slot(key) {
            Slot::Absent | Slot::Null => {
                self.errors.push(key, format!("{} is required", label));
                Uuid::nil()
            }
            Slot::Present(value) => self.parse_uuid(key, label, value).unwrap_or_default(),
        }
    }

    pub fn optional_uuid(&mut self, key: &str, label: &str) -> Option<Uuid> {
        match self.slot(key) {
            Slot::Absent | Slot::Null => None,
            Slot::Present(value) => self.parse_uuid(key, label, value),
        }
    }

    /// A partial-update UUID where null clears the field
    pub fn nullable_uuid(&mut self, key: &str, label: &str) -> Option<Option<Uuid>> {
        match self.slot(key) {
            Slot::Absent => None,
            Slot::Null => Some(None),
            Slot::Present(value) => self.parse_uuid(key, label, value).map(Some),
        }
    }

    /// A key that must be sent, holding either a UUID or an explicit null
    pub fn required_nullable_uuid(&mut self, key: &str, label: &str) -> Option<Uuid> {
        match self.slot(key) {
            Slot::Absent => {
                self.errors.push(key, format!("{} is required", label));
                None
            }
            Slot::Null => None,
            Slot::Present(value) => self.parse_uuid(key, label, value),
        }
    }

    pub fn optional_datetime(&mut self, key: &str, label: &str) -> Option<DateTime<Utc>> {
        match self.slot(key) {
            Slot::Absent | Slot::Null => None,
            Slot::Present(value) => self.parse_datetime(key, label, value),
        }
    }

    /// A partial-update datetime where null clears the field
    pub fn nullable_datetime(&mut self, key: &str, label: &str) -> Option<Option<DateTime<Utc>>> {
        match self.slot(key) {
            Slot::Absent => None,
            Slot::Null => Some(None),
            Slot::Present(value) => self.parse_datetime(key, label, value).map(Some),
        }
    }

    /// An enumeration value that may be left out; null counts as left out
    pub fn optional_enum<T: FromStr>(
        &mut self,
        key: &str,
        label: &str,
        allowed: &[&str],
    ) -> Option<T> {
        match self.slot(key) {
            Slot::Absent | Slot::Null => None,
            Slot::Present(value) => self.parse_enum(key, label, allowed, value),
        }
    }

    /// A partial-update enumeration value that cannot be cleared
    pub fn patch_enum<T: FromStr>(&mut self, key: &str, label: &str, allowed: &[&str]) -> Option<T> {
        match self.slot(key) {
            Slot::Absent => None,
            Slot::Null => {
                self.not_null(key, label);
                None
            }
            Slot::Present(value) => self.parse_enum(key, label, allowed, value),
        }
    }

    /// A flag that may be left out; null counts as left out
    pub fn optional_bool(&mut self, key: &str, label: &str) -> Option<bool> {
        match self.slot(key) {
            Slot::Absent | Slot::Null => None,
            Slot::Present(Value::Bool(flag)) => Some(*flag),
            Slot::Present(_) => {
                self.errors.push(key, format!("{} must be a boolean", label));
                None
            }
        }
    }

    /// A whole number sent either as a JSON integer or as numeric text,
    /// which is how query strings deliver it.
    pub fn count(&mut self, key: &str, label: &str) -> Option<i64> {
        let value = match self.slot(key) {
            Slot::Absent | Slot::Null => return None,
            Slot::Present(value) => value,
        };

        let parsed = match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.push(key, format!("{} must be an integer", label));
        }
        parsed
    }

    /// Shape errors recorded so far
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Run the request's rule checks and settle the outcome
    pub fn finish<T: Validate>(mut self, request: T) -> Validated<T> {
        if let Err(rules) = request.validate() {
            self.errors.merge(rules);
        }
        self.errors.into_result(request)
    }
}

//! # Error Handling
//!
//! Error types for the Tasklane session service, built on `thiserror`.
//!
//! Request-payload validation failures are not represented here: they are
//! ordinary values (see [`crate::validation::FieldErrors`]) so callers can
//! render every violation at once.

/// Custom result type for Tasklane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Tasklane
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Key-value backend unreachable or rejected an operation
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored record could not be encoded or decoded
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Configuration or argument validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// The operating system random source failed
    #[error("Random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage { message: message.into(), source: None }
    }

    /// Create a storage error with source
    pub fn storage_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Storage { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Add context to an error
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        let context = context.into();
        match &mut self {
            Error::Io { context: ctx, .. } | Error::Serialization { context: ctx, .. } => {
                *ctx = format!("{}: {}", context, ctx);
            }
            Error::Storage { message, .. } => {
                *message = format!("{}: {}", context, message);
            }
            _ => {}
        }
        self
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 500,
            Error::Storage { .. } => 503,
            Error::Serialization { .. } => 500,
            Error::Validation { .. } => 400,
            Error::RandomSource(_) => 500,
            Error::Io { .. } => 500,
        }
    }

    /// Check if the caller may retry the failed operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage { .. } | Error::Io { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(error: redis::RedisError) -> Self {
        Self::storage_with_source("Redis operation failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        fields.sort();

        Self::validation(format!("Validation failed: {}", fields.join("; ")))
    }
}

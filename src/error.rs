//! Error types for tagctl
//!
//! Library code uses `crate::error::Result<T>` which returns `TagctlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling; conversion
//! happens at the CLI boundary and preserves the error chain.
//!
//! Per-resource failures (`Fetch`, `Delete`) never surface through `Result` at
//! the processing boundary — the engine converts them into outcome records and
//! keeps going. Only `Config`, `Environment` and `Cancelled` abort a run.
//!
//! Errors implement `IsRetryable`; the `RetryPolicy` in `src/retry.rs` uses it
//! to decide whether a failed provider call should be attempted again. Only
//! transient provider and I/O failures are retryable — configuration and
//! validation errors fail immediately.

use thiserror::Error;

/// Main error type for tagctl
#[derive(Error, Debug)]
pub enum TagctlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("No {resource_type} found in region {region}")]
    NotFound {
        resource_type: String,
        region: String,
    },

    #[error("Failed to fetch tags for {resource_id}: {message}")]
    Fetch {
        resource_id: String,
        message: String,
    },

    #[error("Failed to delete tags on {resource_id}: {message}")]
    Delete {
        resource_id: String,
        message: String,
    },

    #[error("AWS SDK error: {0}")]
    Aws(String),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("Cancelled by user")]
    Cancelled,

    #[error("Retryable error (attempt {attempt}/{max_attempts}): {reason}")]
    Retryable {
        attempt: u32,
        max_attempts: u32,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),

    #[error("Missing required option: {0}")]
    MissingOption(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TagctlError>;

/// Trait for determining if an error is retryable
///
/// Used by `RetryPolicy` implementations to determine whether an error
/// should trigger a retry attempt.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for TagctlError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            TagctlError::Retryable { .. }
                | TagctlError::Aws(_)
                | TagctlError::Fetch { .. }
                | TagctlError::Delete { .. }
                | TagctlError::Io(_)
        )
    }
}

//! Type definitions for the tag engine
//!
//! All values here are request-scoped; nothing persists across runs.

use serde::{Deserialize, Serialize};

/// A key/value annotation on a cloud resource
///
/// Keys are unique per resource (provider invariant); the value may be an
/// empty string but is never absent once the key exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Per-resource result of one engine pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Tags matched and were deleted on the provider
    Deleted {
        resource_id: String,
        tags: Vec<Tag>,
    },
    /// Tags matched; deletion suppressed by --dry-run
    DryRun {
        resource_id: String,
        tags: Vec<Tag>,
    },
    /// No tag satisfied the criterion (includes resources with zero tags)
    NotMatched { resource_id: String },
    /// Processing failed before any deletion; resource skipped, run continues
    FetchError {
        resource_id: String,
        message: String,
    },
    /// The batch delete failed; nothing was removed for this resource
    DeleteError {
        resource_id: String,
        failed_keys: Vec<String>,
        message: String,
    },
}

impl OperationOutcome {
    pub fn resource_id(&self) -> &str {
        match self {
            OperationOutcome::Deleted { resource_id, .. }
            | OperationOutcome::DryRun { resource_id, .. }
            | OperationOutcome::NotMatched { resource_id }
            | OperationOutcome::FetchError { resource_id, .. }
            | OperationOutcome::DeleteError { resource_id, .. } => resource_id,
        }
    }
}

/// Options controlling one deletion run
#[derive(Debug, Clone)]
pub struct DeleteOptions {
    pub dry_run: bool,
    pub parallel: bool,
    pub workers: usize,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            parallel: false,
            workers: 10,
        }
    }
}

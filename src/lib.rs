//! tagctl library
//!
//! Core functionality for the tagctl CLI: the subnet tag filter & delete
//! engine, aged-resource listing, and inactive load balancer cleanup.

pub mod aged;
pub mod aws_env;
pub mod config;
pub mod error;
pub mod lb;
pub mod provider;
pub mod retry;
pub mod tags;
pub mod validation;

// Re-export commonly used types
pub use tags::criterion::MatchCriterion;
pub use tags::report::Summary;
pub use tags::types::{OperationOutcome, Tag};

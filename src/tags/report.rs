//! Outcome aggregation and reporting
//!
//! `Summary` is produced by an immutable fold over the outcome list; the
//! engine never mutates shared counters while processing.

use crate::tags::types::OperationOutcome;
use console::Style;
use serde::Serialize;

/// Aggregated counts for the final report
///
/// Dry-run matches are counted as successes, identically to real deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub success: usize,
    pub errors: usize,
    pub skipped: usize,
    pub total: usize,
    pub tags_deleted: usize,
}

impl Summary {
    /// Fold outcomes into a summary; `success + errors + skipped == total`
    pub fn from_outcomes(outcomes: &[OperationOutcome]) -> Self {
        outcomes.iter().fold(Summary::default(), |mut acc, outcome| {
            acc.total += 1;
            match outcome {
                OperationOutcome::Deleted { tags, .. } => {
                    acc.success += 1;
                    acc.tags_deleted += tags.len();
                }
                OperationOutcome::DryRun { tags, .. } => {
                    acc.success += 1;
                    acc.tags_deleted += tags.len();
                }
                OperationOutcome::NotMatched { .. } => acc.skipped += 1,
                OperationOutcome::FetchError { .. } | OperationOutcome::DeleteError { .. } => {
                    acc.errors += 1;
                }
            }
            acc
        })
    }

    /// True when the process should exit non-zero
    pub fn has_failures(&self) -> bool {
        self.errors > 0
    }
}

/// Print per-resource outcome lines
pub fn print_outcomes(outcomes: &[OperationOutcome], verbose: bool) {
    let ok = Style::new().green();
    let warn = Style::new().yellow();
    let err = Style::new().red();

    for outcome in outcomes {
        match outcome {
            OperationOutcome::Deleted { resource_id, tags } => {
                println!(
                    "  {} {}: deleted {} tag(s)",
                    ok.apply_to("✓"),
                    resource_id,
                    tags.len()
                );
                if verbose {
                    for tag in tags {
                        println!("      - {}={}", tag.key, tag.value);
                    }
                }
            }
            OperationOutcome::DryRun { resource_id, tags } => {
                println!(
                    "  {} {}: would delete {} tag(s)",
                    warn.apply_to("[DRY RUN]"),
                    resource_id,
                    tags.len()
                );
                for tag in tags {
                    println!("      - {}={}", tag.key, tag.value);
                }
            }
            OperationOutcome::NotMatched { resource_id } => {
                if verbose {
                    println!("  {} {}: no matching tags", warn.apply_to("⊘"), resource_id);
                }
            }
            OperationOutcome::FetchError {
                resource_id,
                message,
            } => {
                println!(
                    "  {} {}: fetch failed: {}",
                    err.apply_to("✗"),
                    resource_id,
                    message
                );
            }
            OperationOutcome::DeleteError {
                resource_id,
                failed_keys,
                message,
            } => {
                println!(
                    "  {} {}: delete failed for [{}]: {}",
                    err.apply_to("✗"),
                    resource_id,
                    failed_keys.join(", "),
                    message
                );
            }
        }
    }
}

/// Print the fixed-format summary block
pub fn print_summary(summary: &Summary, dry_run: bool) {
    println!("{}", "=".repeat(70));
    println!("SUMMARY");
    println!("{}", "=".repeat(70));
    if dry_run {
        println!("Mode:            DRY RUN (no tags were deleted)");
    }
    println!("Processed:       {}", summary.total);
    println!("Matched:         {}", summary.success);
    println!("Skipped:         {}", summary.skipped);
    println!("Errors:          {}", summary.errors);
    println!("Tags affected:   {}", summary.tags_deleted);
    println!("{}", "=".repeat(70));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::types::Tag;

    #[test]
    fn test_summary_conservation() {
        let outcomes = vec![
            OperationOutcome::Deleted {
                resource_id: "subnet-1".to_string(),
                tags: vec![Tag::new("Env", "dev")],
            },
            OperationOutcome::NotMatched {
                resource_id: "subnet-2".to_string(),
            },
            OperationOutcome::FetchError {
                resource_id: "subnet-3".to_string(),
                message: "denied".to_string(),
            },
            OperationOutcome::DryRun {
                resource_id: "subnet-4".to_string(),
                tags: vec![Tag::new("a", "1"), Tag::new("b", "2")],
            },
        ];
        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.success + summary.errors + summary.skipped, summary.total);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.tags_deleted, 3);
    }

    #[test]
    fn test_dry_run_counts_as_success() {
        let outcomes = vec![OperationOutcome::DryRun {
            resource_id: "subnet-1".to_string(),
            tags: vec![Tag::new("Env", "dev")],
        }];
        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(summary.success, 1);
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_has_failures() {
        let outcomes = vec![OperationOutcome::DeleteError {
            resource_id: "subnet-1".to_string(),
            failed_keys: vec!["Env".to_string()],
            message: "throttled".to_string(),
        }];
        let summary = Summary::from_outcomes(&outcomes);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_empty_outcomes() {
        let summary = Summary::from_outcomes(&[]);
        assert_eq!(summary, Summary::default());
        assert!(!summary.has_failures());
    }
}

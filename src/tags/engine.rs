//! Tag filter & delete engine
//!
//! Processes each resource fully (fetch, match, delete) before recording its
//! outcome. Per-resource failures are converted to outcome records at this
//! boundary and never abort the run.
//!
//! The parallel path admits at most `workers` resources in flight through a
//! semaphore-gated task set; outcomes are aggregated only after every task
//! has joined, and there is no cancellation or per-task deadline.

use crate::error::{Result, TagctlError};
use crate::provider::TagProvider;
use crate::tags::criterion::{matches, MatchCriterion};
use crate::tags::types::{DeleteOptions, OperationOutcome};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Run the engine over the working set
pub async fn process_subnets(
    provider: Arc<dyn TagProvider>,
    subnet_ids: &[String],
    criterion: &MatchCriterion,
    options: &DeleteOptions,
) -> Result<Vec<OperationOutcome>> {
    if options.parallel {
        process_parallel(provider, subnet_ids, criterion, options).await
    } else {
        let mut outcomes = Vec::with_capacity(subnet_ids.len());
        for id in subnet_ids {
            outcomes.push(process_one(provider.as_ref(), id, criterion, options.dry_run).await);
        }
        Ok(outcomes)
    }
}

async fn process_parallel(
    provider: Arc<dyn TagProvider>,
    subnet_ids: &[String],
    criterion: &MatchCriterion,
    options: &DeleteOptions,
) -> Result<Vec<OperationOutcome>> {
    let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
    let mut join_set: JoinSet<(usize, OperationOutcome)> = JoinSet::new();

    for (index, id) in subnet_ids.iter().enumerate() {
        // Acquire before spawn: new work is admitted only when the in-flight
        // count drops below the bound.
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| TagctlError::Environment("worker pool closed".to_string()))?;

        let provider = provider.clone();
        let criterion = criterion.clone();
        let id = id.clone();
        let dry_run = options.dry_run;
        join_set.spawn(async move {
            let outcome = process_one(provider.as_ref(), &id, &criterion, dry_run).await;
            drop(permit);
            (index, outcome)
        });
    }

    // Join barrier: the summary is only ever computed against a fully
    // drained outcome set.
    let mut indexed = Vec::with_capacity(subnet_ids.len());
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(entry) => indexed.push(entry),
            Err(e) => warn!("Worker task failed: {}", e),
        }
    }

    // A crashed worker still yields an error outcome for its resource, so
    // every submitted subnet is accounted for in the summary.
    if indexed.len() < subnet_ids.len() {
        let joined: HashSet<usize> = indexed.iter().map(|(index, _)| *index).collect();
        for (index, id) in subnet_ids.iter().enumerate() {
            if !joined.contains(&index) {
                indexed.push((
                    index,
                    OperationOutcome::FetchError {
                        resource_id: id.clone(),
                        message: "worker task terminated unexpectedly".to_string(),
                    },
                ));
            }
        }
    }

    // Restore submission order for reproducible reporting
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, outcome)| outcome).collect())
}

/// Fetch, match and delete for a single resource
///
/// Infallible by design: every failure mode maps to an outcome record.
pub async fn process_one(
    provider: &dyn TagProvider,
    resource_id: &str,
    criterion: &MatchCriterion,
    dry_run: bool,
) -> OperationOutcome {
    let tags = match provider.fetch_tags(resource_id).await {
        Ok(tags) => tags,
        Err(e) => {
            return OperationOutcome::FetchError {
                resource_id: resource_id.to_string(),
                message: e.to_string(),
            };
        }
    };

    let matched = matches(&tags, criterion);
    if matched.is_empty() {
        debug!("{}: no tags match {}", resource_id, criterion.describe());
        return OperationOutcome::NotMatched {
            resource_id: resource_id.to_string(),
        };
    }

    if dry_run {
        return OperationOutcome::DryRun {
            resource_id: resource_id.to_string(),
            tags: matched,
        };
    }

    let keys: Vec<String> = matched.iter().map(|t| t.key.clone()).collect();
    match provider.delete_tags(resource_id, &keys).await {
        Ok(()) => OperationOutcome::Deleted {
            resource_id: resource_id.to_string(),
            tags: matched,
        },
        Err(e) => OperationOutcome::DeleteError {
            resource_id: resource_id.to_string(),
            failed_keys: keys,
            message: e.to_string(),
        },
    }
}

//! Inactive load balancer discovery and deletion
//!
//! ALB/NLB count as inactive when no target group has a target in a
//! traffic-carrying state; Classic ELBs when no instances are attached.
//! A tag read or activity check failing for one load balancer skips that
//! load balancer and counts it as an error; only the initial listing can
//! abort the scan.

use crate::aged::types::age_in_days;
use crate::error::{Result, TagctlError};
use crate::retry::RetryPolicy;
use crate::tags::RunStatus;
use async_trait::async_trait;
use aws_sdk_elasticloadbalancing::Client as ElbClient;
use aws_sdk_elasticloadbalancingv2::types::LoadBalancerAttribute;
use aws_sdk_elasticloadbalancingv2::Client as Elbv2Client;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use tracing::{debug, info};

/// Target states that count as traffic-carrying
const ACTIVE_TARGET_STATES: [&str; 3] = ["healthy", "initial", "draining"];

#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub min_age_days: i64,
    /// (key, optional value) a load balancer must carry to be considered
    pub tag_filter: Option<(String, Option<String>)>,
    pub check_protection: bool,
    pub dry_run: bool,
    pub no_confirm: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LbKind {
    V2,
    Classic,
}

/// A load balancer as seen by the scan
#[derive(Debug, Clone)]
pub struct LbSummary {
    /// ARN for ALB/NLB, name for Classic
    pub handle: String,
    pub name: String,
    pub kind: LbKind,
    pub created_at: Option<DateTime<Utc>>,
}

/// Seam over the two ELB APIs so the scan logic is testable
#[async_trait]
pub trait LbProvider: Send + Sync {
    /// List every load balancer in the region, both API generations
    async fn list(&self) -> Result<Vec<LbSummary>>;

    /// Fetch the tag set for one load balancer
    async fn fetch_tags(&self, lb: &LbSummary) -> Result<Vec<(String, String)>>;

    /// True when the load balancer carries no traffic
    async fn is_inactive(&self, lb: &LbSummary) -> Result<bool>;

    /// Delete one load balancer, handling deletion protection if asked
    async fn delete(&self, lb: &LbSummary, check_protection: bool) -> Result<()>;
}

/// True when the tag set satisfies the filter (or no filter is set)
pub fn has_required_tag(
    tags: &[(String, String)],
    filter: &Option<(String, Option<String>)>,
) -> bool {
    let Some((key, value)) = filter else {
        return true;
    };
    match tags.iter().find(|(k, _)| k == key) {
        Some((_, v)) => match value {
            Some(expected) => v == expected,
            None => true,
        },
        None => false,
    }
}

/// True when any target is in a traffic-carrying state
pub fn any_active_target(states: &[String]) -> bool {
    states
        .iter()
        .any(|s| ACTIVE_TARGET_STATES.contains(&s.to_lowercase().as_str()))
}

#[derive(Debug, Default)]
struct ScanCounters {
    tag_mismatch: usize,
    too_new: usize,
    no_created: usize,
    fetch_errors: usize,
}

fn run_status(failed: usize, scan_errors: usize) -> RunStatus {
    if failed > 0 || scan_errors > 0 {
        RunStatus::PartialFailure
    } else {
        RunStatus::Clean
    }
}

pub async fn cleanup_inactive(
    provider: &dyn LbProvider,
    options: &CleanupOptions,
) -> Result<RunStatus> {
    let now = Utc::now();

    println!("{}", "=".repeat(70));
    println!("INACTIVE LOAD BALANCER CLEANUP");
    println!("Minimum age: {} day(s)", options.min_age_days);
    match &options.tag_filter {
        Some((k, Some(v))) => println!("Tag filter:  {}={}", k, v),
        Some((k, None)) => println!("Tag filter:  {}", k),
        None => println!("Tag filter:  none"),
    }
    if options.dry_run {
        println!("Mode:        DRY RUN (no deletions)");
    }
    println!("{}", "=".repeat(70));

    let lbs = provider.list().await?;
    let mut candidates: Vec<(LbSummary, i64)> = Vec::new();
    let mut counters = ScanCounters::default();

    for lb in &lbs {
        let tags = match provider.fetch_tags(lb).await {
            Ok(tags) => tags,
            Err(e) => {
                counters.fetch_errors += 1;
                eprintln!("  ✗ {}: tag read failed: {}", lb.name, e);
                continue;
            }
        };
        if !has_required_tag(&tags, &options.tag_filter) {
            counters.tag_mismatch += 1;
            continue;
        }

        let Some(created_at) = lb.created_at else {
            counters.no_created += 1;
            continue;
        };

        match provider.is_inactive(lb).await {
            Ok(false) => {
                debug!("{}: active targets, keeping", lb.name);
                continue;
            }
            Ok(true) => {}
            Err(e) => {
                counters.fetch_errors += 1;
                eprintln!("  ✗ {}: activity check failed: {}", lb.name, e);
                continue;
            }
        }

        let age = age_in_days(created_at, now);
        if age < options.min_age_days {
            counters.too_new += 1;
            continue;
        }

        info!("Inactive and eligible: {} (age {} day(s))", lb.name, age);
        candidates.push((lb.clone(), age));
    }

    if counters.tag_mismatch > 0 {
        println!(
            "Skipped {} load balancer(s): tag filter mismatch",
            counters.tag_mismatch
        );
    }
    if counters.too_new > 0 {
        println!(
            "Skipped {} inactive load balancer(s): younger than {} day(s)",
            counters.too_new, options.min_age_days
        );
    }
    if counters.no_created > 0 {
        println!(
            "Skipped {} load balancer(s): no creation time available",
            counters.no_created
        );
    }
    if counters.fetch_errors > 0 {
        println!(
            "Skipped {} load balancer(s): fetch or activity check failed",
            counters.fetch_errors
        );
    }

    if candidates.is_empty() {
        println!("No inactive load balancers eligible for deletion");
        return Ok(run_status(0, counters.fetch_errors));
    }

    println!("\nEligible for deletion:");
    for (lb, age) in &candidates {
        let kind = match lb.kind {
            LbKind::V2 => "alb/nlb",
            LbKind::Classic => "classic",
        };
        println!("  - {} ({}, age {} day(s))", lb.name, kind, age);
    }

    if options.dry_run {
        println!(
            "\n[DRY RUN] Would delete {} load balancer(s)",
            candidates.len()
        );
        return Ok(run_status(0, counters.fetch_errors));
    }

    if !options.no_confirm {
        print!(
            "\nDelete {} inactive load balancer(s)? (y/N): ",
            candidates.len()
        );
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled");
            return Ok(RunStatus::Clean);
        }
    }

    let mut deleted = 0usize;
    let mut failed = 0usize;
    for (lb, _) in &candidates {
        match provider.delete(lb, options.check_protection).await {
            Ok(()) => {
                deleted += 1;
                println!("  ✓ Deleted: {}", lb.name);
            }
            Err(e) => {
                failed += 1;
                eprintln!("  ✗ Failed to delete {}: {}", lb.name, e);
            }
        }
    }

    println!("{}", "=".repeat(70));
    println!(
        "Deleted: {}  Failed: {}  Total: {}",
        deleted,
        failed,
        candidates.len()
    );
    println!("{}", "=".repeat(70));

    Ok(run_status(failed, counters.fetch_errors))
}

/// Provider backed by the real ELB and ELBv2 APIs
pub struct AwsLbProvider {
    v2: Elbv2Client,
    classic: ElbClient,
}

impl AwsLbProvider {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            v2: Elbv2Client::new(config),
            classic: ElbClient::new(config),
        }
    }

    /// An ELBv2 is inactive when no target group has an active target
    /// (no target groups at all counts as inactive)
    async fn v2_inactive(&self, arn: &str) -> Result<bool> {
        let groups = RetryPolicy::for_read()
            .run("describe-target-groups", || async {
                self.v2
                    .describe_target_groups()
                    .load_balancer_arn(arn)
                    .send()
                    .await
                    .map_err(|e| {
                        TagctlError::Aws(format!("Failed to list target groups: {}", e))
                    })
            })
            .await?;

        for group in groups.target_groups() {
            let Some(group_arn) = group.target_group_arn() else {
                continue;
            };
            let health = RetryPolicy::for_read()
                .run("describe-target-health", || async {
                    self.v2
                        .describe_target_health()
                        .target_group_arn(group_arn)
                        .send()
                        .await
                        .map_err(|e| {
                            TagctlError::Aws(format!("Failed to check target health: {}", e))
                        })
                })
                .await?;

            let states: Vec<String> = health
                .target_health_descriptions()
                .iter()
                .filter_map(|d| d.target_health())
                .filter_map(|h| h.state())
                .map(|s| s.as_str().to_string())
                .collect();

            if any_active_target(&states) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// A Classic ELB is inactive when no instances are attached
    async fn classic_inactive(&self, name: &str) -> Result<bool> {
        let response = RetryPolicy::for_read()
            .run("describe-classic-load-balancer", || async {
                self.classic
                    .describe_load_balancers()
                    .load_balancer_names(name)
                    .send()
                    .await
                    .map_err(|e| {
                        TagctlError::Aws(format!("Failed to describe {}: {}", name, e))
                    })
            })
            .await?;

        Ok(response
            .load_balancer_descriptions()
            .first()
            .map(|lb| lb.instances().is_empty())
            .unwrap_or(true))
    }

    async fn protection_enabled(&self, arn: &str) -> Result<bool> {
        let response = RetryPolicy::for_read()
            .run("describe-load-balancer-attributes", || async {
                self.v2
                    .describe_load_balancer_attributes()
                    .load_balancer_arn(arn)
                    .send()
                    .await
                    .map_err(|e| TagctlError::Aws(format!("Failed to read attributes: {}", e)))
            })
            .await?;

        Ok(response.attributes().iter().any(|attr| {
            attr.key() == Some("deletion_protection.enabled")
                && attr
                    .value()
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false)
        }))
    }
}

#[async_trait]
impl LbProvider for AwsLbProvider {
    async fn list(&self) -> Result<Vec<LbSummary>> {
        let mut out = Vec::new();

        let v2 = RetryPolicy::for_read()
            .run("describe-load-balancers", || async {
                self.v2
                    .describe_load_balancers()
                    .send()
                    .await
                    .map_err(|e| TagctlError::Aws(format!("Failed to list ELBv2: {}", e)))
            })
            .await?;
        for lb in v2.load_balancers() {
            let Some(arn) = lb.load_balancer_arn() else {
                continue;
            };
            out.push(LbSummary {
                handle: arn.to_string(),
                name: lb.load_balancer_name().unwrap_or(arn).to_string(),
                kind: LbKind::V2,
                created_at: lb
                    .created_time()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), 0)),
            });
        }

        let classic = RetryPolicy::for_read()
            .run("describe-classic-load-balancers", || async {
                self.classic
                    .describe_load_balancers()
                    .send()
                    .await
                    .map_err(|e| {
                        TagctlError::Aws(format!("Failed to list Classic ELBs: {}", e))
                    })
            })
            .await?;
        for lb in classic.load_balancer_descriptions() {
            let Some(name) = lb.load_balancer_name() else {
                continue;
            };
            out.push(LbSummary {
                handle: name.to_string(),
                name: name.to_string(),
                kind: LbKind::Classic,
                created_at: lb
                    .created_time()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), 0)),
            });
        }
        Ok(out)
    }

    async fn fetch_tags(&self, lb: &LbSummary) -> Result<Vec<(String, String)>> {
        match lb.kind {
            LbKind::V2 => {
                let response = RetryPolicy::for_read()
                    .run("describe-lb-tags", || async {
                        self.v2
                            .describe_tags()
                            .resource_arns(&lb.handle)
                            .send()
                            .await
                            .map_err(|e| TagctlError::Fetch {
                                resource_id: lb.name.clone(),
                                message: e.to_string(),
                            })
                    })
                    .await?;
                Ok(response
                    .tag_descriptions()
                    .iter()
                    .flat_map(|d| d.tags())
                    .map(|t| {
                        (
                            t.key().unwrap_or_default().to_string(),
                            t.value().unwrap_or_default().to_string(),
                        )
                    })
                    .collect())
            }
            LbKind::Classic => {
                let response = RetryPolicy::for_read()
                    .run("describe-classic-lb-tags", || async {
                        self.classic
                            .describe_tags()
                            .load_balancer_names(&lb.handle)
                            .send()
                            .await
                            .map_err(|e| TagctlError::Fetch {
                                resource_id: lb.name.clone(),
                                message: e.to_string(),
                            })
                    })
                    .await?;
                Ok(response
                    .tag_descriptions()
                    .iter()
                    .flat_map(|d| d.tags())
                    .map(|t| {
                        (
                            t.key().to_string(),
                            t.value().unwrap_or_default().to_string(),
                        )
                    })
                    .collect())
            }
        }
    }

    async fn is_inactive(&self, lb: &LbSummary) -> Result<bool> {
        match lb.kind {
            LbKind::V2 => self.v2_inactive(&lb.handle).await,
            LbKind::Classic => self.classic_inactive(&lb.handle).await,
        }
    }

    async fn delete(&self, lb: &LbSummary, check_protection: bool) -> Result<()> {
        match lb.kind {
            LbKind::V2 => {
                if check_protection && self.protection_enabled(&lb.handle).await? {
                    info!("{}: deletion protection enabled, disabling", lb.name);
                    self.v2
                        .modify_load_balancer_attributes()
                        .load_balancer_arn(&lb.handle)
                        .attributes(
                            LoadBalancerAttribute::builder()
                                .key("deletion_protection.enabled")
                                .value("false")
                                .build(),
                        )
                        .send()
                        .await
                        .map_err(|e| {
                            TagctlError::Aws(format!(
                                "Failed to disable deletion protection: {}",
                                e
                            ))
                        })?;
                }
                RetryPolicy::for_mutation()
                    .run("delete-load-balancer", || async {
                        self.v2
                            .delete_load_balancer()
                            .load_balancer_arn(&lb.handle)
                            .send()
                            .await
                            .map_err(|e| TagctlError::Delete {
                                resource_id: lb.name.clone(),
                                message: e.to_string(),
                            })?;
                        Ok(())
                    })
                    .await
            }
            LbKind::Classic => {
                RetryPolicy::for_mutation()
                    .run("delete-classic-load-balancer", || async {
                        self.classic
                            .delete_load_balancer()
                            .load_balancer_name(&lb.handle)
                            .send()
                            .await
                            .map_err(|e| TagctlError::Delete {
                                resource_id: lb.name.clone(),
                                message: e.to_string(),
                            })?;
                        Ok(())
                    })
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_filter_accepts_all() {
        assert!(has_required_tag(&[], &None));
        assert!(has_required_tag(&tags(&[("Owner", "x")]), &None));
    }

    #[test]
    fn test_key_only_filter() {
        let filter = Some(("Owner".to_string(), None));
        assert!(has_required_tag(&tags(&[("Owner", "anyone")]), &filter));
        assert!(!has_required_tag(&tags(&[("Name", "x")]), &filter));
        assert!(!has_required_tag(&[], &filter));
    }

    #[test]
    fn test_key_value_filter() {
        let filter = Some(("Owner".to_string(), Some("admin@example.com".to_string())));
        assert!(has_required_tag(
            &tags(&[("Owner", "admin@example.com")]),
            &filter
        ));
        assert!(!has_required_tag(&tags(&[("Owner", "other")]), &filter));
    }

    #[test]
    fn test_active_target_states() {
        assert!(any_active_target(&["healthy".to_string()]));
        assert!(any_active_target(&["unused".to_string(), "draining".to_string()]));
        assert!(any_active_target(&["Initial".to_string()]));
        assert!(!any_active_target(&["unused".to_string(), "unhealthy".to_string()]));
        assert!(!any_active_target(&[]));
    }

    #[test]
    fn test_run_status_mapping() {
        assert_eq!(run_status(0, 0), RunStatus::Clean);
        assert_eq!(run_status(1, 0), RunStatus::PartialFailure);
        assert_eq!(run_status(0, 1), RunStatus::PartialFailure);
        assert_eq!(run_status(2, 3), RunStatus::PartialFailure);
    }
}

//! Aged-resource listing across EC2, EKS and RDS
//!
//! Lists resources whose age meets the cutoff. A failure in one service is
//! reported and the remaining services are still queried.

mod ec2;
mod eks;
mod format;
mod rds;
pub mod types;

pub use format::OutputFormat;
pub use types::{age_in_days, is_older_than, AgedResource, ResourceKind};

use crate::aws_env;
use crate::config::Config;
use crate::error::Result;
use crate::tags::RunStatus;
use crate::validation::validate_days;
use chrono::Utc;
use clap::Args;
use tracing::warn;

#[derive(Args, Clone)]
pub struct AgedArgs {
    /// Age cutoff in days (default from config, 2)
    #[arg(long)]
    pub days: Option<i64>,
    /// Resource kind to list (ec2, eks, rds, all)
    #[arg(long, default_value = "all")]
    pub resource: String,
    /// Output format (table, json, csv; default from config)
    #[arg(long)]
    pub output: Option<String>,
}

pub async fn handle_command(
    args: AgedArgs,
    config: &Config,
    region: Option<String>,
) -> Result<RunStatus> {
    let days = args.days.unwrap_or(config.aged.default_days);
    validate_days(days)?;
    if !matches!(args.resource.as_str(), "ec2" | "eks" | "rds" | "all") {
        return Err(crate::error::TagctlError::Validation {
            field: "resource".to_string(),
            reason: format!("Unknown resource kind: {}. Use ec2, eks, rds or all", args.resource),
        });
    }
    let output = OutputFormat::parse(
        args.output
            .as_deref()
            .unwrap_or(config.aged.output.as_str()),
    )?;

    let region = region.or_else(|| config.aws.region.clone());
    let sdk_config = aws_env::load_sdk_config(region).await?;
    let region_name = aws_env::region_name(&sdk_config);

    let now = Utc::now();
    let mut resources = Vec::new();
    let mut errors = 0;

    let want = |kind: &str| args.resource == "all" || args.resource == kind;

    if want("ec2") {
        match ec2::list_instances(&sdk_config, now).await {
            Ok(mut found) => resources.append(&mut found),
            Err(e) => {
                errors += 1;
                warn!("EC2 listing failed: {}", e);
                eprintln!("✗ EC2 listing failed: {}", e);
            }
        }
    }
    if want("eks") {
        match eks::list_clusters(&sdk_config, now).await {
            Ok(mut found) => resources.append(&mut found),
            Err(e) => {
                errors += 1;
                warn!("EKS listing failed: {}", e);
                eprintln!("✗ EKS listing failed: {}", e);
            }
        }
    }
    if want("rds") {
        match rds::list_db_instances(&sdk_config, now).await {
            Ok(mut found) => resources.append(&mut found),
            Err(e) => {
                errors += 1;
                warn!("RDS listing failed: {}", e);
                eprintln!("✗ RDS listing failed: {}", e);
            }
        }
    }

    let aged: Vec<AgedResource> = resources
        .into_iter()
        .filter(|r| r.age_days >= days)
        .collect();

    if output == OutputFormat::Table {
        println!(
            "Resources older than {} day(s) in {} ({} found)",
            days,
            region_name,
            aged.len()
        );
    }
    println!("{}", format::render(&aged, output)?);

    if errors > 0 {
        Ok(RunStatus::PartialFailure)
    } else {
        Ok(RunStatus::Clean)
    }
}

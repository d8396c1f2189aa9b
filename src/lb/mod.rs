//! Inactive load balancer cleanup
//!
//! Deletes load balancers that carry no traffic and are older than a cutoff.
//! ALB/NLB are inactive when no target group has an active target; Classic
//! ELBs are inactive when they have no attached instances.

pub mod cleanup;

use crate::aws_env;
use crate::config::Config;
use crate::error::Result;
use crate::tags::RunStatus;
use crate::validation::validate_days;
use clap::Subcommand;

#[derive(Subcommand, Clone)]
pub enum LbCommands {
    /// Delete inactive load balancers older than the cutoff
    Cleanup {
        /// Minimum age in days for a load balancer to be eligible
        #[arg(long, default_value_t = 2)]
        min_age_days: i64,
        /// Only consider load balancers carrying this tag key
        #[arg(long)]
        filter_tag_key: Option<String>,
        /// Require this tag value (with --filter-tag-key)
        #[arg(long)]
        filter_tag_value: Option<String>,
        /// Consider all load balancers regardless of tags
        #[arg(long)]
        no_tag_filter: bool,
        /// Do not check or disable deletion protection before deleting
        #[arg(long)]
        skip_protection_check: bool,
        /// Report eligible load balancers without deleting
        #[arg(long)]
        dry_run: bool,
        /// Skip the interactive confirmation prompt
        #[arg(long)]
        no_confirm: bool,
    },
}

pub async fn handle_command(
    cmd: LbCommands,
    config: &Config,
    region: Option<String>,
) -> Result<RunStatus> {
    match cmd {
        LbCommands::Cleanup {
            min_age_days,
            filter_tag_key,
            filter_tag_value,
            no_tag_filter,
            skip_protection_check,
            dry_run,
            no_confirm,
        } => {
            validate_days(min_age_days)?;

            let region = region.or_else(|| config.aws.region.clone());
            let sdk_config = aws_env::load_sdk_config(region).await?;
            if !dry_run {
                aws_env::verify_credentials(&sdk_config).await?;
            }

            let options = cleanup::CleanupOptions {
                min_age_days,
                tag_filter: if no_tag_filter {
                    None
                } else {
                    filter_tag_key.map(|key| (key, filter_tag_value))
                },
                check_protection: !skip_protection_check,
                dry_run,
                no_confirm: no_confirm || config.tags.no_confirm,
            };
            let provider = cleanup::AwsLbProvider::new(&sdk_config);
            cleanup::cleanup_inactive(&provider, &options).await
        }
    }
}

//! Subnet tag inspection and deletion
//!
//! `tags list` prints each subnet's details and tag set; `tags delete` runs
//! the filter & delete engine over the working set.

pub mod criterion;
pub mod engine;
pub mod report;
pub mod types;

use crate::aws_env;
use crate::config::Config;
use crate::error::Result;
use crate::provider::{Ec2SubnetProvider, TagProvider};
use crate::tags::criterion::CriterionFlags;
use crate::tags::report::Summary;
use crate::tags::types::DeleteOptions;
use crate::validation::parse_subnet_ids;
use clap::Subcommand;
use comfy_table::Table;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;

/// Result of a whole run, used by main to pick the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    PartialFailure,
}

#[derive(Subcommand, Clone)]
pub enum TagCommands {
    /// List subnets and their tags
    List {
        /// Comma-separated subnet IDs (default: all subnets in region)
        #[arg(long)]
        subnet_ids: Option<String>,
    },
    /// Delete matching tags from subnets
    Delete {
        /// Comma-separated subnet IDs (default: all subnets in region)
        #[arg(long)]
        subnet_ids: Option<String>,
        /// Comma-separated tag key(s) to match exactly
        #[arg(long)]
        tag_keys: Option<String>,
        /// Value filter, used with a single --tag-keys entry
        #[arg(long)]
        tag_value: Option<String>,
        /// Match tags whose key contains this substring
        #[arg(long)]
        contains: Option<String>,
        /// Match every tag on each subnet
        #[arg(long)]
        all_tags: bool,
        /// Match tags under the kubernetes.io/cluster/ namespace
        #[arg(long)]
        kubernetes_cluster_tags: bool,
        /// Report the would-be deletions without calling AWS
        #[arg(long)]
        dry_run: bool,
        /// Skip the interactive confirmation prompt
        #[arg(long)]
        no_confirm: bool,
        /// Process subnets concurrently
        #[arg(long)]
        parallel: bool,
        /// Worker bound for --parallel (default from config, 10)
        #[arg(long)]
        workers: Option<usize>,
    },
}

pub async fn handle_command(
    cmd: TagCommands,
    config: &Config,
    region: Option<String>,
    verbose: bool,
) -> Result<RunStatus> {
    let region = region.or_else(|| config.aws.region.clone());

    match cmd {
        TagCommands::List { subnet_ids } => {
            let sdk_config = aws_env::load_sdk_config(region).await?;
            let region_name = aws_env::region_name(&sdk_config);
            let provider: Arc<dyn TagProvider> = Arc::new(Ec2SubnetProvider::new(&sdk_config));
            list_tags(provider, &subnet_ids, &region_name).await
        }
        TagCommands::Delete {
            subnet_ids,
            tag_keys,
            tag_value,
            contains,
            all_tags,
            kubernetes_cluster_tags,
            dry_run,
            no_confirm,
            parallel,
            workers,
        } => {
            let flags = CriterionFlags {
                tag_keys,
                tag_value,
                contains,
                all_tags,
                kubernetes_cluster_tags,
            };
            // Criterion conflicts are fatal before any AWS interaction
            let criterion = flags.build()?;

            let options = DeleteOptions {
                dry_run,
                parallel,
                workers: workers.unwrap_or(config.tags.parallel_workers),
            };
            let skip_confirm = no_confirm || config.tags.no_confirm;

            let sdk_config = aws_env::load_sdk_config(region).await?;
            let region_name = aws_env::region_name(&sdk_config);
            let provider: Arc<dyn TagProvider> = Arc::new(Ec2SubnetProvider::new(&sdk_config));

            delete_tags(
                provider,
                &sdk_config,
                &subnet_ids,
                &region_name,
                criterion,
                options,
                skip_confirm,
                verbose,
            )
            .await
        }
    }
}

/// Resolve the working set: explicit IDs, or every subnet in the region
async fn enumerate(
    provider: &dyn TagProvider,
    explicit_ids: &Option<String>,
) -> Result<Vec<String>> {
    match explicit_ids {
        Some(raw) => parse_subnet_ids(raw),
        None => provider.list_subnets().await,
    }
}

async fn list_tags(
    provider: Arc<dyn TagProvider>,
    explicit_ids: &Option<String>,
    region: &str,
) -> Result<RunStatus> {
    let subnet_ids = enumerate(provider.as_ref(), explicit_ids).await?;
    if subnet_ids.is_empty() {
        println!("No subnets found in region {}", region);
        return Ok(RunStatus::Clean);
    }

    println!("{}", "=".repeat(70));
    println!("SUBNET TAGS ({})", region);
    println!("{}", "=".repeat(70));

    let mut errors = 0;
    for subnet_id in &subnet_ids {
        match provider.describe_subnet(subnet_id).await {
            Ok(details) => {
                println!(
                    "\n{}  vpc={}  az={}  cidr={}",
                    details.subnet_id,
                    details.vpc_id.as_deref().unwrap_or("-"),
                    details.availability_zone.as_deref().unwrap_or("-"),
                    details.cidr_block.as_deref().unwrap_or("-"),
                );
                if details.tags.is_empty() {
                    println!("  (no tags)");
                } else {
                    let mut table = Table::new();
                    table.set_header(vec!["Key", "Value"]);
                    for tag in &details.tags {
                        table.add_row(vec![tag.key.as_str(), tag.value.as_str()]);
                    }
                    println!("{}", table);
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("  ✗ {}: {}", subnet_id, e);
            }
        }
    }

    println!("\n{} subnet(s), {} error(s)", subnet_ids.len(), errors);
    if errors > 0 {
        Ok(RunStatus::PartialFailure)
    } else {
        Ok(RunStatus::Clean)
    }
}

#[allow(clippy::too_many_arguments)]
async fn delete_tags(
    provider: Arc<dyn TagProvider>,
    sdk_config: &aws_config::SdkConfig,
    explicit_ids: &Option<String>,
    region: &str,
    criterion: criterion::MatchCriterion,
    options: DeleteOptions,
    skip_confirm: bool,
    verbose: bool,
) -> Result<RunStatus> {
    // Credentials must be usable before any mutation is attempted
    if !options.dry_run {
        let account = aws_env::verify_credentials(sdk_config).await?;
        info!("Deleting tags as account {}", account);
    }

    let subnet_ids = enumerate(provider.as_ref(), explicit_ids).await?;
    if subnet_ids.is_empty() {
        println!("No subnets found in region {}", region);
        return Ok(RunStatus::Clean);
    }

    println!("{}", "=".repeat(70));
    println!("TAG DELETION ({})", region);
    println!("Criterion: {}", criterion.describe());
    println!("Targets:   {} subnet(s)", subnet_ids.len());
    if options.dry_run {
        println!("Mode:      DRY RUN");
    }
    if options.parallel {
        println!("Workers:   {}", options.workers);
    }
    println!("{}", "=".repeat(70));

    if !options.dry_run && !skip_confirm && !confirm(subnet_ids.len(), &criterion)? {
        // Declining the prompt is a clean exit, not a failure
        println!("Cancelled");
        return Ok(RunStatus::Clean);
    }

    let outcomes = engine::process_subnets(provider, &subnet_ids, &criterion, &options).await?;
    report::print_outcomes(&outcomes, verbose);

    let summary = Summary::from_outcomes(&outcomes);
    report::print_summary(&summary, options.dry_run);

    if summary.has_failures() {
        Ok(RunStatus::PartialFailure)
    } else {
        Ok(RunStatus::Clean)
    }
}

fn confirm(target_count: usize, criterion: &criterion::MatchCriterion) -> Result<bool> {
    print!(
        "Delete tags matching [{}] on {} subnet(s)? (y/N): ",
        criterion.describe(),
        target_count
    );
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

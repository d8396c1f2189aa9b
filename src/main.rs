use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tagctl::aged::{self, AgedArgs};
use tagctl::config::{self, Config};
use tagctl::lb::{self, LbCommands};
use tagctl::tags::{self, RunStatus, TagCommands};

#[derive(Parser)]
#[command(name = "tagctl")]
#[command(
    about = "AWS tag cleanup CLI",
    long_about = "tagctl inspects and deletes tags on EC2 subnets, lists aged EC2/EKS/RDS resources, and cleans up inactive load balancers.\n\nDeletion supports exact-key, key+value, key-substring and all-tags criteria, a dry-run mode, and bounded parallel processing."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Target AWS region (default: config file, then SDK chain)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and delete subnet tags
    Tags {
        #[command(subcommand)]
        subcommand: TagCommands,
    },
    /// List EC2/EKS/RDS resources older than a cutoff
    Aged(AgedArgs),
    /// Load balancer housekeeping
    Lb {
        #[command(subcommand)]
        subcommand: LbCommands,
    },
    /// Initialize a tagctl configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".tagctl.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Suppress INFO by default; --verbose turns on debug detail
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    let status = match cli.command {
        Commands::Tags { subcommand } => {
            tags::handle_command(subcommand, &config, cli.region.clone(), cli.verbose).await?
        }
        Commands::Aged(args) => aged::handle_command(args, &config, cli.region.clone()).await?,
        Commands::Lb { subcommand } => {
            lb::handle_command(subcommand, &config, cli.region.clone()).await?
        }
        Commands::Init { output } => {
            config::init_config(&output)?;
            RunStatus::Clean
        }
    };

    // Per-resource failures never abort the run; they surface here as the
    // only aggregate signal of partial failure.
    if status == RunStatus::PartialFailure {
        std::process::exit(1);
    }

    Ok(())
}

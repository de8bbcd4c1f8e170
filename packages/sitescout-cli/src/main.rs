//! sitescout: discovery-driven scraper generation.
//!
//! `discover` probes a live job posting and persists a discovery record;
//! `generate` turns a record into a validated, reusable scraper.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(
    name = "sitescout",
    version,
    about = "Discovery-driven scraper generation for job posting sites",
    after_help = "Examples:\n  \
        sitescout discover \"https://www.linkedin.com/jobs/view/4300362234\"\n  \
        sitescout discover \"https://www.indeed.com/viewjob?jk=abc123\" --site indeed\n  \
        sitescout generate discovery_records/linkedin_discovery_2025-09-29T12-00-00.json --multi-test"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a job page and persist a discovery record
    Discover {
        /// Job posting URL (site auto-detected)
        url: String,

        /// Manually specify the site (overrides auto-detection)
        #[arg(long, value_parser = ["linkedin", "indeed", "glassdoor"])]
        site: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a reusable site-specific scraper from a discovery record
    Generate {
        /// Path to the discovery record JSON file
        record_path: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,

        /// Run multi-document testing after validation
        #[arg(long)]
        multi_test: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Discover { url, site, verbose } => {
            init_tracing(verbose);
            cmd::discover::run(&url, site.as_deref()).await
        }
        Command::Generate {
            record_path,
            verbose,
            multi_test,
        } => {
            init_tracing(verbose);
            cmd::generate::run(&record_path, multi_test).await
        }
    }
}

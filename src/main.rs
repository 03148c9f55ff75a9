//! Site-Sweep main entry point
//!
//! This is the command-line interface for the Site-Sweep single-site crawler.

use anyhow::Context;
use clap::Parser;
use site_sweep::config::{load_config_with_hash, validate, Config};
use site_sweep::output::print_summary;
use site_sweep::Coordinator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Sweep: an exhaustive single-site crawler
///
/// Site-Sweep discovers every page reachable from a seed URL on the same
/// origin and writes each unique page URL exactly once to a text file.
#[derive(Parser, Debug)]
#[command(name = "site-sweep")]
#[command(version)]
#[command(about = "An exhaustive single-site crawler", long_about = None)]
struct Cli {
    /// Absolute http(s) URL to start from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of concurrent fetch workers
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Stop the crawl after this many seconds
    #[arg(long, value_name = "SECS")]
    max_duration: Option<u64>,

    /// File to write discovered page URLs to
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(concurrency) = self.concurrency {
            config.crawler.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout = timeout;
        }
        if let Some(max_duration) = self.max_duration {
            config.crawler.max_duration = Some(max_duration);
        }
        if let Some(output) = &self.output {
            config.output.pages_path = output.to_string_lossy().into_owned();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let coordinator = Coordinator::new(&cli.seed, config).context("failed to start crawl")?;

    let shutdown = coordinator.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            shutdown.cancel();
        }
    });

    let summary = coordinator.run().await.context("crawl failed")?;

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Builds the effective configuration: file (or defaults), then CLI flags
///
/// Validation runs once, on the merged result.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("invalid configuration")?;

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_sweep=info,warn"),
            1 => EnvFilter::new("site_sweep=debug,info"),
            2 => EnvFilter::new("site_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

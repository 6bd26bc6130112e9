//! ycrawler entry point
//!
//! Parses the CLI, sets up logging, validates the configuration and hands
//! over to the crawl loop. Under normal operation the loop never returns;
//! the process runs until killed.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;
use ycrawler::config::{self, Config};
use ycrawler::crawler::run_forever;

/// Periodically mirrors the top Hacker News stories, together with every
/// page linked from their comment threads, into a per-story directory.
#[derive(Parser, Debug)]
#[command(name = "ycrawler")]
#[command(version)]
#[command(about = "Unattended Hacker News mirror", long_about = None)]
struct Cli {
    /// Logging level
    #[arg(short, long, default_value = "debug", value_parser = ["debug", "info", "error"])]
    loglevel: String,

    /// Log to a file instead of stderr
    #[arg(short = 'f', long)]
    logfile: Option<PathBuf>,

    /// Restart period in seconds
    #[arg(short, long, default_value_t = config::DEFAULT_RESTART_INTERVAL)]
    restart: f64,

    /// Top news count
    #[arg(short = 'n', long, default_value_t = config::DEFAULT_TOP_NEWS)]
    top: usize,

    /// Max allowed simultaneous requests
    #[arg(short, long, default_value_t = config::DEFAULT_CONCURRENCY)]
    chunks: usize,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = config::DEFAULT_REQUEST_TIMEOUT)]
    timeout: f64,

    /// Open requests limit per host
    #[arg(short = 's', long, default_value_t = config::DEFAULT_LIMIT_PER_HOST)]
    limitperhost: usize,

    /// Output directory
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Listing site base URL
    #[arg(long, default_value = config::DEFAULT_BASE_URL)]
    base_url: Url,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let config = Config {
        base_url: cli.base_url,
        restart_interval: Duration::try_from_secs_f64(cli.restart)
            .context("restart period must be a non-negative number of seconds")?,
        top_n: cli.top,
        concurrency: cli.chunks,
        timeout: Duration::try_from_secs_f64(cli.timeout)
            .context("request timeout must be a non-negative number of seconds")?,
        per_host_limit: cli.limitperhost,
        output_root: cli.output,
    };
    config::validate(&config).context("invalid configuration")?;

    tracing::info!("ycrawler started with config: {:?}", config);
    run_forever(config).await?;
    Ok(())
}

/// Sets up the tracing subscriber from the CLI logging options.
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = match cli.loglevel.as_str() {
        "debug" => EnvFilter::new("ycrawler=debug,info"),
        "info" => EnvFilter::new("ycrawler=info,warn"),
        _ => EnvFilter::new("error"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &cli.logfile {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.init(),
    }
    Ok(())
}

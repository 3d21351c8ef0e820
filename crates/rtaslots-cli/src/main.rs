mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rtaslots")]
#[command(about = "Crawl the booking wizard for available driving-test slots")]
struct Cli {
    /// Write the aggregated report to this path instead of the configured one
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the configured headless setting
    #[arg(long)]
    headless: Option<bool>,

    /// Restrict the crawl to a specific location (repeatable)
    #[arg(long = "location")]
    locations: Vec<String>,

    /// Enumerate the bookable locations and exit without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = rtaslots_core::load_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(headless) = cli.headless {
        config.headless = headless;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    if cli.dry_run {
        let locations = rtaslots_crawler::list_available_locations(&config).await?;
        println!("found {} bookable locations:", locations.len());
        for name in &locations {
            println!("  {name}");
        }
        return Ok(());
    }

    let report = rtaslots_crawler::run_crawl(&config, &cli.locations).await?;
    output::write_report(&config.output_path, &report)?;
    tracing::info!(
        path = %config.output_path.display(),
        locations = report.locations.len(),
        "crawl complete"
    );

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ghpublish::cli::Args;
use ghpublish::publisher::Publisher;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if args.verbose {
        tracing::info!("Running ghpublish with verbose output");
    }

    let publisher = Publisher::new(args)?;
    let report = publisher.run().await?;

    for name in &report.uploaded {
        tracing::debug!("Uploaded {}", name);
    }

    Ok(())
}

//! Marquee - Storefront client entry point
//!
//! Reads configuration, restores the stored session, and runs one command.

mod cli;
mod commands;

use clap::Parser;
use marquee_infrastructure::ClientConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::commands::App;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.connection.apply(ClientConfig::from_env()?)?;

    tracing::debug!(
        api_url = %config.api_url,
        "Starting Marquee v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = App::connect(config).await?;
    app.run(cli.command).await
}

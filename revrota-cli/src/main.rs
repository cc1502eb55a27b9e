use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

mod config;
mod github;
mod notify;
mod run;

use config::Config;
use github::GitHubClient;
use notify::Notifier;

/// Revrota: fair-rotation reviewer assignment for open pull requests
#[derive(Parser, Debug)]
#[command(name = "revrota")]
#[command(about = "Assigns reviewers to open pull requests by rotation", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Log what would be done without calling GitHub or the webhook
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let token = config.token()?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    let github = GitHubClient::new(client.clone(), token);
    let notifier = Notifier::new(client, config.webhook_url.clone());

    run::run(&config, &github, &notifier, cli.dry_run).await
}

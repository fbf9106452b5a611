//! Autoreview CLI - request pull request reviewers from glob rules
//!
//! Runs once per pull request event inside GitHub Actions.

mod annotations;

use std::process::ExitCode;

use anyhow::Context;
use autoreview_core::{ActionContext, Orchestrator, DEFAULT_CONFIG_PATH};
use autoreview_github::GitHubClient;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Assign reviewers to a pull request based on the files it changes
#[derive(Parser, Debug)]
#[command(name = "autoreview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GitHub token used for every API call (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Path of the reviewer rule document inside the repository
    #[arg(long, env = "INPUT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => Ok(code),
        Err(e) => {
            annotations::error(&format!("{:#}", e));
            Err(e)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let token = cli
        .token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .filter(|t| !t.trim().is_empty())
        .context("A GitHub token is required: pass --token or set INPUT_TOKEN or GITHUB_TOKEN")?;

    // Action inputs arrive as empty strings when unset
    let config_path = if cli.config.trim().is_empty() {
        DEFAULT_CONFIG_PATH.to_string()
    } else {
        cli.config
    };

    let ctx = ActionContext::from_env().context("Failed to read the action context")?;
    let client = GitHubClient::from_repository(token, &ctx.repository)?;

    tracing::info!(
        repository = %ctx.repository,
        pr = ctx.pull_number,
        config = %config_path,
        "Starting reviewer assignment"
    );

    let report = Orchestrator::new(&client)
        .with_config_path(config_path.as_str())
        .run(&ctx)
        .await?;

    if report.is_success() {
        tracing::info!("finished!");
        return Ok(ExitCode::SUCCESS);
    }

    for failure in &report.failures {
        annotations::error(&failure.to_string());
    }
    Ok(ExitCode::FAILURE)
}

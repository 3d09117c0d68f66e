// Entry point for the agent index updater

use agent_index::{AgentApiExt, AgentIndexer, IndexConfig, JsonFileStore, UpdateMode};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use moltbook_client::MoltbookClient;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agent-index")]
#[command(about = "Refresh the local snapshot of Moltbook agent profiles")]
struct Cli {
    /// Pass to run; incremental falls back to full when the snapshot is empty or stale
    #[arg(value_enum, default_value_t = ModeArg::Incremental)]
    mode: ModeArg,

    /// Snapshot path (overrides AGENT_INDEX_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Full,
    Incremental,
}

impl From<ModeArg> for UpdateMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Full => UpdateMode::Full,
            ModeArg::Incremental => UpdateMode::Incremental,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the filter reads RUST_LOG
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agent_index=debug,moltbook_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Fatal error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = IndexConfig::from_env().context("Failed to load configuration")?;
    if let Some(output) = cli.output {
        config = config.with_output_path(output);
    }

    let client = MoltbookClient::from_env().context("Failed to create Moltbook client")?;
    let api = client.rate_limited(config.request_interval);
    let store = JsonFileStore::new(config.output_path.clone());
    let output = config.output_path.clone();

    let result = AgentIndexer::new(api, store, config)
        .run(cli.mode.into())
        .await
        .context("Agent index update failed")?;

    tracing::info!(
        "Done! Saved {} agents to {} ({} fetched, {} failed)",
        result.agent_count,
        output.display(),
        result.fetched,
        result.failed.len()
    );

    Ok(())
}

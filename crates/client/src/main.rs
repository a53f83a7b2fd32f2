//! Witch hunt console client.
//!
//! Composition root: loads content, builds the runtime, spawns the console
//! player and an idle rival, then hands stdin to the line console. Effects are
//! printed to stdout; logs go to stderr.
mod config;
mod console;
mod presentation;

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;

use config::CliConfig;
use hunt_content::ContentFactory;
use hunt_runtime::{LoggingHighlightSink, Runtime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli_config = CliConfig::from_env();
    let content = ContentFactory::new(&cli_config.data_dir);
    let game_config = content
        .load_config()
        .with_context(|| format!("loading config from {}", content.data_dir().display()))?;
    let level = content
        .load_level()
        .with_context(|| format!("loading level from {}", content.data_dir().display()))?;

    tracing::info!(
        data_dir = %content.data_dir().display(),
        wands = level.wands.len(),
        "Starting witch hunt console"
    );

    let runtime = Runtime::builder()
        .config(RuntimeConfig::from_env().with_game_config(game_config))
        .level(level)
        .highlight_sink(Arc::new(LoggingHighlightSink))
        .build()
        .await?;

    let handle = runtime.handle();
    handle.spawn_player(cli_config.player, Vec3::ZERO).await?;
    handle
        .spawn_player(cli_config.rival, cli_config.rival_position)
        .await?;

    let printer = tokio::spawn(presentation::follow_effects(handle.clone()));

    let result = console::run(handle, &cli_config).await;

    runtime.shutdown().await?;
    if printer.await.is_err() {
        tracing::warn!("effect printer ended abnormally");
    }

    tracing::info!("Console shutdown complete");
    result
}

// Encryptor - terminal client for a remote encryption service
//
// Generates keys, encrypts and decrypts messages by calling an HTTP service;
// no cryptography happens locally.
//
// Architecture:
// - State (state/): pure UI state machine; controllers emit UiCommands
// - API client (api/): reqwest JSON client behind the CryptoService trait
// - TUI (ratatui): event loop, rendering, form input, clipboard
// - Config/CLI: TOML file + env + command line
// - Logging: tracing into an in-memory buffer, optional JSON files

mod api;
mod cli;
mod config;
mod logging;
mod state;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, LogRotation};
use logging::{LogBuffer, TuiLogLayer};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// Precedence: RUST_LOG env var > config file > default "info". Returns the
/// file writer guard, which must live until exit so buffered lines flush.
fn init_tracing(config: &Config, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("encryptor={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let mut guard = None;
    let file_layer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let dir = &config.logging.file_dir;
                let prefix = &config.logging.file_prefix;
                let appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };
                let (writer, file_guard) = tracing_appender::non_blocking(appender);
                guard = Some(file_guard);
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(TuiLogLayer::new(log_buffer.clone()))
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Config subcommands exit early
    if cli::handle_cli(&cli)? {
        return Ok(());
    }

    Config::ensure_config_exists();
    let config = cli::load_config(&cli)?;

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, &log_buffer);

    let service = api::HttpService::new(
        &config.api_url,
        config.request_timeout(),
        config.probe_timeout(),
    )
    .context("Failed to set up service client")?;
    tracing::info!("Encryptor {} using {}", config::VERSION, service.base_url());

    if let Err(e) = tui::run_tui(Arc::new(service), &config, log_buffer).await {
        tracing::error!("TUI error: {:?}", e);
        return Err(e);
    }

    tracing::info!("Shutting down");
    Ok(())
}

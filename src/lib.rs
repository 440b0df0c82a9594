// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{resolve, ConfigFile};
use crate::engine::ChangeReactor;
use crate::exec::CommandAction;
use crate::types::CycleMessage;
use crate::watch::DirectoryMonitor;

/// Capacity of the monitor → reactor channel. The monitor can run at most
/// one message ahead of the reactor.
pub const CHANGE_CHANNEL_CAPACITY: usize = 1;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI flags over optional TOML file)
/// - the directory monitor (producer)
/// - the change reactor running the command (consumer)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve(&args)?;
    run_with_config(cfg).await
}

/// Run monitor and reactor until a fatal error or Ctrl-C.
pub async fn run_with_config(cfg: ConfigFile) -> Result<()> {
    let (monitor_settings, command_settings) = cfg.into_parts();
    debug!(monitor = %monitor_settings, command = %command_settings, "resolved configuration");

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel::<CycleMessage>(CHANGE_CHANNEL_CAPACITY);

    let monitor = DirectoryMonitor::new(monitor_settings)?;

    let on_failure = command_settings.on_failure;
    let reactor = ChangeReactor::new(rx, CommandAction::new(command_settings), on_failure);
    let reactor_handle = reactor.spawn(cancel.clone());
    let monitor_handle = monitor.spawn(tx, cancel.clone());

    // Ctrl-C → graceful shutdown.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        warn!("failed to listen for Ctrl+C: {e}");
                        return;
                    }
                    info!("Ctrl+C received; shutting down");
                    cancel.cancel();
                }
                _ = cancel.cancelled() => {}
            }
        });
    }

    // When the monitor ends its sender is dropped, so the reactor drains the
    // remaining messages and sees the channel close.
    let monitor_result = monitor_handle.wait().await;
    let reactor_result = reactor_handle.await?;
    cancel.cancel();

    monitor_result?;
    reactor_result?;
    info!("dirpoll exiting");
    Ok(())
}

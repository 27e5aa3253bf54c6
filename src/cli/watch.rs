//! `ckdeps watch`: keep the tree in sync until interrupted.
//!
//! Wires an [`FsWatcher`] to a [`Synchronizer`] running on its own task. Every
//! installed tree re-targets the watcher at the new observed roots. Mapping
//! changes are recorded in an in-memory host and printed.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use super::CommandContext;
use crate::sync::{SyncCommand, SyncNotification, Synchronizer};
use crate::vcs::InMemoryMappings;
use crate::watch::FsWatcher;

#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Print the tree after every refresh
    #[arg(long)]
    pub print_tree: bool,
}

impl WatchCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let vcs = Arc::new(InMemoryMappings::new());
        let synchronizer = Synchronizer::new(context.project_root(), &context.config, vcs);
        let mut notifications = synchronizer.subscribe();

        let (mut watcher, mut batches) = FsWatcher::new(context.config.debounce())?;
        watcher.sync_watched(&synchronizer.observed_roots().paths());

        let (commands, command_rx) = mpsc::channel(16);
        let print_tree = self.print_tree;
        let worker = tokio::spawn(async move {
            let synchronizer = synchronizer.run(command_rx).await;
            if print_tree {
                print!("{}", super::tree::render(synchronizer.model(), None));
            }
        });
        commands.send(SyncCommand::Refresh).await?;

        println!("Watching {} (Ctrl-C to stop)", context.project_root().display());
        loop {
            tokio::select! {
                batch = batches.recv() => match batch {
                    Some(events) => {
                        if commands.send(SyncCommand::FsEvents(events)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                notification = notifications.recv() => match notification {
                    Ok(SyncNotification::TreeReplaced {
                        refresh,
                        dependencies,
                        observed_roots,
                    }) => {
                        println!("{} refresh {}: {} dependencies", "↻".cyan(), refresh, dependencies);
                        watcher.sync_watched(&observed_roots);
                    }
                    Ok(SyncNotification::MappingsChanged(outcome)) => {
                        for root in &outcome.added {
                            println!("  {} {}", "+".green(), root);
                        }
                        for root in &outcome.removed {
                            println!("  {} {}", "-".red(), root);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Skipped {} notifications", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, shutting down");
                    break;
                }
            }
        }

        let _ = commands.send(SyncCommand::Shutdown).await;
        worker.await?;
        Ok(())
    }
}

//! Filesystem watching with `notify`.
//!
//! [`FsWatcher`] watches the observed roots recursively, translates backend events
//! into [`FsEvent`]s and coalesces bursts into one batch per debounce window. The
//! batches are meant to be forwarded as
//! [`SyncCommand::FsEvents`](crate::sync::SyncCommand::FsEvents); the synchronizer
//! then decides whether a batch is in scope.
//!
//! After each installed tree the set of watched roots should follow
//! [`SyncNotification::TreeReplaced`](crate::sync::SyncNotification::TreeReplaced)
//! through [`FsWatcher::sync_watched`].

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::core::CutekitError;
use crate::sync::FsEvent;

/// Capacity of the batch channel handed to callers.
const BATCH_BUFFER: usize = 16;

/// Recursive watcher over a changing set of roots.
pub struct FsWatcher {
    watcher: RecommendedWatcher,
    watched: BTreeSet<PathBuf>,
}

impl FsWatcher {
    /// Creates a watcher and the receiver of its event batches.
    ///
    /// Must be called within a Tokio runtime; the debouncing task stops when the
    /// watcher is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CutekitError::WatcherError`] if the platform backend cannot start.
    pub fn new(debounce: Duration) -> Result<(Self, mpsc::Receiver<Vec<FsEvent>>), CutekitError> {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = raw_tx.send(res);
            },
            Config::default(),
        )
        .map_err(|e| CutekitError::WatcherError {
            path: String::new(),
            reason: e.to_string(),
        })?;

        let (batch_tx, batch_rx) = mpsc::channel(BATCH_BUFFER);
        tokio::spawn(debounce_events(raw_rx, batch_tx, debounce));

        Ok((
            Self {
                watcher,
                watched: BTreeSet::new(),
            },
            batch_rx,
        ))
    }

    /// Roots currently watched.
    pub fn watched(&self) -> impl Iterator<Item = &Path> {
        self.watched.iter().map(PathBuf::as_path)
    }

    /// Watches exactly `roots`: new ones are added, vanished ones removed.
    ///
    /// Roots that do not exist are skipped. Failures are logged and returned; the
    /// remaining roots are still processed.
    pub fn sync_watched(&mut self, roots: &[PathBuf]) -> Vec<CutekitError> {
        let wanted: BTreeSet<PathBuf> = roots.iter().filter(|root| root.is_dir()).cloned().collect();
        let mut errors = Vec::new();

        let stale: Vec<PathBuf> = self.watched.difference(&wanted).cloned().collect();
        for root in stale {
            if let Err(e) = self.watcher.unwatch(&root) {
                tracing::debug!("Failed to unwatch {}: {}", root.display(), e);
            }
            self.watched.remove(&root);
        }

        for root in wanted {
            if self.watched.contains(&root) {
                continue;
            }
            match self.watcher.watch(&root, RecursiveMode::Recursive) {
                Ok(()) => {
                    tracing::debug!("Watching {}", root.display());
                    self.watched.insert(root);
                }
                Err(e) => {
                    let error = CutekitError::WatcherError {
                        path: root.display().to_string(),
                        reason: e.to_string(),
                    };
                    tracing::warn!("{}", error);
                    errors.push(error);
                }
            }
        }
        errors
    }
}

impl std::fmt::Debug for FsWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsWatcher").field("watched", &self.watched).finish_non_exhaustive()
    }
}

/// Translates one backend event.
///
/// Access events are dropped. A rename reported with both paths becomes a
/// [`FsEvent::Renamed`] when the parent is unchanged and a [`FsEvent::Moved`]
/// otherwise; half-reported renames become a removal or a creation.
#[must_use]
pub fn translate(event: Event) -> Vec<FsEvent> {
    let Event {
        kind,
        paths,
        ..
    } = event;

    match kind {
        EventKind::Access(_) => Vec::new(),
        EventKind::Create(_) => paths.into_iter().map(FsEvent::Created).collect(),
        EventKind::Remove(_) => paths.into_iter().map(FsEvent::Removed).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if paths.len() == 2 => {
            let mut paths = paths.into_iter();
            let (Some(from), Some(to)) = (paths.next(), paths.next()) else {
                return Vec::new();
            };
            if from.parent() == to.parent() {
                vec![FsEvent::Renamed {
                    from,
                    to,
                }]
            } else {
                vec![FsEvent::Moved {
                    from,
                    to,
                }]
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.into_iter().map(FsEvent::Removed).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.into_iter().map(FsEvent::Created).collect()
        }
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
            paths.into_iter().map(FsEvent::Modified).collect()
        }
    }
}

async fn debounce_events(
    mut raw: mpsc::UnboundedReceiver<notify::Result<Event>>,
    out: mpsc::Sender<Vec<FsEvent>>,
    window: Duration,
) {
    while let Some(first) = raw.recv().await {
        let mut batch = Vec::new();
        push_translated(&mut batch, first);

        let deadline = tokio::time::Instant::now() + window;
        while let Ok(Some(next)) = tokio::time::timeout_at(deadline, raw.recv()).await {
            push_translated(&mut batch, next);
        }

        if batch.is_empty() {
            continue;
        }
        tracing::debug!("Forwarding {} filesystem events", batch.len());
        if out.send(batch).await.is_err() {
            break;
        }
    }
}

fn push_translated(batch: &mut Vec<FsEvent>, result: notify::Result<Event>) {
    match result {
        Ok(event) => {
            for translated in translate(event) {
                if !batch.contains(&translated) {
                    batch.push(translated);
                }
            }
        }
        Err(e) => tracing::warn!("Filesystem watcher error: {}", e),
    }
}

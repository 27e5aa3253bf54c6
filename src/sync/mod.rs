//! Refresh cycle: collect, build, swap, restore, reconcile.
//!
//! A [`Synchronizer`] owns everything the view shows for one project: the current
//! [`TreeModel`], the positional [`ViewState`], the [`ObservedRoots`] used to filter
//! change events and the registry of version-control roots it registered.
//!
//! # Execution Model
//!
//! The synchronizer itself is single-threaded: every state transition happens in
//! the task that owns it. [`Synchronizer::refresh`] starts a worker that runs
//! collection and tree building on Tokio's blocking pool; the finished tree comes
//! back over a channel as a [`RefreshCompletion`] and is installed by
//! [`Synchronizer::apply_completion`]. Nothing else crosses between the two.
//!
//! Overlapping refreshes are independent and are not cancelled. Each gets a
//! monotonically increasing [`RefreshId`]; a completion older than the last one
//! installed is discarded, so a slow early refresh can never overwrite a newer tree.
//!
//! # Channels
//!
//! - Inbound: [`SyncCommand`]s (change event batches, refresh requests, editor
//!   selection) consumed by [`Synchronizer::run`]
//! - Outbound: [`SyncNotification`]s on a broadcast channel, one
//!   [`TreeReplaced`](SyncNotification::TreeReplaced) per installed tree and a
//!   [`MappingsChanged`](SyncNotification::MappingsChanged) when reconciliation wrote
//!   the host's mapping list
//!
//! # Example
//!
//! ```rust,no_run
//! use cutekit_deps::config::SyncConfig;
//! use cutekit_deps::sync::{SyncCommand, Synchronizer};
//! use cutekit_deps::vcs::InMemoryMappings;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let sync = Synchronizer::new(Path::new("/work/app"), &SyncConfig::default(), Arc::new(InMemoryMappings::new()));
//! let mut notifications = sync.subscribe();
//! let (tx, rx) = tokio::sync::mpsc::channel(16);
//! let handle = tokio::spawn(sync.run(rx));
//!
//! tx.send(SyncCommand::Refresh).await?;
//! let replaced = notifications.recv().await?;
//! println!("{replaced:?}");
//! tx.send(SyncCommand::Shutdown).await?;
//! handle.await?;
//! # Ok(())
//! # }
//! ```

mod events;
mod observed;

pub use events::{FsEvent, FsEventKind};
pub use observed::ObservedRoots;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::config::SyncConfig;
use crate::constants::{EMPTY_TEXT, LOADING_TEXT, NOTIFICATION_BUFFER};
use crate::core::CutekitError;
use crate::resolver::{DependencyCollector, ExternResolver, ResolvedDependency};
use crate::tree::{
    FileSystemAccess, LocalFileSystem, NodeId, TreeBuilder, TreeModel, TreeStateStore, ViewState,
};
use crate::utils::paths::{absolutize, path_key};
use crate::vcs::{GitRootRegistry, ReconcileOutcome, VcsMappings, desired_roots, reconcile};

/// Identifier of one refresh, increasing with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefreshId(u64);

impl RefreshId {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RefreshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a worker produced.
#[derive(Debug)]
pub struct RefreshOutput {
    pub dependencies: Vec<ResolvedDependency>,
    pub model: TreeModel,
    pub visited_roots: BTreeSet<String>,
}

/// A finished refresh on its way back to the synchronizer.
#[derive(Debug)]
pub struct RefreshCompletion {
    pub id: RefreshId,
    pub result: Result<RefreshOutput, CutekitError>,
}

/// What [`Synchronizer::apply_completion`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The tree was installed.
    Applied,
    /// A newer tree was already installed; the completion was dropped.
    Stale,
    /// The worker did not finish; the current tree stays.
    Failed,
}

/// Coarse state of the view, for hosts that show a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Empty,
    Ready,
}

impl ViewStatus {
    /// Text to show instead of (or above) the tree; empty when ready.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Loading => LOADING_TEXT,
            Self::Empty => EMPTY_TEXT,
            Self::Ready => "",
        }
    }
}

/// Inbound messages for [`Synchronizer::run`].
#[derive(Debug, Clone)]
pub enum SyncCommand {
    /// A batch of change events; triggers at most one refresh.
    FsEvents(Vec<FsEvent>),
    /// Unconditional refresh.
    Refresh,
    /// Follow an editor selection.
    SelectPath(PathBuf),
    /// Stop the loop.
    Shutdown,
}

/// Outbound notifications.
#[derive(Debug, Clone)]
pub enum SyncNotification {
    /// A new tree was installed.
    TreeReplaced {
        refresh: RefreshId,
        dependencies: usize,
        /// Roots now observed, for re-targeting a watcher
        observed_roots: Vec<PathBuf>,
    },
    /// Reconciliation changed the host's mapping list.
    MappingsChanged(ReconcileOutcome),
}

/// Keeps one project's dependency tree in sync with the filesystem.
pub struct Synchronizer<F: FileSystemAccess + 'static = LocalFileSystem> {
    project_root: PathBuf,
    collector: Arc<DependencyCollector>,
    builder: Arc<TreeBuilder<F>>,
    vcs: Arc<dyn VcsMappings>,
    vcs_system: String,

    model: TreeModel,
    view: ViewState,
    status: ViewStatus,
    dependencies: Vec<ResolvedDependency>,
    observed: ObservedRoots,
    registry: GitRootRegistry,
    pending_selection: Option<String>,

    next_id: u64,
    last_applied: Option<RefreshId>,
    in_flight: BTreeSet<RefreshId>,
    completions_tx: mpsc::UnboundedSender<RefreshCompletion>,
    completions_rx: mpsc::UnboundedReceiver<RefreshCompletion>,
    notifications: broadcast::Sender<SyncNotification>,
}

impl Synchronizer<LocalFileSystem> {
    /// Creates a synchronizer for `project_root` reading the local disk.
    pub fn new(project_root: &Path, config: &SyncConfig, vcs: Arc<dyn VcsMappings>) -> Self {
        let collector = DependencyCollector::new(ExternResolver::new(config.effective_home()));
        Self::with_parts(project_root, collector, LocalFileSystem::new(), vcs, config.vcs_system.clone())
    }
}

impl<F: FileSystemAccess + 'static> Synchronizer<F> {
    /// Creates a synchronizer from explicit collaborators.
    pub fn with_parts(
        project_root: &Path,
        collector: DependencyCollector,
        fs: F,
        vcs: Arc<dyn VcsMappings>,
        vcs_system: impl Into<String>,
    ) -> Self {
        let project_root = absolutize(project_root).unwrap_or_else(|| project_root.to_path_buf());
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (notifications, _) = broadcast::channel(NOTIFICATION_BUFFER);
        let observed = ObservedRoots::compute(&project_root, &[]);

        Self {
            project_root,
            collector: Arc::new(collector),
            builder: Arc::new(TreeBuilder::new(fs)),
            vcs,
            vcs_system: vcs_system.into(),
            model: TreeModel::new(),
            view: ViewState::new(),
            status: ViewStatus::Loading,
            dependencies: Vec::new(),
            observed,
            registry: GitRootRegistry::new(),
            pending_selection: None,
            next_id: 1,
            last_applied: None,
            in_flight: BTreeSet::new(),
            completions_tx,
            completions_rx,
            notifications,
        }
    }

    /// Subscribes to outbound notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncNotification> {
        self.notifications.subscribe()
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub const fn model(&self) -> &TreeModel {
        &self.model
    }

    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable view, for hosts reflecting user clicks.
    pub const fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub const fn status(&self) -> ViewStatus {
        self.status
    }

    /// Dependencies of the installed tree.
    pub fn dependencies(&self) -> &[ResolvedDependency] {
        &self.dependencies
    }

    pub const fn observed_roots(&self) -> &ObservedRoots {
        &self.observed
    }

    /// Roots this synchronizer registered with the version-control host.
    pub const fn registered_roots(&self) -> &GitRootRegistry {
        &self.registry
    }

    /// Path key still waiting to be selected.
    pub fn pending_selection(&self) -> Option<&str> {
        self.pending_selection.as_deref()
    }

    pub const fn last_applied(&self) -> Option<RefreshId> {
        self.last_applied
    }

    /// Returns `true` while any worker has not reported back.
    pub fn is_refreshing(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Starts a refresh on the blocking pool and returns its id.
    ///
    /// Must be called within a Tokio runtime. The result is installed once it is
    /// passed to [`apply_completion`](Self::apply_completion), which
    /// [`run`](Self::run) and [`process_next_completion`](Self::process_next_completion)
    /// do.
    pub fn refresh(&mut self) -> RefreshId {
        let id = RefreshId(self.next_id);
        self.next_id += 1;
        self.in_flight.insert(id);
        self.status = ViewStatus::Loading;

        let collector = Arc::clone(&self.collector);
        let builder = Arc::clone(&self.builder);
        let root = self.project_root.clone();
        let tx = self.completions_tx.clone();

        tracing::info!("Refreshing CuteKit dependencies of {} ({})", root.display(), id);
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                let collection = collector.collect_with_visited(&root);
                let model = builder.build(&collection.dependencies, &root);
                RefreshOutput {
                    dependencies: collection.dependencies,
                    model,
                    visited_roots: collection.visited_roots,
                }
            })
            .await
            .map_err(|e| CutekitError::WorkerFailed {
                reason: e.to_string(),
            });

            if tx
                .send(RefreshCompletion {
                    id,
                    result,
                })
                .is_err()
            {
                tracing::debug!("Synchronizer dropped before refresh {} completed", id);
            }
        });
        id
    }

    /// Returns `true` if `event` touches an observed root.
    pub fn should_refresh(&self, event: &FsEvent) -> bool {
        self.observed.matches(event)
    }

    /// Starts one refresh if any event in the batch is in scope.
    pub fn handle_events(&mut self, events: &[FsEvent]) -> Option<RefreshId> {
        if events.iter().any(|event| self.should_refresh(event)) {
            Some(self.refresh())
        } else {
            tracing::debug!("Ignoring {} filesystem events outside observed roots", events.len());
            None
        }
    }

    /// Waits for the next worker to report and applies its result.
    ///
    /// Returns `None` only if the completion channel closed.
    pub async fn process_next_completion(&mut self) -> Option<ApplyOutcome> {
        let completion = self.completions_rx.recv().await?;
        Some(self.apply_completion(completion))
    }

    /// Starts a refresh and waits until it, or a newer one, is installed.
    pub async fn refresh_and_wait(&mut self) -> ApplyOutcome {
        let id = self.refresh();
        loop {
            let Some(outcome) = self.process_next_completion().await else {
                return ApplyOutcome::Failed;
            };
            if self.last_applied.is_some_and(|last| last >= id) {
                return ApplyOutcome::Applied;
            }
            if !self.in_flight.contains(&id) {
                return outcome;
            }
        }
    }

    /// Installs a worker result unless a newer one is already installed.
    ///
    /// On success the previous expansion and selection are captured, the new tree is
    /// installed, observed roots are recomputed, version-control mappings are
    /// reconciled and the captured state is restored onto the new tree. When nothing
    /// could be restored the top level is expanded.
    pub fn apply_completion(&mut self, completion: RefreshCompletion) -> ApplyOutcome {
        let RefreshCompletion {
            id,
            result,
        } = completion;
        self.in_flight.remove(&id);

        if self.last_applied.is_some_and(|last| id <= last) {
            tracing::debug!("Discarding stale refresh {}", id);
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(output) => {
                self.install(id, output);
                ApplyOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Refresh {} failed: {}", id, e);
                if !self.is_refreshing() {
                    self.status = self.settled_status();
                }
                ApplyOutcome::Failed
            }
        }
    }

    fn install(&mut self, id: RefreshId, output: RefreshOutput) {
        let previous = TreeStateStore::capture(&self.model, &self.view);

        self.model = output.model;
        self.dependencies = output.dependencies;
        self.last_applied = Some(id);
        self.status = if self.is_refreshing() {
            ViewStatus::Loading
        } else {
            self.settled_status()
        };

        self.observed = ObservedRoots::compute(&self.project_root, &self.dependencies);

        let desired = desired_roots(&self.dependencies, &self.project_root);
        let mappings = reconcile(self.vcs.as_ref(), &self.vcs_system, &mut self.registry, &desired);

        let restored = TreeStateStore::restore(&self.model, &mut self.view, &previous);
        if !restored.matched_any() {
            self.view.expand_one_level(&self.model);
        }
        self.apply_pending_selection();

        tracing::debug!(
            "Installed refresh {}: {} dependencies, {} roots read, {} nodes",
            id,
            self.dependencies.len(),
            output.visited_roots.len(),
            self.model.len()
        );

        // No receivers is fine; hosts subscribe when they care.
        let _ = self.notifications.send(SyncNotification::TreeReplaced {
            refresh: id,
            dependencies: self.dependencies.len(),
            observed_roots: self.observed.paths(),
        });
        if mappings.changed {
            let _ = self.notifications.send(SyncNotification::MappingsChanged(mappings));
        }
    }

    fn settled_status(&self) -> ViewStatus {
        if self.dependencies.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        }
    }

    /// Selects the node for `path`, or remembers it until a refresh lists it.
    ///
    /// Returns `true` if the node is selected now.
    pub fn select_path(&mut self, path: &Path) -> bool {
        let Some(key) = path_key(path) else {
            return false;
        };
        if self.current_selection_key().as_deref() == Some(key.as_str()) {
            self.pending_selection = None;
            return true;
        }
        if let Some(id) = self.model.find_by_path(&key) {
            self.view.select(&self.model, id);
            self.pending_selection = None;
            true
        } else {
            tracing::debug!("{} not in the tree yet, selection deferred", key);
            self.pending_selection = Some(key);
            false
        }
    }

    fn apply_pending_selection(&mut self) {
        let Some(key) = self.pending_selection.clone() else {
            return;
        };
        if let Some(id) = self.model.find_by_path(&key) {
            self.view.select(&self.model, id);
            self.pending_selection = None;
        }
    }

    fn current_selection_key(&self) -> Option<String> {
        let &id = self.view.selected().first()?;
        self.model.kind(id)?.navigation_path().and_then(path_key)
    }

    /// Filesystem entries behind the selected nodes, without duplicates.
    pub fn selected_entries(&self) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = Vec::new();
        for &id in self.view.selected() {
            let Some(path) = self.model.kind(id).and_then(|kind| kind.file_path()) else {
                continue;
            };
            if path.exists() && !entries.iter().any(|existing| existing == path) {
                entries.push(path.to_path_buf());
            }
        }
        entries
    }

    /// Selects the nodes with the given ids, for hosts mirroring a multi-selection.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.view.set_selection(ids);
    }

    /// Processes commands and worker completions until shutdown.
    ///
    /// Returns the synchronizer so its final state can be inspected.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SyncCommand>) -> Self {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SyncCommand::FsEvents(events)) => {
                        self.handle_events(&events);
                    }
                    Some(SyncCommand::Refresh) => {
                        self.refresh();
                    }
                    Some(SyncCommand::SelectPath(path)) => {
                        self.select_path(&path);
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                },
                Some(completion) = self.completions_rx.recv() => {
                    self.apply_completion(completion);
                }
            }
        }
        tracing::debug!("Synchronizer for {} stopped", self.project_root.display());
        self
    }
}

impl<F: FileSystemAccess + 'static> fmt::Debug for Synchronizer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synchronizer")
            .field("project_root", &self.project_root)
            .field("status", &self.status)
            .field("dependencies", &self.dependencies.len())
            .field("observed", &self.observed)
            .field("last_applied", &self.last_applied)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

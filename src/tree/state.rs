//! Expansion and selection, positional and structural.
//!
//! [`ViewState`] tracks what is expanded and selected in terms of [`NodeId`]s and is
//! only valid for the model it was built against. [`TreeState`] is the same
//! information expressed as key paths, which survives a rebuild.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::model::TreeModel;
use super::node::NodeId;

/// Expanded and selected nodes of one model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    expanded: HashSet<NodeId>,
    selected: Vec<NodeId>,
}

impl ViewState {
    /// Nothing expanded, nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expand(&mut self, id: NodeId) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: NodeId) {
        self.expanded.remove(&id);
    }

    /// Expanded nodes, in no particular order.
    pub fn expanded(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.expanded.iter().copied()
    }

    /// Selected nodes in the order they were selected.
    #[must_use]
    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    /// Replaces the selection, dropping duplicates.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let mut seen = HashSet::new();
        self.selected = ids.into_iter().filter(|id| seen.insert(*id)).collect();
    }

    /// Selects exactly one node and expands its ancestors so it is visible.
    pub fn select(&mut self, model: &TreeModel, id: NodeId) {
        let mut ancestor = model.parent(id);
        while let Some(parent) = ancestor {
            self.expanded.insert(parent);
            ancestor = model.parent(parent);
        }
        self.selected = vec![id];
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Expands every top-level node that has children.
    pub fn expand_one_level(&mut self, model: &TreeModel) {
        for &root in model.roots() {
            if !model.children(root).is_empty() {
                self.expanded.insert(root);
            }
        }
    }

    /// Expands every node that has children.
    pub fn expand_all(&mut self, model: &TreeModel) {
        for id in model.preorder() {
            if !model.children(id).is_empty() {
                self.expanded.insert(id);
            }
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Nodes visible with the current expansion, in display order.
    #[must_use]
    pub fn visible(&self, model: &TreeModel) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = model.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if self.is_expanded(id) {
                stack.extend(model.children(id).iter().rev().copied());
            }
        }
        out
    }
}

/// Expansion and selection as key paths.
///
/// A state with both sets empty means "nothing to restore".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeState {
    pub expanded_keys: BTreeSet<String>,
    pub selected_keys: BTreeSet<String>,
}

impl TreeState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded_keys.is_empty() && self.selected_keys.is_empty()
    }
}

/// What [`TreeStateStore::restore`] managed to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// Nodes expanded from `expanded_keys`
    pub expanded: usize,
    /// Nodes selected from `selected_keys`
    pub selected: usize,
}

impl RestoreOutcome {
    #[must_use]
    pub const fn matched_any(&self) -> bool {
        self.expanded > 0 || self.selected > 0
    }
}

/// Converts between [`ViewState`] and [`TreeState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeStateStore;

impl TreeStateStore {
    /// Key paths of the expanded and selected nodes of `model`.
    #[must_use]
    pub fn capture(model: &TreeModel, view: &ViewState) -> TreeState {
        let mut state = TreeState::default();
        let selected: HashSet<NodeId> = view.selected().iter().copied().collect();

        for (id, key) in model.preorder_with_keys() {
            let is_selected = selected.contains(&id);
            if view.is_expanded(id) {
                state.expanded_keys.insert(key.clone());
            }
            if is_selected {
                state.selected_keys.insert(key);
            }
        }
        state
    }

    /// Rebuilds `view` for `model` from `state`.
    ///
    /// The view is reset first. An empty state leaves it that way. Otherwise every
    /// node whose key path is in `expanded_keys` is expanded, and the nodes whose key
    /// path is in `selected_keys` become the selection in one batch at the end. Keys
    /// of nodes that no longer exist are dropped silently.
    pub fn restore(model: &TreeModel, view: &mut ViewState, state: &TreeState) -> RestoreOutcome {
        *view = ViewState::new();
        if state.is_empty() {
            return RestoreOutcome::default();
        }

        let mut outcome = RestoreOutcome::default();
        let mut selection = Vec::new();
        for (id, key) in model.preorder_with_keys() {
            if state.expanded_keys.contains(&key) {
                view.expand(id);
                outcome.expanded += 1;
            }
            if state.selected_keys.contains(&key) {
                selection.push(id);
            }
        }

        outcome.selected = selection.len();
        view.set_selection(selection);
        outcome
    }
}

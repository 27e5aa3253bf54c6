//! Arena-backed tree model.

use std::collections::VecDeque;
use std::path::Path;

use crate::constants::KEY_PATH_SEPARATOR;
use crate::utils::paths::path_key;

use super::node::{NodeId, NodeKind, TreeNode};

/// An immutable-after-build tree of [`TreeNode`]s.
///
/// The model has no visible root of its own; it holds an ordered list of top-level
/// nodes (the project root followed by one node per dependency).
#[derive(Debug, Clone, Default)]
pub struct TreeModel {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl TreeModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a top-level node.
    pub fn add_root(&mut self, kind: NodeKind) -> NodeId {
        let id = self.push(kind, None);
        self.roots.push(id);
        id
    }

    /// Appends `kind` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.push(kind, Some(parent));
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Top-level nodes in display order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Looks up a node's variant.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    /// Children of `id` in display order; empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Parent of `id`, `None` for top-level nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the model holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of dependency nodes.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.nodes.iter().filter(|node| matches!(node.kind, NodeKind::Dependency { .. })).count()
    }

    /// Key path of `id`: the segments from its top-level ancestor down, joined by `|`.
    #[must_use]
    pub fn key_path(&self, id: NodeId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            segments.push(node.kind.key_segment());
            current = node.parent;
        }
        segments.reverse();
        Some(segments.join(KEY_PATH_SEPARATOR))
    }

    /// All nodes in pre-order.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        self.preorder_with_keys().into_iter().map(|(id, _)| id).collect()
    }

    /// All nodes in pre-order paired with their key paths.
    ///
    /// Key paths are built incrementally from the parent's, so this is linear in
    /// the total key length rather than quadratic in depth.
    #[must_use]
    pub fn preorder_with_keys(&self) -> Vec<(NodeId, String)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Option<String>)> =
            self.roots.iter().rev().map(|&id| (id, None)).collect();

        while let Some((id, prefix)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let segment = node.kind.key_segment();
            let key = match prefix {
                Some(prefix) => format!("{prefix}{KEY_PATH_SEPARATOR}{segment}"),
                None => segment,
            };
            for &child in node.children.iter().rev() {
                stack.push((child, Some(key.clone())));
            }
            out.push((id, key));
        }
        out
    }

    /// Finds the node with the given key path.
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<NodeId> {
        self.preorder_with_keys().into_iter().find(|(_, k)| k == key).map(|(id, _)| id)
    }

    /// Finds the first node, breadth-first, whose navigation path has key `target_key`.
    ///
    /// `target_key` must already be a path key; see
    /// [`normalize_key`](crate::utils::paths::normalize_key).
    #[must_use]
    pub fn find_by_path(&self, target_key: &str) -> Option<NodeId> {
        let mut queue: VecDeque<NodeId> = self.roots.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if node.kind.navigation_path().and_then(path_key).as_deref() == Some(target_key) {
                return Some(id);
            }
            queue.extend(node.children.iter().copied());
        }
        None
    }

    /// Key paths of nodes whose search text contains `query`, ignoring case.
    ///
    /// An empty query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.preorder_with_keys()
            .into_iter()
            .filter(|(id, _)| {
                self.kind(*id).is_some_and(|kind| kind.search_text().to_lowercase().contains(&needle))
            })
            .map(|(_, key)| key)
            .collect()
    }

    /// Top-level node for the dependency with `id`, first match in display order.
    #[must_use]
    pub fn dependency_node(&self, id: &str) -> Option<NodeId> {
        self.roots.iter().copied().find(|&root| {
            matches!(self.kind(root), Some(NodeKind::Dependency { dependency, .. }) if dependency.id == id)
        })
    }

    /// Top-level project node, if the project root was listed.
    #[must_use]
    pub fn project_node(&self) -> Option<NodeId> {
        self.roots.iter().copied().find(|&root| matches!(self.kind(root), Some(NodeKind::ProjectRoot { .. })))
    }

    /// Returns `true` if `path` is listed anywhere in the tree.
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        path_key(path).is_some_and(|key| self.find_by_path(&key).is_some())
    }
}

//! Navigable tree of the project and its extern dependencies.
//!
//! A [`TreeModel`] is rebuilt from scratch on every refresh by [`TreeBuilder`]:
//!
//! ```text
//! app                      ProjectRoot
//! ├── src/                 FileEntry (directories first)
//! │   └── main.c
//! └── project
//! libheap                  Dependency (checked out)
//! ├── include/
//! └── project
//! libjson                  Dependency (no checkout)
//! └── No local checkout found      Placeholder
//! ```
//!
//! Nodes never change after a build; the model is replaced wholesale. What the user
//! did with the previous model (expanded folders, selection) lives in a positional
//! [`ViewState`] and is carried across rebuilds by [`TreeStateStore`], which
//! translates it into structural key paths and back.
//!
//! # Key Paths
//!
//! Every node has a *key segment* that does not depend on its position
//! (`project:<path>`, `dependency:<id>:<origin>`, `file:<path>`, `message:<text>`).
//! A node's key path is the `|`-joined chain of segments from its top-level node
//! down to itself. Reordering or renaming siblings therefore never changes another
//! node's key path.
//!
//! # Filesystem Access
//!
//! The builder reads directories through [`FileSystemAccess`], holding its
//! [`read_scope`](FileSystemAccess::read_scope) guard for the whole walk so that a
//! host can keep structural writes out while a snapshot is taken.

mod builder;
mod fs_access;
mod model;
mod node;
mod state;

pub use builder::TreeBuilder;
pub use fs_access::{DirEntry, FileSystemAccess, LocalFileSystem, ReadGuard};
pub use model::TreeModel;
pub use node::{IconHint, NodeId, NodeKind, TreeNode};
pub use state::{RestoreOutcome, TreeState, TreeStateStore, ViewState};

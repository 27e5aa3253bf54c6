//! `ckdeps tree`: print the dependency tree.
//!
//! The output mirrors what a side panel shows: the project directory, then one
//! node per dependency with its checkout listed underneath.
//!
//! ```text
//! app
//! ├── src
//! │   └── main.c
//! └── project.lock
//! libx
//! ├── include
//! └── project
//! liby
//! └── No local checkout found
//! ```

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;

use super::CommandContext;
use crate::core::CutekitError;
use crate::tree::{IconHint, LocalFileSystem, NodeId, TreeBuilder, TreeModel};

#[derive(Debug, Args)]
pub struct TreeCommand {
    /// Maximum depth below each top-level node
    #[arg(short, long)]
    pub depth: Option<usize>,
}

impl TreeCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        self.validate_arguments()?;

        let collector = context.collector();
        let root = context.project_root().to_path_buf();
        let model = tokio::task::spawn_blocking(move || {
            let dependencies = collector.collect(&root);
            TreeBuilder::new(LocalFileSystem::new()).build(&dependencies, &root)
        })
        .await
        .map_err(|e| CutekitError::WorkerFailed {
            reason: e.to_string(),
        })?;

        print!("{}", render(&model, self.depth));
        Ok(())
    }

    fn validate_arguments(&self) -> Result<()> {
        if self.depth == Some(0) {
            bail!("Depth must be at least 1");
        }
        Ok(())
    }
}

/// Renders `model` with box-drawing connectors, stopping below `depth`.
pub(crate) fn render(model: &TreeModel, depth: Option<usize>) -> String {
    let mut out = String::new();
    for &root in model.roots() {
        let _ = writeln!(out, "{}", styled_label(model, root));
        print_children(model, root, "", 1, depth, &mut out);
    }
    out
}

fn print_children(
    model: &TreeModel,
    parent: NodeId,
    prefix: &str,
    level: usize,
    depth: Option<usize>,
    out: &mut String,
) {
    if depth.is_some_and(|max| level > max) {
        return;
    }

    let children = model.children(parent);
    for (i, &child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let connector = if is_last { "└── " } else { "├── " };
        let _ = writeln!(out, "{prefix}{connector}{}", styled_label(model, child));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        print_children(model, child, &child_prefix, level + 1, depth, out);
    }
}

fn styled_label(model: &TreeModel, id: NodeId) -> String {
    let Some(kind) = model.kind(id) else {
        return String::new();
    };
    let label = kind.label();
    match kind.icon() {
        IconHint::Project => label.bold().to_string(),
        IconHint::Module => label.cyan().bold().to_string(),
        IconHint::Folder => label.blue().to_string(),
        IconHint::File => label,
        IconHint::Warning => label.yellow().to_string(),
    }
}

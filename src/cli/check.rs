//! `ckdeps check`: manifest diagnostics.
//!
//! Collection never fails on a broken manifest; it treats the root as declaring
//! nothing. This command re-reads every root the collection visited and reports
//! what was swallowed, plus every extern without a local checkout.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;

use super::CommandContext;
use crate::core::CutekitError;
use crate::manifest::{ManifestRead, ManifestReader, ManifestSource};
use crate::resolver::ResolvedDependency;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Also fail when an extern has no local checkout
    #[arg(long)]
    pub strict: bool,
}

/// Findings of one check run.
#[derive(Debug, Default)]
pub(crate) struct CheckReport {
    pub roots: Vec<(String, ManifestRead)>,
    pub unresolved: Vec<ResolvedDependency>,
}

impl CheckReport {
    pub fn problem_count(&self) -> usize {
        self.roots.iter().map(|(_, read)| read.problems.len()).sum()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (root, read) in &self.roots {
            let source = match (&read.source, &read.path) {
                (ManifestSource::None, _) | (_, None) => "no manifest".dimmed().to_string(),
                (source, Some(path)) => format!("{source} {}", path.display()),
            };
            let _ = writeln!(out, "{} {} ({} externs)", root.bold(), source, read.externs.len());
            for problem in &read.problems {
                let _ = writeln!(out, "  {} {}", "error:".red().bold(), problem);
            }
        }

        for dep in &self.unresolved {
            let _ = writeln!(
                out,
                "{} {} declared by {}: {}",
                "warning:".yellow().bold(),
                dep.id,
                dep.origin.display(),
                crate::constants::NO_CHECKOUT_MESSAGE
            );
        }
        out
    }
}

impl CheckCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let collection = context.collect().await?;
        let roots: Vec<String> = collection.visited_roots.iter().cloned().collect();

        let reads = tokio::task::spawn_blocking(move || {
            let reader = ManifestReader::new();
            roots
                .into_iter()
                .map(|root| {
                    let read = reader.read_detailed(Path::new(&root));
                    (root, read)
                })
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| CutekitError::WorkerFailed {
            reason: e.to_string(),
        })?;

        let report = CheckReport {
            roots: reads,
            unresolved: collection.dependencies.into_iter().filter(|dep| !dep.is_resolved()).collect(),
        };
        print!("{}", report.render());

        let problems = report.problem_count();
        if problems > 0 {
            bail!("{problems} manifest problem(s) found");
        }
        if self.strict && !report.unresolved.is_empty() {
            bail!("{} extern(s) without a local checkout", report.unresolved.len());
        }

        println!("{}", "✓ All manifests readable".green());
        Ok(())
    }
}

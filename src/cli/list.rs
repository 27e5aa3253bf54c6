//! `ckdeps list`: print the collected dependencies.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::fmt::Write as _;

use super::CommandContext;
use crate::resolver::ResolvedDependency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only show externs without a local checkout
    #[arg(long)]
    pub unresolved: bool,
}

impl ListCommand {
    pub async fn execute(self, context: &CommandContext) -> Result<()> {
        let collection = context.collect().await?;
        let dependencies: Vec<&ResolvedDependency> = collection
            .dependencies
            .iter()
            .filter(|dep| !self.unresolved || !dep.is_resolved())
            .collect();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dependencies)?),
            OutputFormat::Text => print!("{}", render_text(&dependencies)),
        }
        Ok(())
    }
}

/// One line per dependency: id, pin, checkout (or a warning) and declaring root.
pub(crate) fn render_text(dependencies: &[&ResolvedDependency]) -> String {
    if dependencies.is_empty() {
        return format!("{}\n", crate::constants::EMPTY_TEXT);
    }

    let mut out = String::new();
    for dep in dependencies {
        let pin = dep.pin().map(|p| format!(" {p}")).unwrap_or_default();
        let checkout = match &dep.content_root {
            Some(root) => root.display().to_string().green().to_string(),
            None => crate::constants::NO_CHECKOUT_MESSAGE.yellow().to_string(),
        };
        let _ = writeln!(
            out,
            "{}{}  {}  (from {})",
            dep.id.cyan().bold(),
            pin,
            checkout,
            dep.origin.display()
        );
    }
    out
}

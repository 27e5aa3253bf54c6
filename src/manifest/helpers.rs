//! JSON coercion helpers for extern declarations.

use serde_json::{Map, Value};

use super::ExternDeclaration;

/// Extracts every declaration under the top-level `extern` object.
///
/// A missing or non-object `extern` yields an empty list, as does any entry whose
/// value is not an object.
pub(super) fn parse_externs(document: &Map<String, Value>) -> Vec<ExternDeclaration> {
    let Some(Value::Object(externs)) = document.get("extern") else {
        return Vec::new();
    };

    externs
        .iter()
        .filter_map(|(id, entry)| match entry {
            Value::Object(fields) => Some(declaration_from_fields(id, fields)),
            _ => {
                tracing::debug!("Skipping extern '{}': entry is not an object", id);
                None
            }
        })
        .collect()
}

fn declaration_from_fields(id: &str, fields: &Map<String, Value>) -> ExternDeclaration {
    ExternDeclaration {
        id: id.to_string(),
        git: optional_string(fields.get("git")),
        tag: optional_string(fields.get("tag")),
        commit: optional_string(fields.get("commit")),
        version: optional_string(fields.get("version")),
        names: string_list(fields.get("names")),
    }
}

/// Renders a scalar as a non-blank string; anything else is absent.
pub(super) fn optional_string(value: Option<&Value>) -> Option<String> {
    let rendered = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if rendered.trim().is_empty() {
        None
    } else {
        Some(rendered)
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|item| optional_string(Some(item))).collect(),
        _ => Vec::new(),
    }
}

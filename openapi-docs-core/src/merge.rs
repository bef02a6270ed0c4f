//! Merging per-service OpenAPI definitions into one specification.
//!
//! [`OpenApiMerger`] unions paths, components and tags. Top-level fields such
//! as `openapi`, `info` and `servers` come from the first definition that
//! declares them. Anything the union cannot reconcile is an error; there is
//! no best-effort output.

use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::contract::Merger;
use crate::error::{DocsError, Result};

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("no definitions to merge")]
    NoInputs,

    #[error("definition #{index} is not a valid OpenAPI document: {reason}")]
    InvalidDefinition { index: usize, reason: String },

    #[error("operation {method} {path} is defined by more than one definition")]
    DuplicateOperation { path: String, method: String },

    #[error("operationId '{operation_id}' is used by more than one operation")]
    OperationIdConflict { operation_id: String },

    #[error("component {section}/{name} has conflicting definitions")]
    ComponentConflict { section: String, name: String },

    #[error("reference '{reference}' does not resolve in the merged specification")]
    UnresolvedRef { reference: String },
}

/// Union-based OpenAPI merger.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenApiMerger;

impl OpenApiMerger {
    pub fn new() -> Self {
        Self
    }
}

impl Merger for OpenApiMerger {
    fn merge(&self, definitions: Vec<Value>) -> std::result::Result<Value, MergeError> {
        if definitions.is_empty() {
            return Err(MergeError::NoInputs);
        }

        let mut merged = Map::new();
        let mut paths = Map::new();
        let mut components = Map::new();
        let mut tags: Vec<Value> = Vec::new();
        let mut operation_ids = HashSet::new();

        for (index, definition) in definitions.into_iter().enumerate() {
            let Value::Object(mut doc) = definition else {
                return Err(invalid(index, "top level is not a mapping"));
            };
            if !matches!(doc.get("openapi"), Some(Value::String(_))) {
                return Err(invalid(index, "missing `openapi` version string"));
            }

            if let Some(definition_paths) = doc.remove("paths") {
                merge_paths(index, &mut paths, definition_paths, &mut operation_ids)?;
            }
            if let Some(definition_components) = doc.remove("components") {
                merge_components(index, &mut components, definition_components)?;
            }
            if let Some(definition_tags) = doc.remove("tags") {
                merge_tags(index, &mut tags, definition_tags)?;
            }
            for (field, value) in doc {
                merged.entry(field).or_insert(value);
            }
        }

        let path_count = paths.len();
        merged.insert("paths".to_string(), Value::Object(paths));
        if !components.is_empty() {
            merged.insert("components".to_string(), Value::Object(components));
        }
        if !tags.is_empty() {
            merged.insert("tags".to_string(), Value::Array(tags));
        }

        let merged = Value::Object(merged);
        check_refs(&merged, &merged)?;
        debug!(paths = path_count, "Merged definitions");
        Ok(merged)
    }
}

fn invalid(index: usize, reason: impl Into<String>) -> MergeError {
    MergeError::InvalidDefinition {
        index,
        reason: reason.into(),
    }
}

fn merge_paths(
    index: usize,
    merged: &mut Map<String, Value>,
    paths: Value,
    operation_ids: &mut HashSet<String>,
) -> std::result::Result<(), MergeError> {
    let Value::Object(paths) = paths else {
        return Err(invalid(index, "`paths` is not a mapping"));
    };

    for (path, item) in paths {
        let Value::Object(item) = item else {
            return Err(invalid(index, format!("path item {path} is not a mapping")));
        };
        let target = merged
            .entry(path.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(target) = target else {
            unreachable!("path items are always inserted as mappings");
        };

        for (key, value) in item {
            if HTTP_METHODS.contains(&key.as_str()) {
                if target.contains_key(&key) {
                    return Err(MergeError::DuplicateOperation {
                        path: path.clone(),
                        method: key.to_uppercase(),
                    });
                }
                if let Some(Value::String(operation_id)) = value.get("operationId") {
                    if !operation_ids.insert(operation_id.clone()) {
                        return Err(MergeError::OperationIdConflict {
                            operation_id: operation_id.clone(),
                        });
                    }
                }
                target.insert(key, value);
            } else {
                target.entry(key).or_insert(value);
            }
        }
    }
    Ok(())
}

fn merge_components(
    index: usize,
    merged: &mut Map<String, Value>,
    components: Value,
) -> std::result::Result<(), MergeError> {
    let Value::Object(components) = components else {
        return Err(invalid(index, "`components` is not a mapping"));
    };

    for (section, entries) in components {
        let Value::Object(entries) = entries else {
            return Err(invalid(index, format!("components.{section} is not a mapping")));
        };
        let target = merged
            .entry(section.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(target) = target else {
            unreachable!("component sections are always inserted as mappings");
        };

        for (name, definition) in entries {
            match target.get(&name) {
                None => {
                    target.insert(name, definition);
                }
                Some(existing) if *existing == definition => {
                    debug!(section = %section, name = %name, "Deduplicated identical component");
                }
                Some(_) => {
                    return Err(MergeError::ComponentConflict { section, name });
                }
            }
        }
    }
    Ok(())
}

fn merge_tags(
    index: usize,
    merged: &mut Vec<Value>,
    tags: Value,
) -> std::result::Result<(), MergeError> {
    let Value::Array(tags) = tags else {
        return Err(invalid(index, "`tags` is not a sequence"));
    };

    for tag in tags {
        let Some(name) = tag.get("name").and_then(Value::as_str) else {
            return Err(invalid(index, "tag without a name"));
        };
        if !merged.iter().any(|t| t.get("name").and_then(Value::as_str) == Some(name)) {
            merged.push(tag);
        }
    }
    Ok(())
}

/// Every local `$ref` under `node` must point at something inside `root`.
fn check_refs(root: &Value, node: &Value) -> std::result::Result<(), MergeError> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                if let Some(fragment) = reference.strip_prefix('#') {
                    // Fragments may be percent-encoded (RFC 6901 section 6).
                    let resolved = urlencoding::decode(fragment)
                        .map(|pointer| root.pointer(&pointer).is_some())
                        .unwrap_or(false);
                    if !resolved {
                        return Err(MergeError::UnresolvedRef {
                            reference: reference.clone(),
                        });
                    }
                }
            }
            map.values().try_for_each(|child| check_refs(root, child))
        }
        Value::Array(items) => items.iter().try_for_each(|child| check_refs(root, child)),
        _ => Ok(()),
    }
}

/// Serialize `spec` as compact JSON to `path`, replacing any earlier artifact.
pub async fn write_merged_spec(path: &Path, spec: &Value) -> Result<()> {
    let bytes = serde_json::to_vec(spec)?;
    tokio::fs::write(path, &bytes).await.map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write merged specification");
        DocsError::io(path, e)
    })?;
    info!(path = %path.display(), size = bytes.len(), "Wrote merged specification");
    Ok(())
}

//! Path-addressed rewriting of `.tfstate` documents.

mod path;

pub use path::{PathError, StatePath};

use crate::core::error::MigrateError;
use crate::core::registry::TransformerRegistry;
use crate::core::transformer::StateOutcome;
use crate::core::types::ErrorCategory;
use serde_json::Value;

/// Counters describing what a state run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSummary {
    pub visited: usize,
    pub merged: usize,
    pub deleted: usize,
}

/// Apply every registered transformer to the matching entries of a state document.
///
/// Entries are visited from the last index to the first so that deleting `resources.<i>` never
/// shifts an entry that has not been visited yet.
pub fn transform_state(
    registry: &TransformerRegistry,
    content: &[u8],
) -> Result<(Vec<u8>, StateSummary), MigrateError> {
    let mut doc: Value = serde_json::from_slice(content)?;
    let resource_count = match doc.get("resources") {
        Some(Value::Array(resources)) => resources.len(),
        _ => {
            tracing::debug!("state document has no resources array; leaving it untouched");
            return Ok((content.to_vec(), StateSummary::default()));
        }
    };

    let mut summary = StateSummary::default();
    for index in (0..resource_count).rev() {
        let path = StatePath::resource(index);
        let resource_type = path
            .child("type")
            .get(&doc)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let Some(transformer) = registry.find(&resource_type) else {
            continue;
        };
        summary.visited += 1;

        let outcome = match path.get(&doc) {
            Some(resource) => transformer.transform_state(resource, &path),
            None => continue,
        };
        match outcome {
            StateOutcome::Keep(patch) => {
                for (key, value) in patch.set {
                    path.child(&key)
                        .set(&mut doc, value)
                        .map_err(|err| patch_error(&resource_type, err))?;
                }
                for key in patch.remove {
                    match path.child(&key).delete(&mut doc) {
                        Ok(_) | Err(PathError::Missing(_)) => {}
                        Err(err) => return Err(patch_error(&resource_type, err)),
                    }
                }
                summary.merged += 1;
                tracing::debug!(resource_type = %resource_type, path = %path, "merged state entry");
            }
            StateOutcome::Delete => {
                path.delete(&mut doc)
                    .map_err(|err| patch_error(&resource_type, err))?;
                summary.deleted += 1;
                tracing::info!(resource_type = %resource_type, path = %path, "removed state entry");
            }
            StateOutcome::Fail(reason) => {
                return Err(MigrateError::new(
                    ErrorCategory::TransformerError,
                    format!("failed to transform {} state: {}", resource_type, reason),
                )
                .with_context("resource_type", resource_type.as_str())
                .with_context("path", path.to_string()));
            }
        }
    }

    let mut formatted = serde_json::to_vec_pretty(&doc)?;
    formatted.push(b'\n');
    Ok((formatted, summary))
}

fn patch_error(resource_type: &str, err: PathError) -> MigrateError {
    MigrateError::with_source(
        ErrorCategory::InternalError,
        format!("failed to patch {} state entry", resource_type),
        Box::new(err),
    )
}

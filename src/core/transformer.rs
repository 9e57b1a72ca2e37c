use crate::core::diagnostics::Diagnostics;
use crate::core::error::MigrateError;
use crate::core::state::StatePath;
use hcl_edit::structure::Block;
use serde_json::{Map, Value};

/// What the transform stage should do with a block after a transformer saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Keep,
    Remove,
}

/// Field-level changes to one state entry. Fields the patch does not mention are preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub set: Map<String, Value>,
    pub remove: Vec<String>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.set.insert(key.into(), value.into());
        self
    }

    pub fn remove<K: Into<String>>(mut self, key: K) -> Self {
        self.remove.push(key.into());
        self
    }

    /// Move `from` to `to`, keeping the value. Missing `from` leaves the patch unchanged.
    pub fn rename(self, resource: &Value, from: &str, to: &str) -> Self {
        match resource.get(from) {
            Some(value) => self.set(to, value.clone()).remove(from),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }
}

impl From<Map<String, Value>> for StatePatch {
    fn from(set: Map<String, Value>) -> Self {
        StatePatch {
            set,
            remove: Vec::new(),
        }
    }
}

/// Result of rewriting one state entry.
#[derive(Debug, Clone, PartialEq)]
pub enum StateOutcome {
    /// Patch merged into the entry.
    Keep(StatePatch),
    /// Remove the entry from the state document.
    Delete,
    /// Abort the whole state document.
    Fail(String),
}

/// Rewrite rules for one resource type.
///
/// Implementations are stateless: the same input always produces the same output, and running
/// a transformer over its own output must not change it further.
pub trait ResourceTransformer: Send + Sync {
    /// Dispatch key, the resource type as written in configuration and state.
    fn resource_type(&self) -> &str;

    /// Mutate one `resource "<type>" "<name>"` block in place.
    fn transform_block(
        &self,
        block: &mut Block,
        diagnostics: &mut Diagnostics,
    ) -> Result<BlockAction, MigrateError>;

    /// Rewrite one entry of the state document's `resources` array.
    fn transform_state(&self, resource: &Value, path: &StatePath) -> StateOutcome;

    /// Textual adjustments applied before parsing. Must be idempotent.
    fn preprocess(&self, content: String) -> String {
        content
    }
}

use crate::core::diagnostics::Diagnostics;
use hcl_edit::structure::Body;
use indexmap::IndexMap;
use serde_json::Value;

/// Unit of data threaded through every pipeline stage for one configuration unit.
#[derive(Debug, Clone)]
pub struct TransformContext {
    pub content: Vec<u8>,
    pub filename: String,
    pub ast: Option<Body>,
    pub diagnostics: Diagnostics,
    pub metadata: IndexMap<String, Value>,
    pub dry_run: bool,
}

impl TransformContext {
    pub fn new<T: Into<String>>(content: Vec<u8>, filename: T, dry_run: bool) -> Self {
        TransformContext {
            content,
            filename: filename.into(),
            ast: None,
            diagnostics: Diagnostics::new(),
            metadata: IndexMap::new(),
            dry_run,
        }
    }

    pub fn set_metadata<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

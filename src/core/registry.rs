//! Lookup table from resource type to the transformer that migrates it.

use crate::core::transformer::ResourceTransformer;
use std::collections::HashMap;

/// Registry of resource transformers.
///
/// Built once per run; pipelines only ever read from it.
#[derive(Default)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Box<dyn ResourceTransformer>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        TransformerRegistry {
            transformers: HashMap::new(),
        }
    }

    /// Register a transformer under its own resource type.
    ///
    /// A transformer already registered for the same type is replaced.
    pub fn register<T: ResourceTransformer + 'static>(&mut self, transformer: T) {
        self.register_boxed(Box::new(transformer));
    }

    pub fn register_boxed(&mut self, transformer: Box<dyn ResourceTransformer>) {
        let key = transformer.resource_type().to_string();
        if self.transformers.insert(key.clone(), transformer).is_some() {
            tracing::debug!(resource_type = %key, "replaced previously registered transformer");
        }
    }

    /// Exact-match lookup. `None` means the resource passes through untouched.
    pub fn find(&self, resource_type: &str) -> Option<&dyn ResourceTransformer> {
        self.transformers.get(resource_type).map(|t| t.as_ref())
    }

    pub fn count(&self) -> usize {
        self.transformers.len()
    }

    /// Registered resource types in sorted order.
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}

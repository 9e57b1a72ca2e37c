use crate::core::context::TransformContext;
use crate::core::error::MigrateError;
use crate::core::pipeline::stages::Stage;
use crate::core::registry::TransformerRegistry;
use crate::core::types::ErrorCategory;
use std::sync::Arc;

const BYTE_ORDER_MARK: &str = "\u{feff}";

/// Textual fixes applied before parsing: drops a byte-order mark, converts CRLF line endings
/// and then runs each registered transformer's `preprocess` hook in resource-type order.
pub struct PreprocessStage {
    registry: Arc<TransformerRegistry>,
}

impl PreprocessStage {
    pub fn new(registry: Arc<TransformerRegistry>) -> Self {
        PreprocessStage { registry }
    }
}

impl Stage for PreprocessStage {
    fn name(&self) -> &'static str {
        "preprocess"
    }

    fn handle(&self, ctx: &mut TransformContext) -> Result<(), MigrateError> {
        let text = std::str::from_utf8(&ctx.content).map_err(|err| {
            MigrateError::new(
                ErrorCategory::ParseError,
                format!("{} is not valid UTF-8: {}", ctx.filename, err),
            )
        })?;

        let mut text = text
            .strip_prefix(BYTE_ORDER_MARK)
            .unwrap_or(text)
            .replace("\r\n", "\n");
        for resource_type in self.registry.resource_types() {
            if let Some(transformer) = self.registry.find(resource_type) {
                text = transformer.preprocess(text);
            }
        }

        let changed = text.as_bytes() != ctx.content.as_slice();
        ctx.set_metadata("preprocessed", changed);
        if changed {
            tracing::debug!(file = %ctx.filename, "preprocess adjusted content");
            ctx.content = text.into_bytes();
        }
        Ok(())
    }
}

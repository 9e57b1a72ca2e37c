use crate::core::context::TransformContext;
use crate::core::error::MigrateError;
use crate::core::hcl::{self, BodyLayout};
use crate::core::pipeline::stages::Stage;
use crate::core::registry::TransformerRegistry;
use crate::core::transformer::BlockAction;
use crate::core::types::ErrorCategory;
use hcl_edit::structure::Structure;
use std::sync::Arc;

/// Dispatches every top-level resource block to the transformer registered for its type.
pub struct ResourceTransformStage {
    registry: Arc<TransformerRegistry>,
}

impl ResourceTransformStage {
    pub fn new(registry: Arc<TransformerRegistry>) -> Self {
        ResourceTransformStage { registry }
    }
}

impl Stage for ResourceTransformStage {
    fn name(&self) -> &'static str {
        "transform"
    }

    fn handle(&self, ctx: &mut TransformContext) -> Result<(), MigrateError> {
        let Some(body) = ctx.ast.take() else {
            return Err(MigrateError::new(
                ErrorCategory::MissingTree,
                "AST is missing - cannot transform resources",
            ));
        };

        let (layout, mut structures) = BodyLayout::split(body);
        let mut removals = Vec::new();
        let mut transformed = 0usize;
        let mut failure = None;

        for (index, structure) in structures.iter_mut().enumerate() {
            let Structure::Block(block) = structure else {
                continue;
            };
            let Some(resource_type) = hcl::resource_type(block).map(str::to_string) else {
                continue;
            };
            let Some(transformer) = self.registry.find(&resource_type) else {
                continue;
            };

            match transformer.transform_block(block, &mut ctx.diagnostics) {
                Ok(BlockAction::Keep) => transformed += 1,
                Ok(BlockAction::Remove) => removals.push(index),
                Err(err) => {
                    failure = Some(err.with_context("resource_type", resource_type));
                    break;
                }
            }
        }

        // Removals wait until the walk is over so indices stay valid while iterating.
        for index in removals.iter().rev() {
            structures.remove(*index);
        }
        ctx.ast = Some(layout.assemble(structures));

        if let Some(err) = failure {
            return Err(err);
        }

        ctx.set_metadata("transformed_blocks", transformed);
        ctx.set_metadata("removed_blocks", removals.len());
        if transformed + removals.len() > 0 {
            tracing::info!(
                file = %ctx.filename,
                transformed,
                removed = removals.len(),
                "rewrote resource blocks"
            );
        }
        Ok(())
    }
}

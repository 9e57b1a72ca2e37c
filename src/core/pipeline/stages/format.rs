use crate::core::context::TransformContext;
use crate::core::error::MigrateError;
use crate::core::hcl;
use crate::core::pipeline::stages::Stage;
use crate::core::types::ErrorCategory;

/// Renders the tree back into canonically formatted bytes.
pub struct FormatStage;

impl Stage for FormatStage {
    fn name(&self) -> &'static str {
        "format"
    }

    fn handle(&self, ctx: &mut TransformContext) -> Result<(), MigrateError> {
        let Some(body) = ctx.ast.as_ref() else {
            return Err(MigrateError::new(
                ErrorCategory::MissingTree,
                "AST is missing - cannot format",
            ));
        };
        ctx.content = hcl::format(&body.to_string()).into_bytes();
        Ok(())
    }
}

use crate::core::context::TransformContext;
use crate::core::diagnostics::{Diagnostic, SourcePos};
use crate::core::error::MigrateError;
use crate::core::pipeline::stages::Stage;
use crate::core::types::ErrorCategory;

/// Parses the content into an editable `hcl_edit` body.
pub struct ParseStage;

impl Stage for ParseStage {
    fn name(&self) -> &'static str {
        "parse"
    }

    fn handle(&self, ctx: &mut TransformContext) -> Result<(), MigrateError> {
        let text = String::from_utf8_lossy(&ctx.content);
        match hcl_edit::parser::parse_body(&text) {
            Ok(body) => {
                ctx.ast = Some(body);
                Ok(())
            }
            Err(err) => {
                let origin = SourcePos::initial(&ctx.filename);
                let location = err.location();
                let subject = SourcePos {
                    filename: origin.filename,
                    line: origin.line + location.line().saturating_sub(1),
                    column: origin.column + location.column().saturating_sub(1),
                    offset: origin.offset + location.offset(),
                };
                let diagnostic = Diagnostic::error(err.message().to_string())
                    .with_detail(format!("near `{}`", err.line().trim()))
                    .with_subject(subject);
                ctx.diagnostics.push(diagnostic);

                let first = ctx
                    .diagnostics
                    .first_error()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                Err(MigrateError::new(
                    ErrorCategory::ParseError,
                    format!("failed to parse HCL: {}", first),
                ))
            }
        }
    }
}

#![allow(clippy::result_large_err)] // Stages return MigrateError for structured diagnostics.

use crate::core::context::TransformContext;
use crate::core::error::MigrateError;

mod format;
mod parse;
mod preprocess;
mod transform;

pub use format::FormatStage;
pub use parse::ParseStage;
pub use preprocess::PreprocessStage;
pub use transform::ResourceTransformStage;

/// One step of the configuration pipeline. Stages mutate the context in place so diagnostics
/// recorded before a failure are still visible to the caller.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    fn handle(&self, ctx: &mut TransformContext) -> Result<(), MigrateError>;
}

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod hcl;
pub mod pipeline;
pub mod registry;
pub mod state;
pub mod transformer;
pub mod types;

pub use config::{ConfigLoader, ConfigValidator, MigrateConfig};
pub use context::TransformContext;
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourcePos};
pub use error::{DefaultErrorReporter, ErrorReporter, MigrateError};
pub use pipeline::{
    build_pipeline, build_pipeline_with_dry_run, build_state_pipeline, Pipeline, PipelineBuilder,
    PipelineOptions, TransformOutput,
};
pub use registry::TransformerRegistry;
pub use state::{StatePath, StateSummary};
pub use transformer::{BlockAction, ResourceTransformer, StateOutcome, StatePatch};
pub use types::*;

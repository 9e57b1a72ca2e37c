//! Pipeline driver for configuration text and state documents.

mod builder;
pub mod stages;

pub use builder::PipelineBuilder;

use crate::core::context::TransformContext;
use crate::core::diagnostics::Diagnostics;
use crate::core::error::MigrateError;
use crate::core::registry::TransformerRegistry;
use crate::core::state;
use crate::core::types::{ErrorCategory, PipelineKind};
use stages::Stage;
use std::sync::Arc;

/// Options shared by every unit a pipeline processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub dry_run: bool,
    pub kind: PipelineKind,
}

/// Result of running the text pipeline over one unit.
#[derive(Debug)]
pub struct TransformOutput {
    pub content: Vec<u8>,
    pub diagnostics: Diagnostics,
    pub changed: bool,
}

/// An ordered stage chain bound to a registry.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    registry: Arc<TransformerRegistry>,
    options: PipelineOptions,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}

/// Standard configuration pipeline: preprocess, parse, transform, format.
pub fn build_pipeline(registry: Arc<TransformerRegistry>) -> Pipeline {
    build_pipeline_with_options(registry, PipelineOptions::default())
}

pub fn build_pipeline_with_dry_run(registry: Arc<TransformerRegistry>, dry_run: bool) -> Pipeline {
    build_pipeline_with_options(
        registry,
        PipelineOptions {
            dry_run,
            kind: PipelineKind::Config,
        },
    )
}

/// State pipelines carry no stages; they run the state engine directly.
pub fn build_state_pipeline(registry: Arc<TransformerRegistry>) -> Pipeline {
    PipelineBuilder::new(registry)
        .with_options(PipelineOptions {
            dry_run: false,
            kind: PipelineKind::State,
        })
        .build()
}

fn build_pipeline_with_options(
    registry: Arc<TransformerRegistry>,
    options: PipelineOptions,
) -> Pipeline {
    PipelineBuilder::new(registry)
        .with_options(options)
        .with_preprocessing()
        .with_parsing()
        .with_resource_transformation()
        .with_formatting()
        .build()
}

impl Pipeline {
    pub fn kind(&self) -> PipelineKind {
        self.options.kind
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage over `content` and return the rewritten bytes.
    pub fn transform(&self, content: &[u8], name: &str) -> Result<Vec<u8>, MigrateError> {
        self.transform_unit(content, name).map(|output| output.content)
    }

    /// Like [`Pipeline::transform`] but also hands back the diagnostics collected on the way.
    pub fn transform_unit(
        &self,
        content: &[u8],
        name: &str,
    ) -> Result<TransformOutput, MigrateError> {
        if self.options.kind != PipelineKind::Config {
            return Err(MigrateError::new(
                ErrorCategory::ConfigurationError,
                "pipeline not configured for configuration transformation",
            )
            .with_context("file", name));
        }

        let mut ctx = TransformContext::new(content.to_vec(), name, self.options.dry_run);
        self.run_stages(&mut ctx)?;

        if let Some(diagnostic) = ctx.diagnostics.first_error() {
            return Err(MigrateError::new(
                ErrorCategory::TransformerError,
                format!("transformation reported errors: {}", diagnostic),
            )
            .with_context("file", name));
        }
        for warning in ctx.diagnostics.warnings() {
            tracing::debug!(file = %name, "{}", warning);
        }

        let changed = ctx.content.as_slice() != content;
        Ok(TransformOutput {
            content: ctx.content,
            diagnostics: ctx.diagnostics,
            changed,
        })
    }

    /// Rewrite a state document with the registry's state rules.
    pub fn transform_state(&self, content: &[u8], name: &str) -> Result<Vec<u8>, MigrateError> {
        if self.options.kind != PipelineKind::State {
            return Err(MigrateError::new(
                ErrorCategory::ConfigurationError,
                "pipeline not configured for state transformation",
            )
            .with_context("file", name));
        }

        let (output, summary) = state::transform_state(&self.registry, content)
            .map_err(|err| err.with_context("file", name))?;
        tracing::info!(
            file = %name,
            visited = summary.visited,
            merged = summary.merged,
            deleted = summary.deleted,
            "state transformation finished"
        );
        Ok(output)
    }

    fn run_stages(&self, ctx: &mut TransformContext) -> Result<(), MigrateError> {
        for stage in &self.stages {
            tracing::debug!(file = %ctx.filename, stage = stage.name(), "running stage");
            stage.handle(ctx).map_err(|err| {
                err.with_context("stage", stage.name())
                    .with_context("file", ctx.filename.as_str())
            })?;
        }
        Ok(())
    }
}

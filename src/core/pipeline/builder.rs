use crate::core::pipeline::stages::{
    FormatStage, ParseStage, PreprocessStage, ResourceTransformStage, Stage,
};
use crate::core::pipeline::{Pipeline, PipelineOptions};
use crate::core::registry::TransformerRegistry;
use std::sync::Arc;

/// Assembles a [`Pipeline`] one stage at a time. Stages run in the order they were added.
pub struct PipelineBuilder {
    registry: Arc<TransformerRegistry>,
    stages: Vec<Box<dyn Stage>>,
    options: PipelineOptions,
}

impl PipelineBuilder {
    pub fn new(registry: Arc<TransformerRegistry>) -> Self {
        PipelineBuilder {
            registry,
            stages: Vec::new(),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    pub fn with_preprocessing(self) -> Self {
        let stage = PreprocessStage::new(Arc::clone(&self.registry));
        self.with_stage(Box::new(stage))
    }

    pub fn with_parsing(self) -> Self {
        self.with_stage(Box::new(ParseStage))
    }

    pub fn with_resource_transformation(self) -> Self {
        let stage = ResourceTransformStage::new(Arc::clone(&self.registry));
        self.with_stage(Box::new(stage))
    }

    pub fn with_formatting(self) -> Self {
        self.with_stage(Box::new(FormatStage))
    }

    pub fn with_stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
            registry: self.registry,
            options: self.options,
        }
    }
}

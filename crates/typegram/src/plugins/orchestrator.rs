//! Plugin orchestrator for coordinating the diagram pipeline
//!
//! The orchestrator manages the flow of data through all plugins:
//! Loader → TypeUniverse → Renderer

use anyhow::{Context, Result};
use tracing::{debug, info, span, Level};

use crate::core::{LineSink, Loader, Renderer, TypeUniverse};
use crate::plugins::json::JsonLoader;
use crate::plugins::plantuml::DiagramEmitter;

/// Plugin orchestrator that coordinates the entire pipeline
pub struct Orchestrator {
    loader: Box<dyn Loader>,
    emitter: DiagramEmitter,
}

impl Orchestrator {
    /// Orchestrator reading JSON manifests and writing PlantUML
    pub fn new() -> Self {
        Self::with_loader(Box::new(JsonLoader::new()))
    }

    /// Orchestrator reading input with a custom loader
    pub fn with_loader(loader: Box<dyn Loader>) -> Self {
        Self {
            loader,
            emitter: DiagramEmitter::new(),
        }
    }

    /// Name of the active loader
    pub fn loader_name(&self) -> &'static str {
        self.loader.name()
    }

    /// Load and validate a universe from input text
    pub fn load(&self, input: &str) -> Result<TypeUniverse> {
        let load_span = span!(Level::DEBUG, "pipeline_load", loader = self.loader.name());
        let _enter = load_span.enter();

        let mut universe = TypeUniverse::new();
        self.loader
            .load(input, &mut universe)
            .with_context(|| format!("Failed to load {} input", self.loader.format()))?;
        universe.validate()?;
        debug!(
            modules = universe.modules().len(),
            types = universe.len(),
            "Universe loaded"
        );
        Ok(universe)
    }

    /// Process input through the complete pipeline
    pub fn process(&self, input: &str) -> Result<String> {
        let process_span = span!(Level::INFO, "process_diagram", input_len = input.len());
        let _enter = process_span.enter();

        info!("Starting diagram pipeline");
        let universe = self.load(input)?;

        let render_span = span!(Level::DEBUG, "pipeline_render");
        let _render_enter = render_span.enter();
        let output = self.emitter.render(&universe)?;
        debug!(output_len = output.len(), "Rendering completed");

        info!("Pipeline completed successfully");
        Ok(output)
    }

    /// Process input and stream the diagram lines into `sink`
    pub fn process_into(&self, input: &str, sink: &mut dyn LineSink) -> Result<()> {
        let universe = self.load(input)?;
        self.emitter.emit(&universe, sink)?;
        Ok(())
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

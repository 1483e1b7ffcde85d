//! Typegram - Turn loaded type definitions into PlantUML class diagrams
//!
//! A library that classifies types, computes a minimal set of inheritance and
//! interface-realization edges between them, and emits a deterministic
//! PlantUML class diagram.
//!
//! # Quick Start
//!
//! ```rust
//! use typegram::render;
//!
//! let manifest = r#"{
//!     "modules": [{ "name": "App", "types": [
//!         { "key": "i", "namespace": "N", "name": "I", "public": true,
//!           "interface": true, "abstract": true },
//!         { "key": "c", "namespace": "N", "name": "C", "public": true,
//!           "interfaces": ["i"] }
//!     ] }]
//! }"#;
//!
//! let diagram = render(manifest).unwrap();
//! assert!(diagram.contains("\"I\" <|.. \"C\""));
//! ```
//!
//! # Advanced Usage
//!
//! Build a universe by hand and drive the components directly:
//!
//! ```rust
//! use typegram::prelude::*;
//!
//! let mut universe = TypeUniverse::new();
//! let module = universe.add_module("App");
//! let i = universe.add_exported(module, TypeDescriptor::interface("N", "I")).unwrap();
//! let c = universe
//!     .add_exported(module, TypeDescriptor::class("N", "C").with_interfaces([i]))
//!     .unwrap();
//!
//! assert_eq!(TypeClassifier::new(&universe).classify(c).unwrap(), Category::Object);
//! assert_eq!(RelationFilter::new(&universe).relations(c).unwrap().len(), 1);
//!
//! let diagram = DiagramEmitter::new().render(&universe).unwrap();
//! assert!(diagram.contains("namespace N {"));
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Category, Edge, EdgeKind, LineSink, Loader, Renderer, TypeDescriptor, TypeFlags, TypeId,
        TypeUniverse, TypegramError, Variance, WriterSink,
    };
    pub use crate::plugins::json::JsonLoader;
    pub use crate::plugins::plantuml::{
        AdmissionFilter, DiagramEmitter, NameFormatter, RelationFilter, Stereotype,
        TypeClassifier,
    };
}

/// Render a JSON type manifest as a PlantUML class diagram
///
/// # Example
/// ```rust
/// let diagram = typegram::render(r#"{ "modules": [] }"#).unwrap();
/// assert!(diagram.starts_with("@startuml"));
/// assert!(diagram.trim_end().ends_with("@enduml"));
/// ```
pub fn render(input: &str) -> anyhow::Result<String> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::new().process(input)
}

/// Load a JSON type manifest into a validated universe without rendering
///
/// # Example
/// ```rust
/// let universe = typegram::load(r#"{ "references": [
///     { "key": "a", "namespace": "N", "name": "A" }
/// ] }"#).unwrap();
/// assert_eq!(universe.len(), 1);
/// ```
pub fn load(input: &str) -> anyhow::Result<TypeUniverse> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::new().load(input)
}

/// Render an already assembled universe as a PlantUML class diagram
pub fn render_universe(universe: &TypeUniverse) -> anyhow::Result<String> {
    use crate::core::Renderer as _;
    use crate::plugins::plantuml::DiagramEmitter;

    universe.validate()?;
    Ok(DiagramEmitter::new().render(universe)?)
}

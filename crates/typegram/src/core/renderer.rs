//! Core renderer trait for diagram output
//!
//! This trait defines the interface for rendering a type universe into a
//! diagram document.

use super::error::Result;
use super::universe::TypeUniverse;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use typegram::core::{Renderer, TypeUniverse};
/// use typegram::plugins::plantuml::DiagramEmitter;
///
/// let universe = TypeUniverse::new();
/// let output = DiagramEmitter::new().render(&universe).unwrap();
/// assert!(output.starts_with("@startuml"));
/// ```
pub trait Renderer: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the universe into the output format
    fn render(&self, universe: &TypeUniverse) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}

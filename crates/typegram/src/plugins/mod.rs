//! Plugin implementations
//!
//! Loaders turn external type descriptions into a universe; renderers turn a
//! universe into a diagram. The orchestrator wires the two together.

pub mod json;
pub mod orchestrator;
pub mod plantuml;

pub use json::*;
pub use orchestrator::*;
pub use plantuml::*;

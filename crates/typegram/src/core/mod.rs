//! Core abstractions for type analysis
//!
//! This module defines the data model shared by every stage of the pipeline
//! (type descriptors, the universe that owns them, categories and edges) and
//! the traits that loaders, renderers and sinks implement.

mod error;
mod loader;
pub mod logging;
mod renderer;
mod sink;
mod types;
mod universe;

pub use error::*;
pub use loader::*;
pub use logging::*;
pub use renderer::*;
pub use sink::*;
pub use types::*;
pub use universe::*;

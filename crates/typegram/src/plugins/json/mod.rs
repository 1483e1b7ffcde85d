//! JSON manifest plugin
//!
//! Reads type universes exported by an external discovery tool as JSON.

mod loader;
mod manifest;

pub use loader::JsonLoader;
pub use manifest::{Manifest, ModuleEntry, TypeEntry};

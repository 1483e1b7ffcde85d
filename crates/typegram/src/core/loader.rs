//! Core loader trait for type universes
//!
//! A loader turns some external description of loaded types into a
//! [`TypeUniverse`]. Discovery itself (reading assemblies, walking crates)
//! happens outside the library; loaders only translate.

use super::error::Result;
use super::universe::TypeUniverse;

/// Core trait for type loaders
///
/// # Example
/// ```
/// use typegram::core::{Loader, TypeUniverse};
/// use typegram::plugins::json::JsonLoader;
///
/// let loader = JsonLoader::new();
/// let mut universe = TypeUniverse::new();
/// loader.load(r#"{ "modules": [] }"#, &mut universe).unwrap();
/// assert!(universe.is_empty());
/// ```
pub trait Loader: Send + Sync {
    /// Load the described types into `universe`
    fn load(&self, input: &str, universe: &mut TypeUniverse) -> Result<()>;

    /// Get the name of this loader
    fn name(&self) -> &'static str;

    /// Get the input format this loader understands
    fn format(&self) -> &'static str;
}

//! PlantUML class diagram plugin
//!
//! Classifies types, names them, reduces their relations to a minimal edge
//! set and emits the result as PlantUML text.

mod classifier;
mod emitter;
mod filter;
mod names;
mod relations;

pub use classifier::{Stereotype, TypeClassifier};
pub use emitter::{doc_link, DiagramEmitter, DOC_BASE_URL};
pub use filter::AdmissionFilter;
pub use names::NameFormatter;
pub use relations::{RelationFilter, IGNORED_INTERFACES};

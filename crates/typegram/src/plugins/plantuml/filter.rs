//! Admission filters deciding which types and namespaces reach the diagram

use tracing::trace;

use crate::core::{well_known, TypeId, TypeUniverse};

/// Namespace prefixes whose types are runtime plumbing
const EXCLUDED_NAMESPACE_PREFIXES: &[&str] = &[
    "Internal",
    "System.Runtime.Intrinsics",
    "System.Reflection.",
    "System.Runtime.InteropServices.ComTypes",
    "System.Runtime.InteropServices.WindowsRuntime",
    "System.Security",
];

/// Namespaces excluded by exact match
const EXCLUDED_NAMESPACES: &[&str] = &["System.Collections"];

/// Root types every other type hangs off; drawing them adds only noise
const ROOT_TYPES: &[&str] = &[
    well_known::OBJECT,
    well_known::VALUE_TYPE,
    well_known::ENUM,
    well_known::VOID,
];

/// Types whose whole hierarchy is left out of the diagram
const EXCLUDED_HIERARCHIES: &[&str] = &[
    well_known::ATTRIBUTE,
    well_known::EXCEPTION,
    well_known::DELEGATE,
];

/// Decides which types and namespaces are drawn
#[derive(Debug, Clone, Copy)]
pub struct AdmissionFilter<'u> {
    universe: &'u TypeUniverse,
}

impl<'u> AdmissionFilter<'u> {
    pub fn new(universe: &'u TypeUniverse) -> Self {
        Self { universe }
    }

    /// Whether a (possibly absent) type is drawn at all
    pub fn admits_type(&self, id: Option<TypeId>) -> bool {
        let Some(id) = id else {
            return false;
        };
        let Ok(descriptor) = self.universe.get(id) else {
            return false;
        };
        let flags = &descriptor.flags;

        if flags.primitive || flags.obsolete || flags.nested {
            trace!(type_name = descriptor.display_name(), "Rejected by flags");
            return false;
        }
        let is_root = ROOT_TYPES
            .iter()
            .any(|root| self.universe.find(root) == Some(id));
        if is_root {
            return false;
        }
        let excluded = EXCLUDED_HIERARCHIES
            .iter()
            .any(|root| self.universe.is_assignable_to_named(id, root));
        if excluded {
            trace!(type_name = descriptor.display_name(), "Rejected by hierarchy");
        }
        !excluded
    }

    /// Whether types of `namespace` are drawn
    pub fn admits_namespace(namespace: Option<&str>) -> bool {
        let Some(namespace) = namespace else {
            return false;
        };
        !namespace.is_empty()
            && !EXCLUDED_NAMESPACE_PREFIXES
                .iter()
                .any(|prefix| namespace.starts_with(prefix))
            && !EXCLUDED_NAMESPACES.contains(&namespace)
    }
}

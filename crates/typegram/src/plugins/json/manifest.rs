//! Serde model of a JSON type manifest
//!
//! ```json
//! {
//!   "modules": [
//!     { "name": "App", "types": [
//!       { "key": "app.c", "namespace": "App", "name": "C", "interfaces": ["app.i"] }
//!     ] }
//!   ],
//!   "references": [
//!     { "key": "app.i", "namespace": "App", "name": "I", "interface": true, "public": true }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{TypeFlags, Variance};

/// Root of a manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    /// Types referenced by exported types but not exported themselves
    #[serde(default)]
    pub references: Vec<TypeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// One type descriptor; references to other types use their `key`
///
/// Unknown keys are rejected so a misspelled flag cannot silently change
/// what a type is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    pub key: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub interface: bool,
    #[serde(default, rename = "enum")]
    pub is_enum: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub sealed: bool,
    #[serde(default)]
    pub value_type: bool,
    #[serde(default)]
    pub nested: bool,
    #[serde(default)]
    pub pointer: bool,
    #[serde(default)]
    pub generic: bool,
    #[serde(default)]
    pub generic_definition: bool,
    #[serde(default)]
    pub generic_parameter: bool,
    #[serde(default)]
    pub by_ref_like: bool,
    #[serde(default)]
    pub primitive: bool,
    /// Types are visible unless the manifest says otherwise
    #[serde(default = "visible")]
    pub public: bool,
    #[serde(default)]
    pub obsolete: bool,

    #[serde(default)]
    pub variance: Variance,
    #[serde(default)]
    pub generic_arguments: Vec<String>,
    /// Open generic form of a closed instantiation
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub declaring_type: Option<String>,
    #[serde(default)]
    pub element_type: Option<String>,
}

fn visible() -> bool {
    true
}

impl TypeEntry {
    pub fn flags(&self) -> TypeFlags {
        TypeFlags {
            interface: self.interface,
            is_enum: self.is_enum,
            is_abstract: self.is_abstract,
            sealed: self.sealed,
            value_type: self.value_type,
            nested: self.nested,
            pointer: self.pointer,
            generic: self.generic,
            generic_definition: self.generic_definition,
            generic_parameter: self.generic_parameter,
            by_ref_like: self.by_ref_like,
            primitive: self.primitive,
            public: self.public,
            obsolete: self.obsolete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_defaults_to_public() {
        let entry: TypeEntry =
            serde_json::from_str(r#"{ "key": "a", "name": "A", "interface": true }"#).unwrap();
        let flags = entry.flags();
        assert!(flags.public);
        assert!(flags.interface);
        assert!(!flags.is_abstract);
    }

    #[test]
    fn test_entry_can_be_private() {
        let entry: TypeEntry =
            serde_json::from_str(r#"{ "key": "a", "name": "A", "public": false }"#).unwrap();
        assert!(!entry.flags().public);
    }

    #[test]
    fn test_misspelled_flag_is_rejected() {
        let result = serde_json::from_str::<TypeEntry>(r#"{ "key": "a", "name": "A", "interfce": true }"#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("interfce"));
    }
}

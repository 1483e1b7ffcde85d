//! JSON manifest loader
//!
//! Loading is two-pass: every key is assigned a [`TypeId`] first, so entries
//! may refer to each other in any order (including `Foo : IEquatable<Foo>`
//! style cycles); references are resolved in the second pass.

use std::collections::HashMap;

use tracing::{debug, info, span, Level};

use super::manifest::{Manifest, TypeEntry};
use crate::core::{Loader, Result, TypeDescriptor, TypeId, TypeUniverse, TypegramError};

/// Loads a [`Manifest`] into a [`TypeUniverse`]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl JsonLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load an already deserialized manifest
    pub fn load_manifest(&self, manifest: &Manifest, universe: &mut TypeUniverse) -> Result<()> {
        let base = universe.len();
        let entries: Vec<(Option<usize>, &TypeEntry)> = manifest
            .modules
            .iter()
            .enumerate()
            .flat_map(|(module, entry)| entry.types.iter().map(move |ty| (Some(module), ty)))
            .chain(manifest.references.iter().map(|ty| (None, ty)))
            .collect();

        let stage_span = span!(Level::DEBUG, "assign_ids", entries = entries.len());
        let stage_enter = stage_span.enter();
        let mut keys: HashMap<&str, TypeId> = HashMap::with_capacity(entries.len());
        for (offset, (_, entry)) in entries.iter().enumerate() {
            let id = TypeId::new(base + offset);
            if keys.insert(entry.key.as_str(), id).is_some() {
                return Err(TypegramError::load_error(format!(
                    "duplicate type key `{}`",
                    entry.key
                )));
            }
        }
        drop(stage_enter);

        let resolve_span = span!(Level::DEBUG, "resolve_references");
        let _resolve_enter = resolve_span.enter();
        let module_ids: Vec<usize> = manifest
            .modules
            .iter()
            .map(|module| universe.add_module(module.name.clone()))
            .collect();

        for (module, entry) in entries {
            let descriptor = Self::descriptor(entry, &keys)?;
            let id = universe.add(descriptor);
            if let Some(module) = module {
                universe.export(module_ids[module], id)?;
            }
        }
        debug!(
            modules = module_ids.len(),
            types = universe.len() - base,
            "References resolved"
        );
        Ok(())
    }

    fn descriptor(entry: &TypeEntry, keys: &HashMap<&str, TypeId>) -> Result<TypeDescriptor> {
        let resolve = |key: &String| -> Result<TypeId> {
            keys.get(key.as_str()).copied().ok_or_else(|| {
                TypegramError::invalid_input(format!(
                    "type `{}` refers to unknown type `{}`",
                    entry.key, key
                ))
            })
        };
        let resolve_optional = |key: &Option<String>| key.as_ref().map(&resolve).transpose();

        let flags = entry.flags();
        let anonymous = flags.generic_parameter || flags.pointer;
        let full_name = match (&entry.full_name, &entry.namespace) {
            (Some(full_name), _) => Some(full_name.clone()),
            _ if anonymous => None,
            (None, Some(namespace)) if !namespace.is_empty() => {
                Some(format!("{}.{}", namespace, entry.name))
            }
            (None, _) => Some(entry.name.clone()),
        };

        Ok(TypeDescriptor {
            namespace: entry.namespace.clone().filter(|namespace| !namespace.is_empty()),
            name: entry.name.clone(),
            full_name,
            flags,
            variance: entry.variance,
            generic_arguments: entry.generic_arguments.iter().map(&resolve).collect::<Result<_>>()?,
            generic_definition: resolve_optional(&entry.definition)?,
            base_type: resolve_optional(&entry.base_type)?,
            interfaces: entry.interfaces.iter().map(&resolve).collect::<Result<_>>()?,
            declaring_type: resolve_optional(&entry.declaring_type)?,
            element_type: resolve_optional(&entry.element_type)?,
        })
    }
}

impl Loader for JsonLoader {
    fn load(&self, input: &str, universe: &mut TypeUniverse) -> Result<()> {
        let load_span = span!(Level::INFO, "load_json", input_len = input.len());
        let _enter = load_span.enter();

        let manifest: Manifest = serde_json::from_str(input)?;
        self.load_manifest(&manifest, universe)?;
        universe.validate()?;

        info!(
            modules = universe.modules().len(),
            types = universe.len(),
            "Manifest loaded"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn format(&self) -> &'static str {
        "json"
    }
}

//! The universe of loaded types
//!
//! A [`TypeUniverse`] is an arena of [`TypeDescriptor`]s plus the ordered list
//! of modules that export them. Loaders fill it in; analysis reads it.

use std::collections::{HashMap, HashSet, VecDeque};

use super::error::{Result, TypegramError};
use super::types::{TypeDescriptor, TypeId, Variance};

/// Full names of runtime types the analysis refers to
pub mod well_known {
    pub const OBJECT: &str = "System.Object";
    pub const VALUE_TYPE: &str = "System.ValueType";
    pub const ENUM: &str = "System.Enum";
    pub const VOID: &str = "System.Void";
    pub const ATTRIBUTE: &str = "System.Attribute";
    pub const EXCEPTION: &str = "System.Exception";
    pub const DELEGATE: &str = "System.Delegate";

    pub const DISPOSABLE: &str = "System.IDisposable";
    pub const ASYNC_DISPOSABLE: &str = "System.IAsyncDisposable";
    pub const CLONEABLE: &str = "System.ICloneable";
    pub const COMPARABLE: &str = "System.IComparable";
    pub const GENERIC_COMPARABLE: &str = "System.IComparable`1";
    pub const EQUATABLE: &str = "System.IEquatable`1";
    pub const ENUMERABLE: &str = "System.Collections.IEnumerable";
    pub const GENERIC_ENUMERABLE: &str = "System.Collections.Generic.IEnumerable`1";
}

/// Bound on nested variant conversions (`IProducer<IProducer<...>>`)
const MAX_VARIANCE_DEPTH: usize = 16;

/// A group of exported types sharing an origin (an assembly, a crate, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub types: Vec<TypeId>,
}

/// Arena of type descriptors, grouped by originating module
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    types: Vec<TypeDescriptor>,
    modules: Vec<Module>,
    by_full_name: HashMap<String, TypeId>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor that no module exports (instantiations, parameters, ...)
    pub fn add(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = TypeId::new(self.types.len());
        let indexable = !descriptor.flags.generic_parameter
            && !descriptor.flags.pointer
            && !descriptor.is_generic_instantiation();
        if indexable {
            if let Some(full_name) = &descriptor.full_name {
                self.by_full_name.entry(full_name.clone()).or_insert(id);
            }
        }
        self.types.push(descriptor);
        id
    }

    /// Add a module and return its index
    pub fn add_module(&mut self, name: impl Into<String>) -> usize {
        self.modules.push(Module {
            name: name.into(),
            types: Vec::new(),
        });
        self.modules.len() - 1
    }

    /// Add a descriptor exported by `module`
    pub fn add_exported(&mut self, module: usize, descriptor: TypeDescriptor) -> Result<TypeId> {
        if module >= self.modules.len() {
            return Err(TypegramError::invalid_input(format!(
                "module {} does not exist",
                module
            )));
        }
        let id = self.add(descriptor);
        self.modules[module].types.push(id);
        Ok(id)
    }

    /// Record an already-added descriptor as exported by `module`
    pub fn export(&mut self, module: usize, id: TypeId) -> Result<()> {
        self.get(id)?;
        let entry = self.modules.get_mut(module).ok_or_else(|| {
            TypegramError::invalid_input(format!("module {} does not exist", module))
        })?;
        entry.types.push(id);
        Ok(())
    }

    pub fn get(&self, id: TypeId) -> Result<&TypeDescriptor> {
        self.types
            .get(id.index())
            .ok_or_else(|| TypegramError::invalid_input(format!("type {} is not in the universe", id)))
    }

    /// Mutable access while the universe is being assembled
    pub fn get_mut(&mut self, id: TypeId) -> Result<&mut TypeDescriptor> {
        self.types
            .get_mut(id.index())
            .ok_or_else(|| TypegramError::invalid_input(format!("type {} is not in the universe", id)))
    }

    /// Look up a non-instantiated type by full name
    pub fn find(&self, full_name: &str) -> Option<TypeId> {
        self.by_full_name.get(full_name).copied()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Exported types of all modules in module order, each once
    pub fn exported_types(&self) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        self.modules
            .iter()
            .flat_map(|module| module.types.iter().copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, descriptor)| (TypeId::new(index), descriptor))
    }

    /// Check every descriptor and every reference between descriptors
    pub fn validate(&self) -> Result<()> {
        for (id, descriptor) in self.iter() {
            descriptor.validate()?;
            let references = descriptor
                .generic_arguments
                .iter()
                .chain(descriptor.interfaces.iter())
                .chain(descriptor.generic_definition.iter())
                .chain(descriptor.base_type.iter())
                .chain(descriptor.declaring_type.iter())
                .chain(descriptor.element_type.iter());
            for reference in references {
                if reference.index() >= self.types.len() {
                    return Err(TypegramError::invalid_input(format!(
                        "type {} (`{}`) refers to missing type {}",
                        id,
                        descriptor.display_name(),
                        reference
                    )));
                }
            }
            for interface in &descriptor.interfaces {
                if !self.types[interface.index()].flags.interface {
                    return Err(TypegramError::malformed(
                        descriptor.display_name(),
                        format!(
                            "implements `{}`, which is not an interface",
                            self.types[interface.index()].display_name()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Strict supertypes of `id` reachable through base types and interfaces,
    /// breadth-first
    fn supertypes(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        let mut queue = VecDeque::from([id]);
        let mut visited = HashSet::from([id]);
        std::iter::from_fn(move || {
            while let Some(current) = queue.pop_front() {
                let Ok(descriptor) = self.get(current) else {
                    continue;
                };
                for parent in descriptor.base_type.iter().chain(descriptor.interfaces.iter()) {
                    if visited.insert(*parent) {
                        queue.push_back(*parent);
                    }
                }
                if current != id {
                    return Some(current);
                }
            }
            None
        })
    }

    /// Whether a value of `from` can be used where `to` is expected
    ///
    /// Follows base types and interfaces, and converts instantiations of a
    /// variant generic interface or delegate along its `out` / `in`
    /// parameters (reference-type arguments only).
    pub fn is_assignable_to(&self, from: TypeId, to: TypeId) -> bool {
        self.assignable(from, to, 0)
    }

    fn assignable(&self, from: TypeId, to: TypeId, depth: usize) -> bool {
        if from == to {
            return true;
        }
        if depth > MAX_VARIANCE_DEPTH {
            return false;
        }
        std::iter::once(from)
            .chain(self.supertypes(from))
            .any(|candidate| candidate == to || self.variant_conversion(candidate, to, depth))
    }

    /// `from` and `to` instantiate the same variant definition and each
    /// argument converts as its parameter's variance allows
    fn variant_conversion(&self, from: TypeId, to: TypeId, depth: usize) -> bool {
        let (Ok(source), Ok(target)) = (self.get(from), self.get(to)) else {
            return false;
        };
        if !source.is_generic_instantiation()
            || source.generic_definition != target.generic_definition
            || source.generic_arguments.len() != target.generic_arguments.len()
        {
            return false;
        }
        let Some(definition_id) = source.generic_definition else {
            return false;
        };
        let Ok(definition) = self.get(definition_id) else {
            return false;
        };
        let delegate = self.find(well_known::DELEGATE);
        let variant_kind = definition.flags.interface
            || self.supertypes(definition_id).any(|parent| Some(parent) == delegate);
        if !variant_kind || definition.generic_arguments.len() != source.generic_arguments.len() {
            return false;
        }

        let is_reference = |id: TypeId| self.get(id).is_ok_and(|d| !d.flags.value_type);
        definition
            .generic_arguments
            .iter()
            .zip(source.generic_arguments.iter().zip(&target.generic_arguments))
            .all(|(&parameter, (&argument, &expected))| {
                if argument == expected {
                    return true;
                }
                let variance = self
                    .get(parameter)
                    .map(|parameter| parameter.variance)
                    .unwrap_or(Variance::None);
                let convertible = is_reference(argument) && is_reference(expected);
                match variance {
                    Variance::None => false,
                    Variance::Covariant => {
                        convertible && self.assignable(argument, expected, depth + 1)
                    }
                    Variance::Contravariant => {
                        convertible && self.assignable(expected, argument, depth + 1)
                    }
                }
            })
    }

    /// Whether `id` is, or derives from, the type named `full_name`
    pub fn is_assignable_to_named(&self, id: TypeId, full_name: &str) -> bool {
        self.find(full_name)
            .is_some_and(|target| self.is_assignable_to(id, target))
    }

    /// Whether `id` implements the instantiation of the generic definition
    /// `definition_name` over exactly `argument`
    pub fn implements_generic_over(&self, id: TypeId, definition_name: &str, argument: TypeId) -> bool {
        let Some(definition) = self.find(definition_name) else {
            return false;
        };
        std::iter::once(id).chain(self.supertypes(id)).any(|candidate| {
            self.get(candidate).is_ok_and(|descriptor| {
                descriptor.generic_definition == Some(definition)
                    && descriptor.generic_arguments.as_slice() == [argument]
            })
        })
    }

    /// Open form of `id`: the generic definition of a closed instantiation,
    /// otherwise `id` itself
    pub fn open_form(&self, id: TypeId) -> Result<TypeId> {
        let descriptor = self.get(id)?;
        if descriptor.is_generic_instantiation() {
            descriptor.generic_definition.ok_or_else(|| {
                TypegramError::malformed(
                    descriptor.display_name(),
                    "closed generic instantiation has no generic definition",
                )
            })
        } else {
            Ok(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Variance;

    fn chain() -> (TypeUniverse, TypeId, TypeId, TypeId) {
        let mut universe = TypeUniverse::new();
        let i = universe.add(TypeDescriptor::interface("N", "I"));
        let j = universe.add(TypeDescriptor::interface("N", "J").with_interfaces([i]));
        let k = universe.add(TypeDescriptor::interface("N", "K").with_interfaces([j]));
        (universe, i, j, k)
    }

    #[test]
    fn test_assignability_follows_interfaces_transitively() {
        let (universe, i, j, k) = chain();
        assert!(universe.is_assignable_to(k, i));
        assert!(universe.is_assignable_to(k, j));
        assert!(universe.is_assignable_to(j, j));
        assert!(!universe.is_assignable_to(i, k));
    }

    #[test]
    fn test_assignability_follows_base_types() {
        let mut universe = TypeUniverse::new();
        let object = universe.add(TypeDescriptor::class("System", "Object"));
        let attribute = universe.add(TypeDescriptor::class("System", "Attribute").with_base(object));
        let custom = universe.add(TypeDescriptor::class("N", "MyAttribute").with_base(attribute));

        assert!(universe.is_assignable_to_named(custom, well_known::ATTRIBUTE));
        assert!(universe.is_assignable_to_named(custom, well_known::OBJECT));
        assert!(!universe.is_assignable_to_named(object, well_known::ATTRIBUTE));
        assert!(!universe.is_assignable_to_named(custom, well_known::EXCEPTION));
    }

    #[test]
    fn test_assignability_survives_relation_cycles() {
        let mut universe = TypeUniverse::new();
        let a = universe.add(TypeDescriptor::interface("N", "A"));
        let b = universe.add(TypeDescriptor::interface("N", "B").with_interfaces([a]));
        universe.get_mut(a).unwrap().interfaces.push(b);
        let c = universe.add(TypeDescriptor::interface("N", "C"));

        assert!(universe.is_assignable_to(a, b));
        assert!(!universe.is_assignable_to(a, c));
    }

    #[test]
    fn test_implements_generic_over_self() {
        let mut universe = TypeUniverse::new();
        let t = universe.add(TypeDescriptor::generic_parameter("T", Variance::None));
        let equatable = universe.add(
            TypeDescriptor::interface("System", "IEquatable`1").with_generic_parameters([t]),
        );
        let point = universe.add(TypeDescriptor::structure("N", "Point"));
        let other = universe.add(TypeDescriptor::structure("N", "Other"));
        let closed = universe.add(
            TypeDescriptor::interface("System", "IEquatable`1").instantiating(equatable, [point]),
        );
        universe.get_mut(point).unwrap().interfaces.push(closed);
        universe.get_mut(other).unwrap().interfaces.push(closed);

        assert!(universe.implements_generic_over(point, well_known::EQUATABLE, point));
        assert!(!universe.implements_generic_over(other, well_known::EQUATABLE, other));
        assert_eq!(universe.find(well_known::EQUATABLE), Some(equatable));
    }

    #[test]
    fn test_open_form() {
        let mut universe = TypeUniverse::new();
        let t = universe.add(TypeDescriptor::generic_parameter("T", Variance::None));
        let int = universe.add(TypeDescriptor::structure("System", "Int32"));
        let open = universe.add(TypeDescriptor::class("N", "Base`1").with_generic_parameters([t]));
        let closed = universe.add(TypeDescriptor::class("N", "Base`1").instantiating(open, [int]));

        assert_eq!(universe.open_form(closed).unwrap(), open);
        assert_eq!(universe.open_form(open).unwrap(), open);
        assert_eq!(universe.open_form(int).unwrap(), int);
    }

    struct Variant {
        universe: TypeUniverse,
        base: TypeId,
        derived: TypeId,
        definition: TypeId,
    }

    fn variant(variance: Variance) -> Variant {
        let mut universe = TypeUniverse::new();
        let base = universe.add(TypeDescriptor::class("N", "Base"));
        let derived = universe.add(TypeDescriptor::class("N", "Derived").with_base(base));
        let t = universe.add(TypeDescriptor::generic_parameter("T", variance));
        let definition = universe.add(
            TypeDescriptor::interface("N", "IProducer`1").with_generic_parameters([t]),
        );
        Variant {
            universe,
            base,
            derived,
            definition,
        }
    }

    impl Variant {
        fn of(&mut self, argument: TypeId) -> TypeId {
            self.universe.add(
                TypeDescriptor::interface("N", "IProducer`1").instantiating(self.definition, [argument]),
            )
        }
    }

    #[test]
    fn test_covariant_instantiations_convert_upwards() {
        let mut v = variant(Variance::Covariant);
        let (of_base, of_derived) = (v.of(v.base), v.of(v.derived));
        assert!(v.universe.is_assignable_to(of_derived, of_base));
        assert!(!v.universe.is_assignable_to(of_base, of_derived));
    }

    #[test]
    fn test_contravariant_instantiations_convert_downwards() {
        let mut v = variant(Variance::Contravariant);
        let (of_base, of_derived) = (v.of(v.base), v.of(v.derived));
        assert!(v.universe.is_assignable_to(of_base, of_derived));
        assert!(!v.universe.is_assignable_to(of_derived, of_base));
    }

    #[test]
    fn test_invariant_instantiations_do_not_convert() {
        let mut v = variant(Variance::None);
        let (of_base, of_derived) = (v.of(v.base), v.of(v.derived));
        assert!(!v.universe.is_assignable_to(of_derived, of_base));
        assert!(!v.universe.is_assignable_to(of_base, of_derived));
    }

    #[test]
    fn test_value_type_arguments_do_not_convert() {
        let mut v = variant(Variance::Covariant);
        let value = v.universe.add(TypeDescriptor::structure("N", "Amount"));
        let object = v.universe.add(TypeDescriptor::class("System", "Object"));
        v.universe.get_mut(value).unwrap().base_type = Some(object);
        let (of_value, of_object) = (v.of(value), v.of(object));
        assert!(v.universe.is_assignable_to(value, object));
        assert!(!v.universe.is_assignable_to(of_value, of_object));
    }

    #[test]
    fn test_variance_applies_through_declared_interfaces() {
        let mut v = variant(Variance::Covariant);
        let (of_base, of_derived) = (v.of(v.base), v.of(v.derived));
        let foo = v
            .universe
            .add(TypeDescriptor::interface("N", "IFoo").with_interfaces([of_derived]));
        assert!(v.universe.is_assignable_to(foo, of_base));
    }

    #[test]
    fn test_validate_rejects_class_in_interface_list() {
        let mut universe = TypeUniverse::new();
        let not_interface = universe.add(TypeDescriptor::class("N", "Plain"));
        universe.add(TypeDescriptor::class("N", "C").with_interfaces([not_interface]));
        let error = universe.validate().unwrap_err();
        assert!(matches!(error, TypegramError::MalformedDescriptor { .. }));
        assert!(error.to_string().contains("not an interface"));
    }

    #[test]
    fn test_validate_reports_dangling_reference() {
        let mut universe = TypeUniverse::new();
        universe.add(TypeDescriptor::class("N", "C").with_base(TypeId::new(42)));
        let error = universe.validate().unwrap_err();
        assert!(matches!(error, TypegramError::InvalidInput { .. }));
        assert!(error.to_string().contains("#42"));
    }

    #[test]
    fn test_exported_types_keep_module_order() {
        let mut universe = TypeUniverse::new();
        let first = universe.add_module("First");
        let second = universe.add_module("Second");
        let b = universe.add_exported(second, TypeDescriptor::class("N", "B")).unwrap();
        let a = universe.add_exported(first, TypeDescriptor::class("N", "A")).unwrap();
        universe.export(second, a).unwrap();

        assert_eq!(universe.exported_types(), vec![a, b]);
        assert!(universe.add_exported(7, TypeDescriptor::class("N", "X")).is_err());
    }
}

//! Core type definitions for type analysis
//!
//! This module contains the fundamental types used throughout typegram:
//! type descriptors supplied by a loader, the derived diagram category of a
//! type, and the relation edges drawn between types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Result, TypegramError};

/// Handle of a descriptor inside a [`TypeUniverse`](super::TypeUniverse)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(usize);

impl TypeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Variance of a generic parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    #[default]
    None,
    /// `out T`
    Covariant,
    /// `in T`
    Contravariant,
}

impl Variance {
    /// Prefix written before the parameter name
    pub fn marker(self) -> &'static str {
        match self {
            Variance::None => "",
            Variance::Covariant => "out ",
            Variance::Contravariant => "in ",
        }
    }
}

/// Structural flags of a type, as reported by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TypeFlags {
    pub interface: bool,
    pub is_enum: bool,
    pub is_abstract: bool,
    pub sealed: bool,
    pub value_type: bool,
    pub nested: bool,
    pub pointer: bool,
    pub generic: bool,
    pub generic_definition: bool,
    pub generic_parameter: bool,
    /// Stack-only type that cannot be boxed or used as a generic argument
    pub by_ref_like: bool,
    pub primitive: bool,
    pub public: bool,
    pub obsolete: bool,
}

/// A loaded type definition
///
/// Descriptors are immutable once a run starts. References to other types
/// are [`TypeId`]s into the owning universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub namespace: Option<String>,
    /// Simple name, including any arity suffix (``List`1``)
    pub name: String,
    pub full_name: Option<String>,
    pub flags: TypeFlags,
    pub variance: Variance,
    /// Parameters of a definition, or arguments of a closed instantiation
    pub generic_arguments: Vec<TypeId>,
    /// Open form of a closed instantiation
    pub generic_definition: Option<TypeId>,
    pub base_type: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub declaring_type: Option<TypeId>,
    /// Pointee of a pointer type
    pub element_type: Option<TypeId>,
}

impl TypeDescriptor {
    /// Create a public, non-generic class `namespace.name`
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let name = name.into();
        let full_name = if namespace.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", namespace, name)
        };
        Self {
            namespace: (!namespace.is_empty()).then_some(namespace),
            name,
            full_name: Some(full_name),
            flags: TypeFlags {
                public: true,
                ..TypeFlags::default()
            },
            variance: Variance::None,
            generic_arguments: Vec::new(),
            generic_definition: None,
            base_type: None,
            interfaces: Vec::new(),
            declaring_type: None,
            element_type: None,
        }
    }

    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name)
    }

    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut descriptor = Self::new(namespace, name);
        descriptor.flags.interface = true;
        descriptor.flags.is_abstract = true;
        descriptor
    }

    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut descriptor = Self::new(namespace, name);
        descriptor.flags.is_enum = true;
        descriptor.flags.value_type = true;
        descriptor.flags.sealed = true;
        descriptor
    }

    pub fn structure(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut descriptor = Self::new(namespace, name);
        descriptor.flags.value_type = true;
        descriptor.flags.sealed = true;
        descriptor
    }

    /// A generic parameter such as `T` or `out TResult`
    pub fn generic_parameter(name: impl Into<String>, variance: Variance) -> Self {
        let mut descriptor = Self::new("", name);
        descriptor.full_name = None;
        descriptor.flags.public = false;
        descriptor.flags.generic_parameter = true;
        descriptor.variance = variance;
        descriptor
    }

    /// A pointer to `element`, named after it (`int*`)
    pub fn pointer(element: TypeId, element_name: &str) -> Self {
        let mut descriptor = Self::new("", format!("{}*", element_name));
        descriptor.full_name = None;
        descriptor.flags.pointer = true;
        descriptor.element_type = Some(element);
        descriptor
    }

    pub fn with_abstract(mut self) -> Self {
        self.flags.is_abstract = true;
        self
    }

    pub fn with_sealed(mut self) -> Self {
        self.flags.sealed = true;
        self
    }

    pub fn with_flags(mut self, update: impl FnOnce(&mut TypeFlags)) -> Self {
        update(&mut self.flags);
        self
    }

    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base_type = Some(base);
        self
    }

    pub fn with_interfaces(mut self, interfaces: impl IntoIterator<Item = TypeId>) -> Self {
        self.interfaces.extend(interfaces);
        self
    }

    /// Mark as a generic definition over `parameters`
    pub fn with_generic_parameters(mut self, parameters: impl IntoIterator<Item = TypeId>) -> Self {
        self.flags.generic = true;
        self.flags.generic_definition = true;
        self.generic_arguments = parameters.into_iter().collect();
        self
    }

    /// Mark as the closed instantiation of `definition` with `arguments`
    pub fn instantiating(
        mut self,
        definition: TypeId,
        arguments: impl IntoIterator<Item = TypeId>,
    ) -> Self {
        self.flags.generic = true;
        self.flags.generic_definition = false;
        self.generic_definition = Some(definition);
        self.generic_arguments = arguments.into_iter().collect();
        self
    }

    /// Mark as nested inside `declaring`
    pub fn nested_in(mut self, declaring: TypeId) -> Self {
        self.flags.nested = true;
        self.declaring_type = Some(declaring);
        self
    }

    pub fn is_generic_instantiation(&self) -> bool {
        self.flags.generic && !self.flags.generic_definition
    }

    /// Name without the arity suffix (``Dictionary`2`` becomes `Dictionary`)
    pub fn name_without_arity(&self) -> &str {
        match self.name.find('`') {
            Some(index) if index > 0 => &self.name[..index],
            _ => &self.name,
        }
    }

    /// Best available identifier for diagnostics
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }

    /// Reject flag combinations no real type can have
    pub fn validate(&self) -> Result<()> {
        let flags = &self.flags;
        let malformed = |message: &str| -> Result<()> {
            Err(TypegramError::malformed(self.display_name(), message))
        };

        if flags.interface && flags.is_enum {
            return malformed("interface cannot also be an enum");
        }
        if flags.interface && flags.value_type {
            return malformed("interface cannot also be a value type");
        }
        if flags.nested && self.declaring_type.is_none() {
            return malformed("nested type has no declaring type");
        }
        if flags.pointer && self.element_type.is_none() {
            return malformed("pointer type has no element type");
        }
        if flags.generic_definition && !flags.generic {
            return malformed("generic definition is not marked generic");
        }
        if flags.generic_parameter && flags.generic {
            return malformed("generic parameter cannot itself be generic");
        }
        if self.is_generic_instantiation() && self.generic_definition.is_none() {
            return malformed("closed generic instantiation has no generic definition");
        }
        if self.variance != Variance::None && !flags.generic_parameter {
            return malformed("variance on a type that is not a generic parameter");
        }
        Ok(())
    }
}

/// Diagram-relevant classification of a type
///
/// The declaration order is the order in which categories are emitted.
/// `Primitive` and `Delegate` are reserved: the admission filter removes such
/// types before classification matters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    Interface,
    AbstractClass,
    /// Concrete class
    Object,
    Enum,
    Attribute,
    StaticClass,
    Primitive,
    ValueType,
    Delegate,
}

impl Category {
    /// PlantUML declaration keyword
    pub fn keyword(self) -> &'static str {
        match self {
            Category::Interface => "interface",
            Category::Enum => "enum",
            Category::AbstractClass => "abstract class",
            Category::Attribute => "annotation",
            _ => "class",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Interface => write!(f, "interface"),
            Category::AbstractClass => write!(f, "abstract-class"),
            Category::Object => write!(f, "object"),
            Category::Enum => write!(f, "enum"),
            Category::Attribute => write!(f, "attribute"),
            Category::StaticClass => write!(f, "static-class"),
            Category::Primitive => write!(f, "primitive"),
            Category::ValueType => write!(f, "value-type"),
            Category::Delegate => write!(f, "delegate"),
        }
    }
}

/// Kind of relation drawn between two types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Base class: `<|--`
    Inheritance,
    /// Interface realization: `<|..`
    InterfaceImplementation,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Inheritance => write!(f, "<|--"),
            EdgeKind::InterfaceImplementation => write!(f, "<|.."),
        }
    }
}

/// A directed relation from a supertype to the type that extends it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Base class or interface (open generic form)
    pub parent: TypeId,
    pub child: TypeId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(parent: TypeId, child: TypeId, kind: EdgeKind) -> Self {
        Self {
            parent,
            child,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_without_arity() {
        let mut descriptor = TypeDescriptor::class("System.Collections.Generic", "Dictionary`2");
        assert_eq!(descriptor.name_without_arity(), "Dictionary");

        descriptor.name = "Plain".to_string();
        assert_eq!(descriptor.name_without_arity(), "Plain");

        descriptor.name = "`1".to_string();
        assert_eq!(descriptor.name_without_arity(), "`1");
    }

    #[test]
    fn test_constructors_set_full_name() {
        let descriptor = TypeDescriptor::interface("N", "I");
        assert_eq!(descriptor.full_name.as_deref(), Some("N.I"));
        assert_eq!(descriptor.namespace.as_deref(), Some("N"));
        assert!(descriptor.flags.interface);
        assert!(descriptor.flags.public);

        let parameter = TypeDescriptor::generic_parameter("T", Variance::Covariant);
        assert!(parameter.namespace.is_none());
        assert!(parameter.full_name.is_none());
    }

    #[test]
    fn test_validate_rejects_inconsistent_flags() {
        let both = TypeDescriptor::interface("N", "I").with_flags(|f| f.is_enum = true);
        assert!(matches!(
            both.validate(),
            Err(TypegramError::MalformedDescriptor { .. })
        ));

        let orphan = TypeDescriptor::class("N", "Inner").with_flags(|f| f.nested = true);
        assert!(orphan.validate().is_err());

        let dangling_pointer = TypeDescriptor::class("", "int*").with_flags(|f| f.pointer = true);
        assert!(dangling_pointer.validate().is_err());

        let open = TypeDescriptor::class("N", "Box`1").with_flags(|f| f.generic = true);
        assert!(open.validate().is_err());

        let mut variant = TypeDescriptor::class("N", "C");
        variant.variance = Variance::Covariant;
        assert!(variant.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(TypeDescriptor::enumeration("N", "Color").validate().is_ok());
        assert!(TypeDescriptor::structure("N", "Point").validate().is_ok());
        assert!(TypeDescriptor::generic_parameter("T", Variance::Contravariant)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_category_order_matches_emission_order() {
        let mut categories = vec![
            Category::Delegate,
            Category::Object,
            Category::Interface,
            Category::ValueType,
            Category::Enum,
            Category::AbstractClass,
        ];
        categories.sort();
        assert_eq!(
            categories,
            vec![
                Category::Interface,
                Category::AbstractClass,
                Category::Object,
                Category::Enum,
                Category::ValueType,
                Category::Delegate,
            ]
        );
    }

    #[test]
    fn test_category_keyword() {
        assert_eq!(Category::Interface.keyword(), "interface");
        assert_eq!(Category::AbstractClass.keyword(), "abstract class");
        assert_eq!(Category::Attribute.keyword(), "annotation");
        assert_eq!(Category::StaticClass.keyword(), "class");
        assert_eq!(Category::ValueType.keyword(), "class");
    }

    #[test]
    fn test_edge_kind_display() {
        assert_eq!(EdgeKind::Inheritance.to_string(), "<|--");
        assert_eq!(EdgeKind::InterfaceImplementation.to_string(), "<|..");
    }
}

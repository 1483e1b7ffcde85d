//! Type classification and stereotype markers

use std::fmt;

use crate::core::{well_known, Category, Result, TypeId, TypeUniverse};

/// Assigns each type exactly one [`Category`]
#[derive(Debug, Clone, Copy)]
pub struct TypeClassifier<'u> {
    universe: &'u TypeUniverse,
}

impl<'u> TypeClassifier<'u> {
    pub fn new(universe: &'u TypeUniverse) -> Self {
        Self { universe }
    }

    /// Classify `id`; the first matching rule wins
    pub fn classify(&self, id: TypeId) -> Result<Category> {
        let flags = &self.universe.get(id)?.flags;
        let category = if flags.interface {
            Category::Interface
        } else if flags.is_enum {
            Category::Enum
        } else if flags.is_abstract && !flags.sealed {
            Category::AbstractClass
        } else if self.universe.is_assignable_to_named(id, well_known::ATTRIBUTE) {
            Category::Attribute
        } else if flags.is_abstract && flags.sealed {
            Category::StaticClass
        } else if flags.value_type {
            Category::ValueType
        } else {
            Category::Object
        };
        Ok(category)
    }

    /// Stereotype markers for `id`, in a fixed order
    pub fn stereotypes(&self, id: TypeId, category: Category) -> Result<Vec<Stereotype>> {
        let descriptor = self.universe.get(id)?;
        let by_ref_like = descriptor.flags.by_ref_like;
        let mut markers = Vec::new();

        match category {
            Category::ValueType => markers.push(Stereotype::Struct),
            Category::Delegate => markers.push(Stereotype::Delegate),
            Category::StaticClass => markers.push(Stereotype::Static),
            _ => {}
        }
        if self.universe.is_assignable_to_named(id, well_known::DISPOSABLE) {
            markers.push(Stereotype::Disposable);
        }
        if self.universe.is_assignable_to_named(id, well_known::ASYNC_DISPOSABLE) {
            markers.push(Stereotype::AsyncDisposable);
        }
        let enumerable = self.universe.is_assignable_to_named(id, well_known::ENUMERABLE)
            || (!by_ref_like
                && self
                    .universe
                    .implements_generic_over(id, well_known::GENERIC_ENUMERABLE, id));
        if enumerable {
            markers.push(Stereotype::Enumerable);
        }
        if !by_ref_like && self.universe.implements_generic_over(id, well_known::EQUATABLE, id) {
            markers.push(Stereotype::Equatable);
        }
        Ok(markers)
    }
}

/// Marker appended to a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stereotype {
    Struct,
    Delegate,
    Static,
    Disposable,
    AsyncDisposable,
    Enumerable,
    Equatable,
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stereotype::Struct => write!(f, "<< (V,orchid) struct >>"),
            Stereotype::Delegate => write!(f, "<< (D,#FF7700) delegate >>"),
            Stereotype::Static => write!(f, "<<static>>"),
            Stereotype::Disposable => write!(f, "<< Disposable >>"),
            Stereotype::AsyncDisposable => write!(f, "<< AsyncDisposable >>"),
            Stereotype::Enumerable => write!(f, "<< Enumerable >>"),
            Stereotype::Equatable => write!(f, "<< Equatable >>"),
        }
    }
}

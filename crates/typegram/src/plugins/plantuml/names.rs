//! Canonical display names for types
//!
//! Renders nested, pointer, generic-parameter and generic types the way they
//! read in source: `Outer+Inner`, `int*`, `out T`, `Dictionary<TKey, TValue>`.

use crate::core::{Result, TypeDescriptor, TypeId, TypeUniverse, TypegramError};

/// Deeper than any real nesting or generic argument chain
const MAX_DEPTH: usize = 64;

/// Builds display names for types in a universe
///
/// # Example
/// ```
/// use typegram::core::{TypeDescriptor, TypeUniverse, Variance};
/// use typegram::plugins::plantuml::NameFormatter;
///
/// let mut universe = TypeUniverse::new();
/// let key = universe.add(TypeDescriptor::generic_parameter("TKey", Variance::None));
/// let value = universe.add(TypeDescriptor::generic_parameter("TValue", Variance::None));
/// let map = universe.add(
///     TypeDescriptor::class("N", "Map`2").with_generic_parameters([key, value]),
/// );
///
/// let formatter = NameFormatter::new(&universe);
/// assert_eq!(formatter.format(map).unwrap(), "Map<TKey, TValue>");
/// assert_eq!(formatter.with_generic_arguments(false).format(map).unwrap(), "Map<,>");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NameFormatter<'u> {
    universe: &'u TypeUniverse,
    show_generic_arguments: bool,
    show_declaring_type: bool,
}

impl<'u> NameFormatter<'u> {
    /// Formatter showing generic parameters and declaring types
    pub fn new(universe: &'u TypeUniverse) -> Self {
        Self {
            universe,
            show_generic_arguments: true,
            show_declaring_type: true,
        }
    }

    /// Show the parameters of generic definitions, or only their arity
    pub fn with_generic_arguments(mut self, show: bool) -> Self {
        self.show_generic_arguments = show;
        self
    }

    /// Prefix nested types with their declaring type
    pub fn with_declaring_type(mut self, show: bool) -> Self {
        self.show_declaring_type = show;
        self
    }

    /// Canonical name of `id`
    pub fn format(&self, id: TypeId) -> Result<String> {
        let mut name = String::new();
        self.write_name(&mut name, id, 0)?;
        Ok(name)
    }

    /// Canonical name of a type that may be absent
    pub fn format_optional(&self, id: Option<TypeId>) -> Result<String> {
        let id = id.ok_or_else(|| TypegramError::invalid_input("cannot format a missing type"))?;
        self.format(id)
    }

    /// Canonical name wrapped in double quotes, as diagram identifiers are
    pub fn format_quoted(&self, id: TypeId) -> Result<String> {
        let mut name = String::from('"');
        self.write_name(&mut name, id, 0)?;
        name.push('"');
        Ok(name)
    }

    fn write_name(&self, out: &mut String, id: TypeId, depth: usize) -> Result<()> {
        let descriptor = self.universe.get(id)?;
        if depth > MAX_DEPTH {
            return Err(TypegramError::malformed(
                descriptor.display_name(),
                "type nesting is cyclic or too deep to name",
            ));
        }
        descriptor.validate()?;
        let flags = &descriptor.flags;
        let mut is_basic = true;

        if self.show_declaring_type && flags.nested && !flags.generic_parameter {
            let declaring = required(descriptor, descriptor.declaring_type, "declaring type")?;
            self.write_name(out, declaring, depth + 1)?;
            out.push('+');
        }

        if flags.pointer {
            is_basic = false;
            let element = required(descriptor, descriptor.element_type, "element type")?;
            self.write_name(out, element, depth + 1)?;
            out.push('*');
        }

        if flags.generic_parameter {
            is_basic = false;
            out.push_str(descriptor.variance.marker());
            out.push_str(&descriptor.name);
        }

        if flags.generic {
            is_basic = false;
            out.push_str(descriptor.name_without_arity());
            out.push('<');
            if flags.generic_definition && !self.show_generic_arguments {
                let separators = descriptor.generic_arguments.len().saturating_sub(1);
                out.extend(std::iter::repeat(',').take(separators));
            } else {
                self.write_arguments(out, &descriptor.generic_arguments, depth)?;
            }
            out.push('>');
        }

        if is_basic {
            out.push_str(&descriptor.name);
        }
        Ok(())
    }

    fn write_arguments(&self, out: &mut String, arguments: &[TypeId], depth: usize) -> Result<()> {
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            self.write_name(out, *argument, depth + 1)?;
        }
        Ok(())
    }
}

fn required(descriptor: &TypeDescriptor, id: Option<TypeId>, what: &str) -> Result<TypeId> {
    id.ok_or_else(|| TypegramError::malformed(descriptor.display_name(), format!("missing {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Variance;

    #[test]
    fn test_basic_name() {
        let mut universe = TypeUniverse::new();
        let id = universe.add(TypeDescriptor::class("N", "Widget"));
        assert_eq!(NameFormatter::new(&universe).format(id).unwrap(), "Widget");
    }

    #[test]
    fn test_quoted_name() {
        let mut universe = TypeUniverse::new();
        let id = universe.add(TypeDescriptor::class("N", "Widget"));
        assert_eq!(
            NameFormatter::new(&universe).format_quoted(id).unwrap(),
            "\"Widget\""
        );
    }

    #[test]
    fn test_single_parameter_definition_hidden() {
        let mut universe = TypeUniverse::new();
        let t = universe.add(TypeDescriptor::generic_parameter("T", Variance::None));
        let list = universe.add(TypeDescriptor::class("N", "List`1").with_generic_parameters([t]));
        let formatter = NameFormatter::new(&universe).with_generic_arguments(false);
        assert_eq!(formatter.format(list).unwrap(), "List<>");
    }

    #[test]
    fn test_nested_without_declaring_type_flag() {
        let mut universe = TypeUniverse::new();
        let outer = universe.add(TypeDescriptor::class("N", "Outer"));
        let inner = universe.add(TypeDescriptor::class("N", "Inner").nested_in(outer));
        let formatter = NameFormatter::new(&universe).with_declaring_type(false);
        assert_eq!(formatter.format(inner).unwrap(), "Inner");
    }

    #[test]
    fn test_missing_type_is_invalid_input() {
        let universe = TypeUniverse::new();
        let formatter = NameFormatter::new(&universe);
        assert!(matches!(
            formatter.format(TypeId::new(3)),
            Err(TypegramError::InvalidInput { .. })
        ));
        assert!(matches!(
            formatter.format_optional(None),
            Err(TypegramError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_nesting_cycle_is_malformed() {
        let mut universe = TypeUniverse::new();
        let a = universe.add(TypeDescriptor::class("N", "A"));
        let b = universe.add(TypeDescriptor::class("N", "B").nested_in(a));
        universe.get_mut(a).unwrap().flags.nested = true;
        universe.get_mut(a).unwrap().declaring_type = Some(b);

        let result = NameFormatter::new(&universe).format(b);
        assert!(matches!(
            result,
            Err(TypegramError::MalformedDescriptor { .. })
        ));
    }
}

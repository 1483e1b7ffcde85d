//! PlantUML class diagram emitter
//!
//! Walks the admitted types namespace by namespace and category by category
//! and writes one declaration line per type followed by its relation lines.
//!
//! ```text
//! @startuml
//! hide empty members
//! left to right direction
//! namespace N {
//!   interface "I" [[https://docs.microsoft.com/dotnet/api/N.I]]
//!
//!   class "C" [[https://docs.microsoft.com/dotnet/api/N.C]]
//!   "I" <|.. "C"
//!
//! }
//! hide System.IEquatable<T>
//! ...
//! @enduml
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info, span, trace, Level};

use super::classifier::TypeClassifier;
use super::filter::AdmissionFilter;
use super::names::NameFormatter;
use super::relations::RelationFilter;
use crate::core::{
    Category, Edge, LineSink, Renderer, Result, TypeId, TypeUniverse,
};

/// Base of the API documentation links attached to each type
pub const DOC_BASE_URL: &str = "https://docs.microsoft.com/dotnet/api/";

const HEADER: &[&str] = &["@startuml", "hide empty members", "left to right direction"];

/// Hide directives for the contracts [`IGNORED_INTERFACES`](super::IGNORED_INTERFACES)
/// leaves unconnected
const TRAILER: &[&str] = &[
    "hide System.IEquatable<T>",
    "hide System.IDisposable",
    "hide System.IAsyncDisposable",
    "hide System.ICloneable",
    "hide System.IComparable",
    "hide System.IComparable<in T>",
    "hide System.Collections.IEnumerable",
    "hide System.Collections.Generic.IEnumerable<out T>",
    "@enduml",
];

/// Admitted types of one namespace, by category, each sorted by name
type NamespaceGroup = BTreeMap<Category, Vec<(String, TypeId)>>;

/// Renders a [`TypeUniverse`] as a PlantUML class diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramEmitter;

impl DiagramEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Emit the whole document into `sink`
    ///
    /// The document is built in memory first; on error nothing is written.
    pub fn emit(&self, universe: &TypeUniverse, sink: &mut dyn LineSink) -> Result<()> {
        let lines = self.render_lines(universe)?;
        for line in &lines {
            sink.write_line(line)?;
        }
        Ok(())
    }

    /// Build the document as a list of lines
    pub fn render_lines(&self, universe: &TypeUniverse) -> Result<Vec<String>> {
        let emit_span = span!(Level::INFO, "emit_diagram", type_count = universe.len());
        let _enter = emit_span.enter();

        let groups = self.group(universe)?;
        let names = NameFormatter::new(universe);
        let classifier = TypeClassifier::new(universe);
        let relations = RelationFilter::new(universe);

        let mut lines: Vec<String> = HEADER.iter().map(|line| line.to_string()).collect();
        let mut declared = 0usize;
        let mut edge_count = 0usize;

        for (namespace, categories) in &groups {
            debug!(namespace, categories = categories.len(), "Emitting namespace");
            lines.push(format!("namespace {} {{", namespace));

            for (category, types) in categories {
                for (_, id) in types {
                    let declaration = self.declaration(universe, &names, &classifier, *id, *category)?;
                    lines.push(declaration);
                    declared += 1;

                    for edge in relations.relations(*id)? {
                        lines.push(self.edge_line(universe, &names, namespace, &edge)?);
                        edge_count += 1;
                    }
                }
                lines.push(String::new());
            }
            lines.push("}".to_string());
        }

        lines.extend(TRAILER.iter().map(|line| line.to_string()));
        info!(
            namespaces = groups.len(),
            types = declared,
            edges = edge_count,
            "Diagram emitted"
        );
        Ok(lines)
    }

    /// Admitted types grouped by namespace, then category, then name
    fn group(&self, universe: &TypeUniverse) -> Result<BTreeMap<String, NamespaceGroup>> {
        let admission = AdmissionFilter::new(universe);
        let classifier = TypeClassifier::new(universe);
        let mut groups: BTreeMap<String, NamespaceGroup> = BTreeMap::new();

        for id in universe.exported_types() {
            if !admission.admits_type(Some(id)) {
                continue;
            }
            let descriptor = universe.get(id)?;
            let Some(namespace) = descriptor.namespace.as_deref() else {
                continue;
            };
            if !AdmissionFilter::admits_namespace(Some(namespace)) {
                continue;
            }
            let category = classifier.classify(id)?;
            trace!(type_name = descriptor.display_name(), %category, "Classified");
            groups
                .entry(namespace.to_string())
                .or_default()
                .entry(category)
                .or_default()
                .push((descriptor.name.clone(), id));
        }

        for types in groups.values_mut().flat_map(|categories| categories.values_mut()) {
            types.sort_by(|a, b| a.0.cmp(&b.0));
        }
        Ok(groups)
    }

    fn declaration(
        &self,
        universe: &TypeUniverse,
        names: &NameFormatter<'_>,
        classifier: &TypeClassifier<'_>,
        id: TypeId,
        category: Category,
    ) -> Result<String> {
        let mut line = format!("  {} {}", category.keyword(), names.format_quoted(id)?);
        let stereotypes: String = classifier
            .stereotypes(id, category)?
            .iter()
            .map(|stereotype| stereotype.to_string())
            .collect();
        if !stereotypes.is_empty() {
            line.push(' ');
            line.push_str(&stereotypes);
        }
        line.push(' ');
        line.push_str(&doc_link(universe, id)?);
        Ok(line)
    }

    fn edge_line(
        &self,
        universe: &TypeUniverse,
        names: &NameFormatter<'_>,
        namespace: &str,
        edge: &Edge,
    ) -> Result<String> {
        let parent = universe.get(edge.parent)?;
        let parent_name = names.format(edge.parent)?;
        let parent_name = match parent.namespace.as_deref() {
            Some(parent_namespace) if parent_namespace != namespace => {
                format!("{}.{}", parent_namespace, parent_name)
            }
            _ => parent_name,
        };
        Ok(format!(
            "  \"{}\" {} {}",
            parent_name,
            edge.kind,
            names.format_quoted(edge.child)?
        ))
    }
}

impl Renderer for DiagramEmitter {
    type Output = String;

    fn render(&self, universe: &TypeUniverse) -> Result<String> {
        let mut output = String::new();
        for line in self.render_lines(universe)? {
            output.push_str(&line);
            output.push('\n');
        }
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn format(&self) -> &'static str {
        "puml"
    }
}

/// Documentation link for `id`, e.g.
/// ``[[https://docs.microsoft.com/dotnet/api/System.Collections.Generic.List-1]]``
pub fn doc_link(universe: &TypeUniverse, id: TypeId) -> Result<String> {
    let descriptor = universe.get(id)?;
    let full_name = match (&descriptor.full_name, &descriptor.namespace) {
        (Some(full_name), _) => full_name.clone(),
        (None, Some(namespace)) => format!("{}.{}", namespace, descriptor.name),
        (None, None) => descriptor.name.clone(),
    };
    Ok(format!("[[{}{}]]", DOC_BASE_URL, full_name.replace('`', "-")))
}

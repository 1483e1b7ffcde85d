//! Minimal relation sets for a type
//!
//! A type's base class and interfaces are reduced to the edges worth drawing:
//! generic instantiations collapse onto their open definition, built-in
//! contracts are dropped, and an interface is dropped when a more specific
//! interface of the same type already implies it.

use tracing::{debug, trace};

use super::filter::AdmissionFilter;
use crate::core::{well_known, Edge, EdgeKind, Result, TypeId, TypeUniverse};

/// Built-in contracts nearly every type implements; edges to them are noise
pub const IGNORED_INTERFACES: &[&str] = &[
    well_known::CLONEABLE,
    well_known::ASYNC_DISPOSABLE,
    well_known::DISPOSABLE,
    well_known::EQUATABLE,
    well_known::COMPARABLE,
    well_known::GENERIC_COMPARABLE,
    well_known::ENUMERABLE,
    well_known::GENERIC_ENUMERABLE,
];

/// Computes the non-redundant edges of a type
#[derive(Debug, Clone, Copy)]
pub struct RelationFilter<'u> {
    universe: &'u TypeUniverse,
    admission: AdmissionFilter<'u>,
}

impl<'u> RelationFilter<'u> {
    pub fn new(universe: &'u TypeUniverse) -> Self {
        Self {
            universe,
            admission: AdmissionFilter::new(universe),
        }
    }

    /// Inheritance edge plus interface edges of `id`
    pub fn relations(&self, id: TypeId) -> Result<Vec<Edge>> {
        let mut edges: Vec<Edge> = self.base_edge(id)?.into_iter().collect();
        edges.extend(self.interface_edges(id)?);
        Ok(edges)
    }

    /// Edge to the base class, pointing at its open generic form
    pub fn base_edge(&self, id: TypeId) -> Result<Option<Edge>> {
        let descriptor = self.universe.get(id)?;
        let Some(base) = descriptor.base_type else {
            return Ok(None);
        };
        if !self.admission.admits_type(Some(base)) {
            return Ok(None);
        }
        let target = self.universe.open_form(base)?;
        let namespace = self.universe.get(target)?.namespace.as_deref();
        if !AdmissionFilter::admits_namespace(namespace) {
            trace!(base = %target, "Base type namespace filtered");
            return Ok(None);
        }
        Ok(Some(Edge::new(target, id, EdgeKind::Inheritance)))
    }

    /// Realization edges to the most specific interfaces of `id`
    pub fn interface_edges(&self, id: TypeId) -> Result<Vec<Edge>> {
        let descriptor = self.universe.get(id)?;
        if descriptor.flags.is_enum {
            return Ok(Vec::new());
        }
        let interfaces = &descriptor.interfaces;
        let mut edges: Vec<Edge> = Vec::new();

        for &interface in interfaces {
            let target = self.universe.open_form(interface)?;
            let target_descriptor = self.universe.get(target)?;

            if self.is_ignored(target) {
                continue;
            }
            // Pairwise only: an interface is redundant when another declared
            // interface is assignable to it.
            let implied = interfaces
                .iter()
                .any(|&other| other != interface && self.universe.is_assignable_to(other, interface));
            if implied {
                trace!(interface = target_descriptor.display_name(), "Implied by a more specific interface");
                continue;
            }
            if !target_descriptor.flags.public {
                debug!(interface = target_descriptor.display_name(), "Skipping non-public interface");
                continue;
            }
            if !AdmissionFilter::admits_namespace(target_descriptor.namespace.as_deref()) {
                trace!(interface = target_descriptor.display_name(), "Interface namespace filtered");
                continue;
            }
            if edges.iter().any(|edge| edge.parent == target) {
                continue;
            }
            edges.push(Edge::new(target, id, EdgeKind::InterfaceImplementation));
        }
        Ok(edges)
    }

    fn is_ignored(&self, id: TypeId) -> bool {
        IGNORED_INTERFACES
            .iter()
            .any(|name| self.universe.find(name) == Some(id))
    }
}

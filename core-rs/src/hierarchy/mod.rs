//! Concept hierarchy indices
//!
//! `HierarchyIndex` materializes, once, the transitive and direct subclass
//! and superclass relations plus leaf sets over atomic concepts. Every query
//! afterwards is a hash lookup followed by a slice walk.
//!
//! `PropertyIndex` catalogs the roles available for restrictions.

pub mod property;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::info;

use crate::concept::{Concept, ConceptId, ConceptRegistry};
use crate::errors::{KbError, Result};
use crate::ontology::{ClassRef, OntologyAccess};

pub use property::{PropertyIndex, RoleSelection};

/// Restartable iterator over a pre-built concept set
pub type Concepts<'a> = std::slice::Iter<'a, Arc<Concept>>;

type Relation = HashMap<ConceptId, Vec<Arc<Concept>>>;
type Building = BTreeMap<ConceptId, BTreeMap<ConceptId, Arc<Concept>>>;

#[derive(Debug, Default)]
pub struct HierarchyIndex {
    all_sub: Relation,
    direct_sub: Relation,
    all_super: Relation,
    direct_super: Relation,
    leaves: Relation,
}

impl HierarchyIndex {
    /// Build every relation for every atomic concept of `registry`.
    ///
    /// Top's descendants are all other atomic concepts (Bottom included);
    /// Top never subsumes itself. A concept without descendants has no leaves.
    pub fn build<O: OntologyAccess + ?Sized>(ontology: &O, registry: &ConceptRegistry) -> Result<Self> {
        let wrap = |class: &ClassRef| -> Result<Arc<Concept>> {
            registry
                .get(&class.iri())
                .cloned()
                .ok_or_else(|| KbError::UnknownClass(class.iri()))
        };

        let mut all_sub = Building::new();
        let mut all_super = Building::new();
        let mut direct_sub = Building::new();
        let mut direct_super = Building::new();

        for (id, concept) in registry.concepts() {
            let Some(class) = concept.class() else { continue };

            let descendants = all_sub.entry(id.clone()).or_default();
            if concept.is_top() {
                for (other_id, other) in registry.concepts() {
                    if other_id != id {
                        descendants.insert(other_id.clone(), other.clone());
                    }
                }
            } else {
                for desc in ontology.descendants(class, false) {
                    let wrapped = wrap(&desc)?;
                    descendants.insert(wrapped.id().clone(), wrapped);
                }
            }

            let ancestors = all_super.entry(id.clone()).or_default();
            if !concept.is_top() {
                for ans in ontology.ancestors(class, false) {
                    let wrapped = wrap(&ans)?;
                    ancestors.insert(wrapped.id().clone(), wrapped);
                }
            }

            direct_super.entry(id.clone()).or_default();
            for sub in ontology.subclasses(class) {
                if &sub == class {
                    continue;
                }
                let wrapped = wrap(&sub)?;
                direct_sub
                    .entry(id.clone())
                    .or_default()
                    .insert(wrapped.id().clone(), wrapped.clone());
                direct_super
                    .entry(wrapped.id().clone())
                    .or_default()
                    .insert(id.clone(), concept.clone());
            }
        }

        let mut leaves = Building::new();
        for (id, descendants) in &all_sub {
            let leaf_set = leaves.entry(id.clone()).or_default();
            for (desc_id, desc) in descendants {
                if all_sub.get(desc_id).map_or(true, |d| d.is_empty()) {
                    leaf_set.insert(desc_id.clone(), desc.clone());
                }
            }
        }

        let index = Self {
            all_sub: freeze(all_sub),
            direct_sub: freeze(direct_sub),
            all_super: freeze(all_super),
            direct_super: freeze(direct_super),
            leaves: freeze(leaves),
        };
        info!(
            concepts = registry.len(),
            subsumptions = index.subsumption_count(),
            "built concept hierarchy"
        );
        Ok(index)
    }

    /// Descendants of `concept` that have no descendants of their own
    pub fn leaf_concepts(&self, concept: &Concept) -> Concepts<'_> {
        lookup(&self.leaves, concept)
    }

    pub fn direct_sub_concepts(&self, concept: &Concept) -> Concepts<'_> {
        lookup(&self.direct_sub, concept)
    }

    pub fn all_sub_concepts(&self, concept: &Concept) -> Concepts<'_> {
        lookup(&self.all_sub, concept)
    }

    pub fn direct_parents(&self, concept: &Concept) -> Concepts<'_> {
        lookup(&self.direct_super, concept)
    }

    pub fn all_ancestors(&self, concept: &Concept) -> Concepts<'_> {
        lookup(&self.all_super, concept)
    }

    /// Total number of (ancestor, descendant) pairs
    pub fn subsumption_count(&self) -> usize {
        self.all_sub.values().map(Vec::len).sum()
    }
}

fn freeze(building: Building) -> Relation {
    building
        .into_iter()
        .map(|(id, set)| (id, set.into_values().collect()))
        .collect()
}

fn lookup<'a>(relation: &'a Relation, concept: &Concept) -> Concepts<'a> {
    relation
        .get(concept.id())
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
}

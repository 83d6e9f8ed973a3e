//! Canonical atomic concepts
//!
//! One `Atomic` concept per named class plus Top (`owl:Thing`) and Bottom
//! (`owl:Nothing`), keyed by class IRI.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{Concept, ConceptId, KbToken};
use crate::ontology::{ClassRef, Individual, OntologyAccess};

#[derive(Debug)]
pub struct ConceptRegistry {
    concepts: BTreeMap<ConceptId, Arc<Concept>>,
    top: Arc<Concept>,
    bottom: Arc<Concept>,
    top_repairs: usize,
}

impl ConceptRegistry {
    /// Wrap every named class of `ontology` as an atomic concept.
    ///
    /// If some class has an instance that Top does not, Top's instances are
    /// replaced by the union over all classes. The repair is logged and
    /// counted in `top_repairs`.
    pub fn build<O: OntologyAccess + ?Sized>(ontology: &O, token: KbToken) -> Self {
        let mut concepts = BTreeMap::new();
        let mut observed: BTreeSet<Individual> = BTreeSet::new();

        for class in ontology.classes() {
            let instances = ontology.instances_of(&class);
            observed.extend(instances.iter().cloned());
            debug!(class = %class, instances = instances.len(), "registered atomic concept");
            let concept = Arc::new(Concept::atomic(class, instances, token));
            concepts.insert(concept.id().clone(), concept);
        }

        let mut top_instances = ontology.individuals();
        let mut top_repairs = 0;
        if !observed.is_subset(&top_instances) {
            warn!(
                ontology = ontology.name(),
                top = top_instances.len(),
                observed = observed.len(),
                "Top does not contain every class instance; replacing Top's instances with the union over all classes"
            );
            top_instances = observed;
            top_repairs += 1;
        }

        let top = Arc::new(Concept::atomic(ClassRef::thing(), top_instances, token));
        let bottom = Arc::new(Concept::atomic(ClassRef::nothing(), BTreeSet::new(), token));
        concepts.insert(top.id().clone(), top.clone());
        concepts.insert(bottom.id().clone(), bottom.clone());

        Self {
            concepts,
            top,
            bottom,
            top_repairs,
        }
    }

    pub fn concepts(&self) -> &BTreeMap<ConceptId, Arc<Concept>> {
        &self.concepts
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Concept>> {
        self.concepts.get(id)
    }

    pub fn top(&self) -> &Arc<Concept> {
        &self.top
    }

    pub fn bottom(&self) -> &Arc<Concept> {
        &self.bottom
    }

    /// Number of times Top's instance set was repaired during build
    pub fn top_repairs(&self) -> usize {
        self.top_repairs
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

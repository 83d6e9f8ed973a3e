//! Interned concept algebra
//!
//! Every operation validates its operands, short-circuits the algebraic
//! identities, then looks the canonical id up in the interning table. A miss
//! computes the instance set, interns the result and returns it; a hit
//! returns the stored `Arc` untouched.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

use super::{operand_order, Concept, ConceptForm, ConceptId, ConceptRegistry, KbToken};
use crate::errors::{KbError, Result};
use crate::ontology::{Individual, OntologyAccess, PropertyRef};

/// Instance-count bounds deciding whether a concept is a viable candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeBounds {
    pub min: usize,
    pub max: f64,
}

impl SizeBounds {
    /// `max = |Top| * ratio`
    pub fn new(min: usize, top_size: usize, ratio: f64) -> Self {
        Self {
            min,
            max: top_size as f64 * ratio,
        }
    }

    pub fn admits(&self, size: usize) -> bool {
        size >= self.min && size as f64 <= self.max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlgebraStats {
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Constructed concepts that fell outside the size bounds when built
    pub non_viable: usize,
}

pub struct ConceptAlgebra {
    token: KbToken,
    top: Arc<Concept>,
    bottom: Arc<Concept>,
    interned: HashMap<ConceptId, Arc<Concept>>,
    bounds: SizeBounds,
    stats: AlgebraStats,
}

impl ConceptAlgebra {
    /// Seed the interning table with the registry's atomic concepts
    pub fn new(token: KbToken, registry: &ConceptRegistry, bounds: SizeBounds) -> Self {
        let interned = registry
            .concepts()
            .iter()
            .map(|(id, concept)| (id.clone(), concept.clone()))
            .collect();
        Self {
            token,
            top: registry.top().clone(),
            bottom: registry.bottom().clone(),
            interned,
            bounds,
            stats: AlgebraStats::default(),
        }
    }

    /// Reject concepts that were not built (and interned) here
    pub fn validate(&self, concept: &Arc<Concept>) -> Result<()> {
        let known = concept.kb() == self.token
            && self
                .interned
                .get(concept.id())
                .is_some_and(|interned| Arc::ptr_eq(interned, concept));
        if known {
            Ok(())
        } else {
            Err(KbError::ForeignConcept(concept.id().to_string()))
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Concept>> {
        self.interned.get(id)
    }

    /// Number of interned concepts, atomic ones included
    pub fn len(&self) -> usize {
        self.interned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interned.is_empty()
    }

    pub fn bounds(&self) -> SizeBounds {
        self.bounds
    }

    pub fn set_min_size(&mut self, min: usize) {
        self.bounds.min = min;
    }

    pub fn stats(&self) -> AlgebraStats {
        self.stats
    }

    /// `Some(concept)` when its size lies within the bounds
    pub fn viable<'a>(&self, concept: &'a Arc<Concept>) -> Option<&'a Arc<Concept>> {
        self.bounds.admits(concept.len()).then_some(concept)
    }

    fn intern(
        &mut self,
        id: ConceptId,
        build: impl FnOnce() -> (ConceptForm, BTreeSet<Individual>),
    ) -> Arc<Concept> {
        if let Some(existing) = self.interned.get(&id) {
            self.stats.cache_hits += 1;
            return existing.clone();
        }
        self.stats.cache_misses += 1;

        let (form, instances) = build();
        if !self.bounds.admits(instances.len()) {
            self.stats.non_viable += 1;
        }
        debug!(id = %id, instances = instances.len(), "interned concept");
        let concept = Arc::new(Concept::new(id.clone(), form, instances, self.token));
        self.interned.insert(id, concept.clone());
        concept
    }

    /// ¬C: `Top − C`. `¬¬C` is `C`, `¬Top` is Bottom and `¬Bottom` is Top.
    pub fn negation(&mut self, concept: &Arc<Concept>) -> Result<Arc<Concept>> {
        self.validate(concept)?;

        if let ConceptForm::Negation(inner) = concept.form() {
            return Ok(inner.clone());
        }
        if concept.is_top() {
            return Ok(self.bottom.clone());
        }
        if concept.is_bottom() {
            return Ok(self.top.clone());
        }

        let top = self.top.clone();
        Ok(self.intern(ConceptId::negation(concept), || {
            let instances = top.instances().difference(concept.instances()).cloned().collect();
            (ConceptForm::Negation(concept.clone()), instances)
        }))
    }

    /// A ⊔ B
    pub fn union(&mut self, a: &Arc<Concept>, b: &Arc<Concept>) -> Result<Arc<Concept>> {
        self.validate(a)?;
        self.validate(b)?;

        if a.is_top() || b.is_top() {
            return Ok(self.top.clone());
        }
        if b.is_bottom() || Arc::ptr_eq(a, b) {
            return Ok(a.clone());
        }
        if a.is_bottom() {
            return Ok(b.clone());
        }

        let (first, second) = operand_order(a, b);
        Ok(self.intern(ConceptId::union(a, b), || {
            let instances = first.instances().union(second.instances()).cloned().collect();
            (ConceptForm::Union(first.clone(), second.clone()), instances)
        }))
    }

    /// A ⊓ B
    pub fn intersection(&mut self, a: &Arc<Concept>, b: &Arc<Concept>) -> Result<Arc<Concept>> {
        self.validate(a)?;
        self.validate(b)?;

        if a.is_bottom() || b.is_bottom() {
            return Ok(self.bottom.clone());
        }
        if b.is_top() || Arc::ptr_eq(a, b) {
            return Ok(a.clone());
        }
        if a.is_top() {
            return Ok(b.clone());
        }

        let (first, second) = operand_order(a, b);
        Ok(self.intern(ConceptId::intersection(a, b), || {
            let instances = first.instances().intersection(second.instances()).cloned().collect();
            (ConceptForm::Intersection(first.clone(), second.clone()), instances)
        }))
    }

    /// ∃R.C: individuals with at least one R-filler in C
    pub fn existential_restriction<O: OntologyAccess + ?Sized>(
        &mut self,
        filler: &Arc<Concept>,
        role: &PropertyRef,
        ontology: &O,
    ) -> Result<Arc<Concept>> {
        self.validate(filler)?;

        let top = self.top.clone();
        Ok(self.intern(ConceptId::existential(filler, role), || {
            let instances = top
                .instances()
                .iter()
                .filter(|x| {
                    ontology
                        .role_fillers(x, role)
                        .iter()
                        .any(|y| filler.instances().contains(y))
                })
                .cloned()
                .collect();
            let form = ConceptForm::ExistentialRestriction {
                filler: filler.clone(),
                role: role.clone(),
            };
            (form, instances)
        }))
    }

    /// ∀R.C: individuals whose every R-filler is in C. Individuals without
    /// any R-filler satisfy it vacuously.
    pub fn universal_restriction<O: OntologyAccess + ?Sized>(
        &mut self,
        filler: &Arc<Concept>,
        role: &PropertyRef,
        ontology: &O,
    ) -> Result<Arc<Concept>> {
        self.validate(filler)?;

        let top = self.top.clone();
        Ok(self.intern(ConceptId::universal(filler, role), || {
            let instances = top
                .instances()
                .iter()
                .filter(|x| {
                    ontology
                        .role_fillers(x, role)
                        .iter()
                        .all(|y| filler.instances().contains(y))
                })
                .cloned()
                .collect();
            let form = ConceptForm::UniversalRestriction {
                filler: filler.clone(),
                role: role.clone(),
            };
            (form, instances)
        }))
    }
}

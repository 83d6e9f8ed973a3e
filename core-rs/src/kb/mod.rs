//! Knowledge base - Tbox/Abox with concept hierarchy and concept algebra
//!
//! Construction runs once: the ontology is loaded, atomic concepts are
//! registered, then the hierarchy and property indices are built. Compound
//! concepts are synthesized lazily afterwards and interned for the knowledge
//! base's lifetime.
//!
//! Not thread-safe across mutation and query: enrichment and algebra calls
//! take `&mut self`, so shared use needs an exclusive lock around them.

pub mod config;

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::concept::{Concept, ConceptAlgebra, ConceptId, ConceptRegistry, KbToken, SizeBounds};
use crate::errors::{KbError, Result};
use crate::hierarchy::{Concepts, HierarchyIndex, PropertyIndex};
use crate::ontology::{Individual, OntologyAccess, PropertyRef, RdfOntology, SerializationFormat};

pub use config::KbConfig;

/// Counters describing a knowledge base
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KbStats {
    pub name: String,
    pub atomic_concepts: usize,
    pub interned_concepts: usize,
    pub individuals: usize,
    pub properties: usize,
    pub subsumptions: usize,
    pub top_repairs: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub non_viable: usize,
    pub min_size_of_concept: usize,
    pub max_size_of_concept: f64,
}

pub struct KnowledgeBase<O: OntologyAccess = RdfOntology> {
    ontology: O,
    config: KbConfig,
    concepts: BTreeMap<ConceptId, Arc<Concept>>,
    top: Arc<Concept>,
    bottom: Arc<Concept>,
    hierarchy: HierarchyIndex,
    properties: PropertyIndex,
    algebra: ConceptAlgebra,
    top_repairs: usize,
}

impl KnowledgeBase<RdfOntology> {
    /// Load an ontology file and build the knowledge base
    ///
    /// # Example
    /// ```no_run
    /// # use evokb_core::{KbConfig, KnowledgeBase};
    /// let kb = KnowledgeBase::load("family.owl", KbConfig::default())?;
    /// println!("{} individuals", kb.all_individuals().len());
    /// # Ok::<(), evokb_core::KbError>(())
    /// ```
    pub fn load(path: impl AsRef<Path>, config: KbConfig) -> Result<Self> {
        config.validate()?;
        let ontology = RdfOntology::load(path, config.source_format, config.use_external_reasoner)?;
        Self::from_ontology(ontology, config)
    }
}

impl<O: OntologyAccess> KnowledgeBase<O> {
    /// Build the knowledge base over an already-loaded ontology
    pub fn from_ontology(ontology: O, config: KbConfig) -> Result<Self> {
        config.validate()?;
        let token = KbToken::fresh();

        let registry = ConceptRegistry::build(&ontology, token);
        let hierarchy = HierarchyIndex::build(&ontology, &registry)?;
        let properties = PropertyIndex::load(&ontology, config.role_selection);

        let bounds = SizeBounds::new(
            config.min_size_of_concept,
            registry.top().len(),
            config.max_concept_size_ratio,
        );
        let algebra = ConceptAlgebra::new(token, &registry, bounds);

        info!(
            ontology = ontology.name(),
            concepts = registry.len(),
            individuals = registry.top().len(),
            properties = properties.len(),
            "knowledge base ready"
        );

        Ok(Self {
            concepts: registry.concepts().clone(),
            top: registry.top().clone(),
            bottom: registry.bottom().clone(),
            top_repairs: registry.top_repairs(),
            ontology,
            config,
            hierarchy,
            properties,
            algebra,
        })
    }

    pub fn name(&self) -> &str {
        self.ontology.name()
    }

    pub fn ontology(&self) -> &O {
        &self.ontology
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    /// Top (`owl:Thing`)
    pub fn top(&self) -> &Arc<Concept> {
        &self.top
    }

    /// Bottom (`owl:Nothing`)
    pub fn bottom(&self) -> &Arc<Concept> {
        &self.bottom
    }

    pub fn all_individuals(&self) -> &BTreeSet<Individual> {
        self.top.instances()
    }

    /// Atomic concepts, Top and Bottom included
    pub fn all_concepts(&self) -> impl Iterator<Item = &Arc<Concept>> + '_ {
        self.concepts.values()
    }

    /// Look up any interned concept (atomic or compound) by id
    pub fn concept(&self, id: &str) -> Option<&Arc<Concept>> {
        self.algebra.get(id)
    }

    /// Look up an atomic concept by local name
    pub fn concept_by_name(&self, name: &str) -> Option<&Arc<Concept>> {
        self.concepts
            .values()
            .find(|c| c.class().is_some_and(|class| class.name == name))
    }

    pub fn properties(&self) -> &PropertyIndex {
        &self.properties
    }

    /// Object property by IRI or local name
    pub fn property(&self, name: &str) -> Option<&PropertyRef> {
        self.properties
            .find(name)
            .or_else(|| self.properties.all_properties().iter().find(|p| p.local_name() == name))
    }

    pub fn min_size_of_concept(&self) -> usize {
        self.algebra.bounds().min
    }

    pub fn set_min_size_of_concept(&mut self, n: usize) {
        self.algebra.set_min_size(n);
    }

    pub fn max_size_of_concept(&self) -> f64 {
        self.algebra.bounds().max
    }

    pub fn stats(&self) -> KbStats {
        let algebra = self.algebra.stats();
        let bounds = self.algebra.bounds();
        KbStats {
            name: self.name().to_string(),
            atomic_concepts: self.concepts.len(),
            interned_concepts: self.algebra.len(),
            individuals: self.top.len(),
            properties: self.properties.len(),
            subsumptions: self.hierarchy.subsumption_count(),
            top_repairs: self.top_repairs,
            cache_hits: algebra.cache_hits,
            cache_misses: algebra.cache_misses,
            non_viable: algebra.non_viable,
            min_size_of_concept: bounds.min,
            max_size_of_concept: bounds.max,
        }
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// { x | x ⊑ concept and no y ⊑ x }
    pub fn leaf_concepts(&self, concept: &Arc<Concept>) -> Result<Concepts<'_>> {
        self.algebra.validate(concept)?;
        Ok(self.hierarchy.leaf_concepts(concept))
    }

    /// { x | x ⊑ concept, directly }
    pub fn direct_sub_concepts(&self, concept: &Arc<Concept>) -> Result<Concepts<'_>> {
        self.algebra.validate(concept)?;
        Ok(self.hierarchy.direct_sub_concepts(concept))
    }

    /// { x | x ⊑ concept }
    pub fn all_sub_concepts(&self, concept: &Arc<Concept>) -> Result<Concepts<'_>> {
        self.algebra.validate(concept)?;
        Ok(self.hierarchy.all_sub_concepts(concept))
    }

    /// { x | concept ⊑ x, directly }
    pub fn direct_parents(&self, concept: &Arc<Concept>) -> Result<Concepts<'_>> {
        self.algebra.validate(concept)?;
        Ok(self.hierarchy.direct_parents(concept))
    }

    /// { x | concept ⊑ x }
    pub fn all_ancestors(&self, concept: &Arc<Concept>) -> Result<Concepts<'_>> {
        self.algebra.validate(concept)?;
        Ok(self.hierarchy.all_ancestors(concept))
    }

    // ------------------------------------------------------------------
    // Concept algebra
    // ------------------------------------------------------------------

    pub fn negation(&mut self, concept: &Arc<Concept>) -> Result<Arc<Concept>> {
        self.algebra.negation(concept)
    }

    /// Negate each concept in turn
    pub fn negation_from_iterables<I>(&mut self, concepts: I) -> Result<Vec<Arc<Concept>>>
    where
        I: IntoIterator,
        I::Item: Borrow<Arc<Concept>>,
    {
        concepts
            .into_iter()
            .map(|c| self.algebra.negation(c.borrow()))
            .collect()
    }

    pub fn union(&mut self, a: &Arc<Concept>, b: &Arc<Concept>) -> Result<Arc<Concept>> {
        self.algebra.union(a, b)
    }

    pub fn intersection(&mut self, a: &Arc<Concept>, b: &Arc<Concept>) -> Result<Arc<Concept>> {
        self.algebra.intersection(a, b)
    }

    pub fn existential_restriction(
        &mut self,
        concept: &Arc<Concept>,
        property: &PropertyRef,
    ) -> Result<Arc<Concept>> {
        self.check_property(property)?;
        self.algebra.existential_restriction(concept, property, &self.ontology)
    }

    pub fn universal_restriction(
        &mut self,
        concept: &Arc<Concept>,
        property: &PropertyRef,
    ) -> Result<Arc<Concept>> {
        self.check_property(property)?;
        self.algebra.universal_restriction(concept, property, &self.ontology)
    }

    /// ∃R.concept for every most general property R
    pub fn most_general_existential_restrictions(
        &mut self,
        concept: &Arc<Concept>,
    ) -> Result<Vec<Arc<Concept>>> {
        let Self { algebra, properties, ontology, .. } = self;
        properties
            .most_general_properties()
            .map(|p| algebra.existential_restriction(concept, p, &*ontology))
            .collect()
    }

    /// ∀R.concept for every most general property R
    pub fn most_general_universal_restrictions(
        &mut self,
        concept: &Arc<Concept>,
    ) -> Result<Vec<Arc<Concept>>> {
        let Self { algebra, properties, ontology, .. } = self;
        properties
            .most_general_properties()
            .map(|p| algebra.universal_restriction(concept, p, &*ontology))
            .collect()
    }

    /// `Some(concept)` if its size lies within the configured bounds
    pub fn viable<'a>(&self, concept: &'a Arc<Concept>) -> Option<&'a Arc<Concept>> {
        self.algebra.viable(concept)
    }

    pub fn is_viable(&self, concept: &Arc<Concept>) -> bool {
        self.viable(concept).is_some()
    }

    fn check_property(&self, property: &PropertyRef) -> Result<()> {
        if self.properties.contains(property) {
            Ok(())
        } else {
            Err(KbError::UnknownProperty(property.iri.clone()))
        }
    }

    // ------------------------------------------------------------------
    // Abox enrichment and persistence
    // ------------------------------------------------------------------

    /// Assert `concept` as a type of each of its instances.
    ///
    /// Interned concepts keep the instance sets they were built with.
    pub fn apply_type_enrichment(&mut self, concept: &Arc<Concept>) -> Result<usize> {
        self.algebra.validate(concept)?;
        let class = concept.enrichment_class();
        for individual in concept.instances() {
            self.ontology.assert_type(individual, &class)?;
        }
        info!(concept = %concept, assertions = concept.len(), "applied type enrichment");
        Ok(concept.len())
    }

    /// Enrich with several concepts; atomic ones use the ontology's current
    /// instances rather than the interned snapshot
    pub fn apply_type_enrichment_from_iterable<I>(&mut self, concepts: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<Arc<Concept>>,
    {
        let mut total = 0;
        for concept in concepts {
            let concept = concept.borrow();
            self.algebra.validate(concept)?;
            let class = concept.enrichment_class();
            let instances = match concept.class() {
                Some(atomic) => self.ontology.instances_of(atomic),
                None => concept.instances().clone(),
            };
            for individual in &instances {
                self.ontology.assert_type(individual, &class)?;
            }
            total += instances.len();
        }
        Ok(total)
    }

    /// Persist the (possibly enriched) ontology
    pub fn save(&self, path: impl AsRef<Path>, format: SerializationFormat) -> Result<()> {
        self.ontology.save(path.as_ref(), format)
    }
}

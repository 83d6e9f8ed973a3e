//! Contract Tests - Algebra and Hierarchy Invariant Protection
//!
//! This file aggregates all contract test modules.
//! Contract tests verify invariants that MUST NEVER BREAK: concept learners
//! deduplicate candidates by identity and navigate the hierarchy by these
//! relations, so a silent change here corrupts every search built on top.

/// Shared zoo knowledge base
///
/// ```text
/// Thing
/// ├── Animal
/// │   ├── Dog
/// │   │   └── Puppy
/// │   └── Cat
/// └── Plant
/// ```
mod fixtures {
    use evokb_core::{
        AssertedOntology, ClassRef, Concept, Individual, KbConfig, KnowledgeBase, PropertyRef,
    };
    use std::sync::Arc;

    pub const ZOO: &str = "http://example.org/zoo#";

    pub fn ind(name: &str) -> Individual {
        Individual::new(format!("{}{}", ZOO, name))
    }

    pub fn chases() -> PropertyRef {
        PropertyRef::object(format!("{}chases", ZOO))
    }

    pub fn eats() -> PropertyRef {
        PropertyRef::object(format!("{}eats", ZOO))
    }

    pub fn zoo() -> AssertedOntology {
        let class = |name: &str| ClassRef::new(ZOO, name);
        let mut onto = AssertedOntology::new("zoo");
        onto.add_subclass(class("Dog"), class("Animal"))
            .add_subclass(class("Cat"), class("Animal"))
            .add_subclass(class("Puppy"), class("Dog"))
            .add_class(class("Plant"))
            .add_type(ind("rex"), class("Dog"))
            .add_type(ind("bit"), class("Puppy"))
            .add_type(ind("tom"), class("Cat"))
            .add_type(ind("fern"), class("Plant"))
            .add_role_assertion(ind("rex"), &chases(), ind("tom"))
            .add_role_assertion(ind("bit"), &chases(), ind("rex"))
            .add_role_assertion(ind("bit"), &chases(), ind("tom"))
            .add_role_assertion(ind("tom"), &eats(), ind("fern"));
        onto
    }

    pub fn kb() -> KnowledgeBase<AssertedOntology> {
        KnowledgeBase::from_ontology(zoo(), KbConfig::default()).unwrap()
    }

    pub fn atomic(kb: &KnowledgeBase<AssertedOntology>) -> Vec<Arc<Concept>> {
        kb.all_concepts().cloned().collect()
    }

    pub fn named(kb: &KnowledgeBase<AssertedOntology>, name: &str) -> Arc<Concept> {
        kb.concept_by_name(name).unwrap().clone()
    }

    /// Atomic concepts plus a layer of compound ones
    pub fn mixed(kb: &mut KnowledgeBase<AssertedOntology>) -> Vec<Arc<Concept>> {
        let dog = named(kb, "Dog");
        let cat = named(kb, "Cat");
        let plant = named(kb, "Plant");
        let mut concepts = atomic(kb);
        concepts.push(kb.negation(&dog).unwrap());
        concepts.push(kb.union(&cat, &plant).unwrap());
        concepts.push(kb.intersection(&dog, &cat).unwrap());
        concepts.push(kb.existential_restriction(&cat, &chases()).unwrap());
        concepts.push(kb.universal_restriction(&dog, &chases()).unwrap());
        concepts
    }
}

// Contract test modules
mod contracts {
    // Concept algebra contracts
    mod algebra {
        include!("algebra_contracts.rs");
    }

    // Hierarchy index contracts
    mod hierarchy {
        include!("hierarchy_contracts.rs");
    }
}

// Concept Algebra Contract Tests
//
// These tests verify identity and set semantics of interned concepts.
// Learners compare candidates with Arc::ptr_eq and score them by their
// instance sets; both must stay exact.
//
// **Problem**: A "harmless" refactor rebuilds concepts on cache hits or
// drops the operand sort, and duplicate candidates flood the search
// **Solution**: Contract tests that pin identity, not just equality

use crate::fixtures::{chases, eats, ind, kb, mixed, named};
use evokb_core::KbError;
use std::collections::BTreeSet;
use std::sync::Arc;

/// WHY: ¬¬C must hand back the very object C
/// REASON: Refinement operators negate twice and dedupe by identity
/// BREAKS: Candidate deduplication, cache statistics
#[test]
fn double_negation_is_identity() {
    let mut kb = kb();
    for concept in mixed(&mut kb) {
        let negated = kb.negation(&concept).unwrap();
        let back = kb.negation(&negated).unwrap();
        assert!(
            Arc::ptr_eq(&back, &concept),
            "¬¬{} is not the same object",
            concept
        );
    }
}

/// WHY: Negation is the complement relative to Top
/// REASON: C ⊔ ¬C covers every individual, C ⊓ ¬C covers none
#[test]
fn negation_partitions_top() {
    let mut kb = kb();
    let top = kb.top().clone();
    for concept in mixed(&mut kb) {
        let negated = kb.negation(&concept).unwrap();
        assert!(concept.instances().is_disjoint(negated.instances()));

        let covered: BTreeSet<_> = concept.instances().union(negated.instances()).cloned().collect();
        assert_eq!(&covered, top.instances(), "{} ⊔ ¬{} misses individuals", concept, concept);
    }
}

/// WHY: Union and intersection ignore operand order
/// REASON: Canonical ids sort commutative operands
/// BREAKS: Half of all binary candidates become duplicates
#[test]
fn binary_operators_are_commutative_by_identity() {
    let mut kb = kb();
    let concepts = mixed(&mut kb);
    for a in &concepts {
        for b in &concepts {
            let ab = kb.union(a, b).unwrap();
            let ba = kb.union(b, a).unwrap();
            assert!(Arc::ptr_eq(&ab, &ba), "{} ⊔ {} differs by order", a, b);

            let ab = kb.intersection(a, b).unwrap();
            let ba = kb.intersection(b, a).unwrap();
            assert!(Arc::ptr_eq(&ab, &ba), "{} ⊓ {} differs by order", a, b);
        }
    }
}

/// WHY: Top and Bottom are units and absorbers
/// FORMAT: C ⊔ ⊥ = C, C ⊓ ⊤ = C, C ⊔ ⊤ = ⊤, C ⊓ ⊥ = ⊥
#[test]
fn top_and_bottom_identities() {
    let mut kb = kb();
    let top = kb.top().clone();
    let bottom = kb.bottom().clone();
    for c in mixed(&mut kb) {
        assert!(Arc::ptr_eq(&kb.union(&c, &bottom).unwrap(), &c));
        assert!(Arc::ptr_eq(&kb.intersection(&c, &top).unwrap(), &c));
        assert!(Arc::ptr_eq(&kb.union(&c, &top).unwrap(), &top));
        assert!(Arc::ptr_eq(&kb.intersection(&c, &bottom).unwrap(), &bottom));
    }
    assert!(Arc::ptr_eq(&kb.negation(&top).unwrap(), &bottom));
    assert!(Arc::ptr_eq(&kb.negation(&bottom).unwrap(), &top));
}

/// WHY: Binary operators are idempotent
#[test]
fn binary_operators_are_idempotent() {
    let mut kb = kb();
    for c in mixed(&mut kb) {
        assert!(Arc::ptr_eq(&kb.union(&c, &c).unwrap(), &c));
        assert!(Arc::ptr_eq(&kb.intersection(&c, &c).unwrap(), &c));
    }
}

/// WHY: Repeated construction returns the cached object
/// REASON: Cache hits must not recompute or re-wrap
/// BREAKS: Memory growth, identity comparisons
#[test]
fn repeated_construction_is_memoized() {
    let mut kb = kb();
    let dog = named(&kb, "Dog");
    let cat = named(&kb, "Cat");

    let first = kb.intersection(&dog, &cat).unwrap();
    let misses = kb.stats().cache_misses;
    let second = kb.intersection(&dog, &cat).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(kb.stats().cache_misses, misses);

    let some = kb.existential_restriction(&cat, &chases()).unwrap();
    assert!(Arc::ptr_eq(&some, &kb.existential_restriction(&cat, &chases()).unwrap()));
    assert!(!Arc::ptr_eq(&some, &kb.existential_restriction(&cat, &eats()).unwrap()));
}

/// WHY: De Morgan holds on extensions
/// FORMAT: ¬(A ⊔ B) ≡ ¬A ⊓ ¬B
#[test]
fn de_morgan_holds_on_instances() {
    let mut kb = kb();
    let concepts = mixed(&mut kb);
    for a in &concepts {
        for b in &concepts {
            let union = kb.union(a, b).unwrap();
            let lhs = kb.negation(&union).unwrap();
            let not_a = kb.negation(a).unwrap();
            let not_b = kb.negation(b).unwrap();
            let rhs = kb.intersection(&not_a, &not_b).unwrap();
            assert_eq!(lhs.instances(), rhs.instances(), "¬({} ⊔ {})", a, b);
        }
    }
}

/// WHY: Quantifiers are dual, with vacuous ∀ for filler-less individuals
/// FORMAT: ∀R.C ≡ ¬∃R.¬C
/// REASON: Learners prune ∀ candidates through the ∃ they already scored
#[test]
fn universal_is_dual_of_existential() {
    let mut kb = kb();
    for role in [chases(), eats()] {
        for c in mixed(&mut kb) {
            let all = kb.universal_restriction(&c, &role).unwrap();
            let not_c = kb.negation(&c).unwrap();
            let some_not = kb.existential_restriction(&not_c, &role).unwrap();
            let dual = kb.negation(&some_not).unwrap();
            assert_eq!(all.instances(), dual.instances(), "∀ {}.{}", role.local_name(), c);
        }
    }
}

/// WHY: Restriction extensions follow the asserted roles exactly
#[test]
fn restriction_extensions_match_role_assertions() {
    let mut kb = kb();
    let cat = named(&kb, "Cat");
    let dog = named(&kb, "Dog");

    let chases_cat = kb.existential_restriction(&cat, &chases()).unwrap();
    assert_eq!(chases_cat.instances(), &BTreeSet::from([ind("rex"), ind("bit")]));

    // rex and bit both chase tom; tom and fern chase nothing
    let only_dogs = kb.universal_restriction(&dog, &chases()).unwrap();
    assert_eq!(only_dogs.instances(), &BTreeSet::from([ind("tom"), ind("fern")]));
}

/// WHY: Foreign concepts are rejected before any computation
/// REASON: Two knowledge bases may share IRIs but not extensions
/// BREAKS: Silent mixing of Aboxes
#[test]
fn foreign_concepts_are_rejected() {
    let mut kb = kb();
    let other = crate::fixtures::kb();
    let foreign = named(&other, "Dog");
    let local = named(&kb, "Dog");

    assert!(matches!(kb.negation(&foreign), Err(KbError::ForeignConcept(_))));
    assert!(matches!(kb.union(&local, &foreign), Err(KbError::ForeignConcept(_))));
    assert!(matches!(
        kb.existential_restriction(&foreign, &chases()),
        Err(KbError::ForeignConcept(_))
    ));
    assert!(kb.all_sub_concepts(&foreign).is_err());
    assert_eq!(kb.stats().cache_misses, 0);
}

/// WHY: Empty extensions are values, not errors
/// REASON: Bottom-equivalent concepts are legitimate search states
#[test]
fn empty_results_are_non_viable_not_errors() {
    let mut kb = kb();
    let dog = named(&kb, "Dog");
    let cat = named(&kb, "Cat");

    let nothing = kb.intersection(&dog, &cat).unwrap();
    assert!(nothing.is_empty());
    assert!(!nothing.is_bottom());
    assert!(kb.viable(&nothing).is_none());
    assert!(kb.viable(&dog).is_some());
}

/// WHY: Every extension lies inside Top
#[test]
fn extensions_are_bounded_by_top() {
    let mut kb = kb();
    let top = kb.top().clone();
    for c in mixed(&mut kb) {
        assert!(c.instances().is_subset(top.instances()), "{} escapes Top", c);
    }
}

// Hierarchy Index Contract Tests
//
// These tests verify the precomputed subsumption relations.
// Top-down refinement walks direct sub-concepts and leaves; bottom-up
// generalization walks parents and ancestors. Both rely on the index
// agreeing with itself.

use crate::fixtures::{atomic, kb, mixed, named};
use std::collections::BTreeSet;
use std::sync::Arc;

fn ids<'a>(concepts: impl Iterator<Item = &'a Arc<evokb_core::Concept>>) -> BTreeSet<String> {
    concepts.map(|c| c.id().to_string()).collect()
}

/// WHY: Sub-concept and ancestor relations are each other's inverse
/// FORMAT: Y ∈ allSubConcepts(X) ⟺ X ∈ allAncestors(Y)
/// BREAKS: Generalization finds classes that refinement never reaches
#[test]
fn sub_concepts_and_ancestors_are_dual() {
    let kb = kb();
    let concepts = atomic(&kb);
    for x in &concepts {
        let subs = ids(kb.all_sub_concepts(x).unwrap());
        for y in &concepts {
            let ancestors = ids(kb.all_ancestors(y).unwrap());
            assert_eq!(
                subs.contains(y.id().as_str()),
                ancestors.contains(x.id().as_str()),
                "duality broken for X = {}, Y = {}",
                x,
                y
            );
        }
    }
}

/// WHY: Leaves are descendants without descendants
/// REASON: Learners seed specialization from leaves
#[test]
fn leaves_are_terminal_descendants() {
    let kb = kb();
    for x in atomic(&kb) {
        let subs = ids(kb.all_sub_concepts(&x).unwrap());
        for leaf in kb.leaf_concepts(&x).unwrap() {
            assert!(subs.contains(leaf.id().as_str()), "{} is a leaf of {} but not below it", leaf, x);
            assert_eq!(kb.all_sub_concepts(leaf).unwrap().count(), 0, "leaf {} has descendants", leaf);
        }
    }
}

/// WHY: Direct relations are subsets of their transitive closures
#[test]
fn direct_relations_are_contained_in_closures() {
    let kb = kb();
    for x in atomic(&kb) {
        let all_sub = ids(kb.all_sub_concepts(&x).unwrap());
        let direct_sub = ids(kb.direct_sub_concepts(&x).unwrap());
        assert!(direct_sub.is_subset(&all_sub), "direct subs of {} escape closure", x);

        let all_super = ids(kb.all_ancestors(&x).unwrap());
        let direct_super = ids(kb.direct_parents(&x).unwrap());
        assert!(direct_super.is_subset(&all_super), "direct parents of {} escape closure", x);
    }
}

/// WHY: Top never subsumes itself and has no ancestors
/// REASON: Top is the search root; a self-loop never terminates refinement
#[test]
fn top_is_the_unique_root() {
    let kb = kb();
    let top = kb.top().clone();

    let subs = ids(kb.all_sub_concepts(&top).unwrap());
    assert!(!subs.contains(top.id().as_str()));
    assert_eq!(subs.len(), atomic(&kb).len() - 1);
    assert_eq!(kb.all_ancestors(&top).unwrap().count(), 0);

    for x in atomic(&kb).iter().filter(|c| !c.is_top()) {
        assert!(ids(kb.all_ancestors(x).unwrap()).contains(top.id().as_str()));
    }
}

/// WHY: Subsumption implies extension containment
#[test]
fn sub_concepts_have_smaller_extensions() {
    let kb = kb();
    for x in atomic(&kb) {
        for sub in kb.all_sub_concepts(&x).unwrap() {
            assert!(
                sub.instances().is_subset(x.instances()),
                "{} ⊑ {} but extension is not contained",
                sub,
                x
            );
        }
    }
}

/// WHY: Queries are restartable and stable
#[test]
fn queries_are_restartable() {
    let kb = kb();
    let animal = named(&kb, "Animal");
    let first: Vec<_> = kb.all_sub_concepts(&animal).unwrap().cloned().collect();
    let second: Vec<_> = kb.all_sub_concepts(&animal).unwrap().cloned().collect();
    assert_eq!(first.len(), 3);
    assert!(first.iter().zip(&second).all(|(a, b)| Arc::ptr_eq(a, b)));
}

/// WHY: Compound concepts have no precomputed relations
#[test]
fn compound_concepts_have_empty_relations() {
    let mut kb = kb();
    for c in mixed(&mut kb).iter().filter(|c| !c.is_atomic()) {
        assert_eq!(kb.all_sub_concepts(c).unwrap().count(), 0);
        assert_eq!(kb.direct_sub_concepts(c).unwrap().count(), 0);
        assert_eq!(kb.leaf_concepts(c).unwrap().count(), 0);
        assert_eq!(kb.direct_parents(c).unwrap().count(), 0);
        assert_eq!(kb.all_ancestors(c).unwrap().count(), 0);
    }
}

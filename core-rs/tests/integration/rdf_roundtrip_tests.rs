//! Integration tests for Abox enrichment and persistence
//!
//! Enriched knowledge bases are saved, reloaded and checked for the
//! asserted types, in every supported serialization.

use evokb_core::{
    AssertedOntology, ClassRef, Individual, KbConfig, KnowledgeBase, OntologyAccess, PropertyRef,
    SerializationFormat,
};
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

const ZOO: &str = "http://example.org/zoo#";

const ZOO_TTL: &str = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix : <http://example.org/zoo#> .

<http://example.org/zoo> rdf:type owl:Ontology .
:Animal rdf:type owl:Class .
:Dog rdf:type owl:Class ; rdfs:subClassOf :Animal .
:Cat rdf:type owl:Class ; rdfs:subClassOf :Animal .
:chases rdf:type owl:ObjectProperty .
:d1 rdf:type owl:NamedIndividual , :Dog ; :chases :c1 .
:d2 rdf:type owl:NamedIndividual , :Dog .
:c1 rdf:type owl:NamedIndividual , :Cat .
"#;

fn zoo(name: &str) -> Individual {
    Individual::new(format!("{}{}", ZOO, name))
}

#[test]
fn test_enriched_compound_concept_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("zoo.ttl");
    fs::write(&source, ZOO_TTL).unwrap();

    let mut kb = KnowledgeBase::load(&source, KbConfig::default()).unwrap();
    let dog = kb.concept_by_name("Dog").unwrap().clone();
    let cat = kb.concept_by_name("Cat").unwrap().clone();
    let chases = kb.property("chases").unwrap().clone();

    let not_dog = kb.negation(&dog).unwrap();
    let chaser = kb.existential_restriction(&cat, &chases).unwrap();
    let asserted = kb
        .apply_type_enrichment_from_iterable([&not_dog, &chaser])
        .unwrap();
    assert_eq!(asserted, 2);

    for format in [
        SerializationFormat::NTriples,
        SerializationFormat::Turtle,
        SerializationFormat::RdfXml,
    ] {
        let out = temp_dir.path().join("saved").join(format!("zoo-{:?}.data", format));
        kb.save(&out, format).unwrap();

        let config = KbConfig {
            source_format: Some(format),
            ..KbConfig::default()
        };
        let reloaded = KnowledgeBase::load(&out, config).unwrap();

        let not_dog_class = reloaded.concept(&not_dog.enrichment_class().iri()).unwrap();
        assert!(not_dog_class.is_atomic());
        assert_eq!(not_dog_class.instances(), &BTreeSet::from([zoo("c1")]));

        let chaser_class = reloaded.concept(&chaser.enrichment_class().iri()).unwrap();
        assert_eq!(chaser_class.instances(), &BTreeSet::from([zoo("d1")]));

        // the original Tbox is intact
        assert_eq!(reloaded.concept_by_name("Animal").unwrap().len(), 3);
        assert_eq!(reloaded.all_individuals().len(), 3);
    }
}

#[test]
fn test_atomic_enrichment_keeps_class_iri() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("zoo.ttl");
    fs::write(&source, ZOO_TTL).unwrap();

    let mut kb = KnowledgeBase::load(&source, KbConfig::default()).unwrap();
    let animal = kb.concept_by_name("Animal").unwrap().clone();
    assert_eq!(kb.apply_type_enrichment(&animal).unwrap(), 3);

    let out = temp_dir.path().join("zoo.nt");
    kb.save(&out, SerializationFormat::NTriples).unwrap();
    let saved = fs::read_to_string(&out).unwrap();
    assert!(saved.contains(&format!("<{}c1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <{}Animal>", ZOO, ZOO)));
    assert!(!saved.contains("urn:evokb:concept"));
}

#[test]
fn test_in_memory_ontology_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let class = |name: &str| ClassRef::new(ZOO, name);
    let chases = PropertyRef::object(format!("{}chases", ZOO));

    let mut onto = AssertedOntology::new("zoo");
    onto.add_subclass(class("Dog"), class("Animal"))
        .add_type(zoo("d1"), class("Dog"))
        .add_type(zoo("a1"), class("Animal"))
        .add_role_assertion(zoo("d1"), &chases, zoo("a1"));

    let mut kb = KnowledgeBase::from_ontology(onto, KbConfig::default()).unwrap();
    let animal = kb.concept_by_name("Animal").unwrap().clone();
    let hunter = kb.existential_restriction(&animal, &chases).unwrap();
    kb.apply_type_enrichment(&hunter).unwrap();

    let out = temp_dir.path().join("zoo.ttl");
    kb.save(&out, SerializationFormat::Turtle).unwrap();

    let reloaded = KnowledgeBase::load(&out, KbConfig::default()).unwrap();
    assert_eq!(reloaded.concept_by_name("Animal").unwrap().len(), 2);
    assert_eq!(
        reloaded.ontology().role_fillers(&zoo("d1"), &chases),
        BTreeSet::from([zoo("a1")])
    );
    let hunter_class = reloaded.concept(&hunter.enrichment_class().iri()).unwrap();
    assert_eq!(hunter_class.instances(), &BTreeSet::from([zoo("d1")]));
}

/**
 * query.rs
 * SPARQL builders for extracting Tbox/Abox tables from an RDF store
 */

const PREFIXES: &str = r#"
            PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
            PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
            PREFIX owl: <http://www.w3.org/2002/07/owl#>
"#;

#[derive(Debug, Clone)]
pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    fn with_prefixes(body: &str) -> Self {
        Self::new(format!("{}{}", PREFIXES, body))
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Ontology header IRI (owl:Ontology)
    pub fn ontology_iri() -> Self {
        Self::with_prefixes(
            r#"
            SELECT ?ontology
            WHERE { ?ontology rdf:type owl:Ontology . FILTER(isIRI(?ontology)) }
            LIMIT 1
            "#,
        )
    }

    /// Named classes (blank-node class expressions are skipped)
    pub fn named_classes() -> Self {
        Self::with_prefixes(
            r#"
            SELECT DISTINCT ?class
            WHERE {
                { ?class rdf:type owl:Class } UNION { ?class rdf:type rdfs:Class }
                FILTER(isIRI(?class))
            }
            "#,
        )
    }

    /// Asserted subclass edges between named classes
    pub fn subclass_axioms() -> Self {
        Self::with_prefixes(
            r#"
            SELECT ?sub ?sup
            WHERE {
                ?sub rdfs:subClassOf ?sup .
                FILTER(isIRI(?sub) && isIRI(?sup))
            }
            "#,
        )
    }

    /// Declared named individuals
    pub fn named_individuals() -> Self {
        Self::with_prefixes(
            r#"
            SELECT DISTINCT ?individual
            WHERE { ?individual rdf:type owl:NamedIndividual . FILTER(isIRI(?individual)) }
            "#,
        )
    }

    /// Every `rdf:type` edge between IRIs; the loader keeps those whose
    /// object is a known class or `owl:Thing`
    pub fn type_assertions() -> Self {
        Self::with_prefixes(
            r#"
            SELECT ?individual ?class
            WHERE {
                ?individual rdf:type ?class .
                FILTER(isIRI(?individual) && isIRI(?class))
            }
            "#,
        )
    }

    /// Properties declared with the given OWL property type
    /// (e.g. `owl:ObjectProperty`)
    pub fn properties_of_type(owl_type: &str) -> Self {
        Self::with_prefixes(&format!(
            r#"
            SELECT DISTINCT ?property
            WHERE {{ ?property rdf:type {} . FILTER(isIRI(?property)) }}
            ORDER BY ?property
            "#,
            owl_type
        ))
    }

    pub fn sub_property_axioms() -> Self {
        Self::with_prefixes(
            r#"
            SELECT ?sub ?sup
            WHERE {
                ?sub rdfs:subPropertyOf ?sup .
                FILTER(isIRI(?sub) && isIRI(?sup) && ?sub != ?sup)
            }
            "#,
        )
    }

    /// Object property assertions between named individuals
    pub fn role_assertions() -> Self {
        Self::with_prefixes(
            r#"
            SELECT ?subject ?property ?object
            WHERE {
                ?property rdf:type owl:ObjectProperty .
                ?subject ?property ?object .
                FILTER(isIRI(?subject) && isIRI(?object))
            }
            "#,
        )
    }

    /// Propagate role assertions to super-properties
    pub fn materialize_sub_properties() -> Self {
        Self::with_prefixes(
            r#"
            INSERT { ?subject ?sup ?object }
            WHERE {
                ?property rdfs:subPropertyOf+ ?sup .
                ?subject ?property ?object .
                FILTER(isIRI(?sup))
            }
            "#,
        )
    }

    /// Type role subjects with the role's declared domain
    pub fn materialize_domains() -> Self {
        Self::with_prefixes(
            r#"
            INSERT { ?subject rdf:type ?class }
            WHERE {
                ?property rdfs:domain ?class .
                ?subject ?property ?object .
                FILTER(isIRI(?class) && isIRI(?subject))
            }
            "#,
        )
    }

    /// Type role objects with the role's declared range, when it is a class
    pub fn materialize_ranges() -> Self {
        Self::with_prefixes(
            r#"
            INSERT { ?object rdf:type ?class }
            WHERE {
                ?property rdfs:range ?class .
                ?class rdf:type owl:Class .
                ?subject ?property ?object .
                FILTER(isIRI(?class) && isIRI(?object))
            }
            "#,
        )
    }

    /// Propagate type assertions to named superclasses
    pub fn materialize_supertypes() -> Self {
        Self::with_prefixes(
            r#"
            INSERT { ?individual rdf:type ?sup }
            WHERE {
                ?class rdfs:subClassOf+ ?sup .
                ?individual rdf:type ?class .
                ?class rdf:type owl:Class .
                FILTER(isIRI(?sup) && isIRI(?individual))
            }
            "#,
        )
    }
}

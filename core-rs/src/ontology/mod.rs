//! Ontology access layer
//!
//! - `OntologyAccess`: capability set the knowledge base needs from an ontology
//! - asserted: in-memory Tbox/Abox tables (fixture and extraction target)
//! - rdf: Oxigraph-backed loader/saver for Turtle, N-Triples and RDF/XML
//! - query: SPARQL query builders used by the loader
//! - reasoner: optional RDFS materialization pass run before extraction

pub mod asserted;
pub mod query;
pub mod rdf;
pub mod reasoner;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{KbError, Result};

pub use asserted::AssertedOntology;
pub use query::SparqlQuery;
pub use rdf::RdfOntology;
pub use reasoner::{Materialization, RdfsMaterializer};

/// OWL namespace, home of `owl:Thing` and `owl:Nothing`
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";

/// Split an IRI into (namespace, local name) at the last `#` or `/`
pub fn split_iri(iri: &str) -> (&str, &str) {
    match iri.rfind(['#', '/']) {
        Some(pos) if pos + 1 < iri.len() => iri.split_at(pos + 1),
        _ => ("", iri),
    }
}

/// Reference to a named class
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassRef {
    pub namespace: String,
    pub name: String,
}

impl ClassRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn from_iri(iri: &str) -> Self {
        let (namespace, name) = split_iri(iri);
        Self::new(namespace, name)
    }

    /// `owl:Thing`
    pub fn thing() -> Self {
        Self::new(OWL_NS, "Thing")
    }

    /// `owl:Nothing`
    pub fn nothing() -> Self {
        Self::new(OWL_NS, "Nothing")
    }

    pub fn is_thing(&self) -> bool {
        self.namespace == OWL_NS && self.name == "Thing"
    }

    pub fn is_nothing(&self) -> bool {
        self.namespace == OWL_NS && self.name == "Nothing"
    }

    /// Full IRI (namespace + local name); doubles as the atomic concept id
    pub fn iri(&self) -> String {
        format!("{}{}", self.namespace, self.name)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.name)
    }
}

/// A named individual, identified by IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Individual(String);

impl Individual {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn iri(&self) -> &str {
        &self.0
    }

    pub fn local_name(&self) -> &str {
        split_iri(&self.0).1
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Object,
    Data,
    Annotation,
}

/// Reference to a property (role)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyRef {
    pub iri: String,
    pub kind: PropertyKind,
}

impl PropertyRef {
    pub fn new(iri: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            iri: iri.into(),
            kind,
        }
    }

    pub fn object(iri: impl Into<String>) -> Self {
        Self::new(iri, PropertyKind::Object)
    }

    pub fn data(iri: impl Into<String>) -> Self {
        Self::new(iri, PropertyKind::Data)
    }

    pub fn annotation(iri: impl Into<String>) -> Self {
        Self::new(iri, PropertyKind::Annotation)
    }

    pub fn local_name(&self) -> &str {
        split_iri(&self.iri).1
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iri)
    }
}

/// RDF serialization formats supported for load and save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    #[default]
    NTriples,
    Turtle,
    RdfXml,
}

impl SerializationFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "nt" => Some(Self::NTriples),
            "ttl" => Some(Self::Turtle),
            "owl" | "rdf" | "xml" => Some(Self::RdfXml),
            _ => None,
        }
    }

    pub fn rdf_format(self) -> oxigraph::io::RdfFormat {
        match self {
            Self::NTriples => oxigraph::io::RdfFormat::NTriples,
            Self::Turtle => oxigraph::io::RdfFormat::Turtle,
            Self::RdfXml => oxigraph::io::RdfFormat::RdfXml,
        }
    }
}

impl FromStr for SerializationFormat {
    type Err = KbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ntriples" | "n-triples" | "nt" => Ok(Self::NTriples),
            "turtle" | "ttl" => Ok(Self::Turtle),
            "rdfxml" | "rdf/xml" | "xml" | "owl" => Ok(Self::RdfXml),
            other => Err(KbError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Capability set the knowledge base consumes from an ontology provider.
///
/// Class queries follow OWL conventions: `owl:Thing` is an ancestor of every
/// named class, `owl:Nothing` has no descendants, and `instances_of` includes
/// the instances of every descendant class.
pub trait OntologyAccess {
    /// Ontology name (used for logging and CLI output)
    fn name(&self) -> &str;

    /// Named classes, excluding `owl:Thing` and `owl:Nothing`
    fn classes(&self) -> Vec<ClassRef>;

    /// Every known individual
    fn individuals(&self) -> BTreeSet<Individual>;

    fn instances_of(&self, class: &ClassRef) -> BTreeSet<Individual>;

    fn ancestors(&self, class: &ClassRef, include_self: bool) -> BTreeSet<ClassRef>;

    fn descendants(&self, class: &ClassRef, include_self: bool) -> BTreeSet<ClassRef>;

    /// Direct subclasses only
    fn subclasses(&self, class: &ClassRef) -> BTreeSet<ClassRef>;

    fn data_properties(&self) -> Vec<PropertyRef>;

    fn object_properties(&self) -> Vec<PropertyRef>;

    fn annotation_properties(&self) -> Vec<PropertyRef>;

    /// All properties: object, then data, then annotation
    fn properties(&self) -> Vec<PropertyRef> {
        let mut all = self.object_properties();
        all.extend(self.data_properties());
        all.extend(self.annotation_properties());
        all
    }

    /// Direct super-properties in the role hierarchy
    fn super_properties(&self, _property: &PropertyRef) -> BTreeSet<PropertyRef> {
        BTreeSet::new()
    }

    /// Objects `y` such that `property(individual, y)` is asserted
    fn role_fillers(&self, individual: &Individual, property: &PropertyRef) -> BTreeSet<Individual>;

    /// Append a type assertion to an individual (Abox enrichment)
    fn assert_type(&mut self, individual: &Individual, class: &ClassRef) -> Result<()>;

    /// Persist the ontology, including enrichment
    fn save(&self, path: &Path, format: SerializationFormat) -> Result<()>;
}

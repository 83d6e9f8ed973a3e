//! Error types for the knowledge base

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KbError {
    #[error("Failed to load ontology {path}: {reason}")]
    OntologyLoad { path: String, reason: String },

    #[error("RDF parse error: {0}")]
    RdfParse(String),

    #[error("SPARQL query error: {0}")]
    Query(String),

    #[error("RDF store error: {0}")]
    Store(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Unknown class referenced by ontology: {0}")]
    UnknownClass(String),

    #[error("Concept does not belong to this knowledge base: {0}")]
    ForeignConcept(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Unsupported serialization format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<oxigraph::store::StorageError> for KbError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        KbError::Store(err.to_string())
    }
}

impl From<oxigraph::sparql::EvaluationError> for KbError {
    fn from(err: oxigraph::sparql::EvaluationError) -> Self {
        KbError::Query(err.to_string())
    }
}

impl From<oxigraph::model::IriParseError> for KbError {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        KbError::InvalidIri(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KbError>;

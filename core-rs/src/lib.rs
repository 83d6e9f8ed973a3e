//! # EvoKB Core - Description Logic Knowledge Base
//!
//! Loads an OWL/RDF ontology into an indexed knowledge base that concept
//! learners use to navigate and combine class expressions.
//!
//! ## Core Principle
//!
//! **Concepts carry their extension**: every concept, atomic or compound,
//! holds the exact set of individuals it denotes. Compound concepts are
//! built by set algebra over those extensions and interned, so equal
//! expressions are the same object for the lifetime of the knowledge base.
//!
//! ## Key Features
//!
//! - Atomic concepts for every named class, plus Top and Bottom
//! - Precomputed sub/super/leaf relations answered in O(1)
//! - Negation, union, intersection, ∃ and ∀ restrictions with memoization
//! - Size bounds for candidate viability
//! - Abox enrichment and RDF persistence
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │   RDF file (Turtle / N-Triples / XML) │
//! └──────────────────────────────────────┘
//!                   │ oxigraph
//!                   ▼
//!          ┌─────────────────┐
//!          │ OntologyAccess  │
//!          └─────────────────┘
//!                   │
//!      ┌────────────┼─────────────┐
//!      ▼            ▼             ▼
//!  Registry   HierarchyIndex  PropertyIndex
//!      │
//!      ▼
//!  ConceptAlgebra  ──►  KnowledgeBase
//! ```

pub mod errors;
pub mod ontology;
pub mod concept;
pub mod hierarchy;
pub mod kb;

pub use errors::{KbError, Result};
pub use ontology::{
    AssertedOntology, ClassRef, Individual, OntologyAccess, PropertyKind, PropertyRef,
    Materialization, RdfOntology, RdfsMaterializer, SerializationFormat,
};
pub use concept::{AlgebraStats, Concept, ConceptForm, ConceptId, SizeBounds};
pub use hierarchy::{Concepts, HierarchyIndex, PropertyIndex, RoleSelection};
pub use kb::{KbConfig, KbStats, KnowledgeBase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = "evokb.yaml";

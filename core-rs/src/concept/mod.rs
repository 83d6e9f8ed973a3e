//! Concepts - atomic and compound DL class expressions with materialized extensions
//!
//! - registry: canonical atomic concepts (one per named class, plus Top/Bottom)
//! - algebra: interned negation/union/intersection/restriction construction
//! - render: DL string rendering of a concept's form tree

pub mod algebra;
pub mod registry;
pub mod render;

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::ontology::{ClassRef, Individual, PropertyRef};

pub use algebra::{AlgebraStats, ConceptAlgebra, SizeBounds};
pub use registry::ConceptRegistry;

/// Identifies the knowledge base a concept was built by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KbToken(u64);

impl KbToken {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Canonical concept identifier.
///
/// Atomic concepts use the class IRI. Compound concepts use an
/// OWL-functional-style signature over operand ids, with the operands of
/// commutative operators sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConceptId(String);

impl ConceptId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn atomic(class: &ClassRef) -> Self {
        Self(class.iri())
    }

    pub(crate) fn negation(operand: &Concept) -> Self {
        Self(format!("ObjectComplementOf({})", operand.signature_operand()))
    }

    pub(crate) fn union(a: &Concept, b: &Concept) -> Self {
        let (first, second) = Self::sorted(a, b);
        Self(format!("ObjectUnionOf({} {})", first, second))
    }

    pub(crate) fn intersection(a: &Concept, b: &Concept) -> Self {
        let (first, second) = Self::sorted(a, b);
        Self(format!("ObjectIntersectionOf({} {})", first, second))
    }

    pub(crate) fn existential(filler: &Concept, role: &PropertyRef) -> Self {
        Self(format!("ObjectSomeValuesFrom(<{}> {})", role.iri, filler.signature_operand()))
    }

    pub(crate) fn universal(filler: &Concept, role: &PropertyRef) -> Self {
        Self(format!("ObjectAllValuesFrom(<{}> {})", role.iri, filler.signature_operand()))
    }

    fn sorted(a: &Concept, b: &Concept) -> (String, String) {
        let (first, second) = operand_order(a, b);
        (first.signature_operand(), second.signature_operand())
    }
}

impl From<&str> for ConceptId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for ConceptId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structural form of a concept
#[derive(Debug, Clone)]
pub enum ConceptForm {
    /// Named class, including `owl:Thing` (Top) and `owl:Nothing` (Bottom)
    Atomic(ClassRef),
    Negation(Arc<Concept>),
    /// Operands ordered by signature operand, as in the id
    Union(Arc<Concept>, Arc<Concept>),
    /// Operands ordered by signature operand, as in the id
    Intersection(Arc<Concept>, Arc<Concept>),
    ExistentialRestriction { filler: Arc<Concept>, role: PropertyRef },
    UniversalRestriction { filler: Arc<Concept>, role: PropertyRef },
}

impl ConceptForm {
    /// Tag name, as used by renderers
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Atomic(_) => "Atomic",
            Self::Negation(_) => "Negation",
            Self::Union(..) => "Union",
            Self::Intersection(..) => "Intersection",
            Self::ExistentialRestriction { .. } => "ExistentialRestriction",
            Self::UniversalRestriction { .. } => "UniversalRestriction",
        }
    }
}

/// A concept with its materialized instance set.
///
/// Concepts are only created by a knowledge base, which interns them:
/// within one knowledge base, equal ids mean the same `Arc`.
pub struct Concept {
    id: ConceptId,
    form: ConceptForm,
    instances: BTreeSet<Individual>,
    kb: KbToken,
}

impl Concept {
    pub(crate) fn new(
        id: ConceptId,
        form: ConceptForm,
        instances: BTreeSet<Individual>,
        kb: KbToken,
    ) -> Self {
        Self {
            id,
            form,
            instances,
            kb,
        }
    }

    pub(crate) fn atomic(class: ClassRef, instances: BTreeSet<Individual>, kb: KbToken) -> Self {
        Self::new(ConceptId::atomic(&class), ConceptForm::Atomic(class), instances, kb)
    }

    pub fn id(&self) -> &ConceptId {
        &self.id
    }

    pub fn form(&self) -> &ConceptForm {
        &self.form
    }

    pub fn instances(&self) -> &BTreeSet<Individual> {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub(crate) fn kb(&self) -> KbToken {
        self.kb
    }

    /// True for named classes, Top and Bottom
    pub fn is_atomic(&self) -> bool {
        matches!(self.form, ConceptForm::Atomic(_))
    }

    pub fn is_top(&self) -> bool {
        matches!(&self.form, ConceptForm::Atomic(class) if class.is_thing())
    }

    pub fn is_bottom(&self) -> bool {
        matches!(&self.form, ConceptForm::Atomic(class) if class.is_nothing())
    }

    /// Named class of an atomic concept
    pub fn class(&self) -> Option<&ClassRef> {
        match &self.form {
            ConceptForm::Atomic(class) => Some(class),
            _ => None,
        }
    }

    /// Short name: local name for atomic concepts, DL rendering otherwise
    pub fn name(&self) -> String {
        match &self.form {
            ConceptForm::Atomic(class) => class.name.clone(),
            _ => render::to_dl(self),
        }
    }

    /// Class under which this concept is asserted during Abox enrichment
    pub fn enrichment_class(&self) -> ClassRef {
        match &self.form {
            ConceptForm::Atomic(class) => class.clone(),
            _ => ClassRef::new("urn:evokb:concept#", encode_signature(self.id.as_str())),
        }
    }

    fn signature_operand(&self) -> String {
        match &self.form {
            ConceptForm::Atomic(_) => format!("<{}>", self.id),
            _ => self.id.0.clone(),
        }
    }
}

/// Operands of a commutative operator in canonical order
pub(crate) fn operand_order<'a, C: Borrow<Concept>>(a: &'a C, b: &'a C) -> (&'a C, &'a C) {
    let key = |c: &C| <C as Borrow<Concept>>::borrow(c).signature_operand();
    if key(a) <= key(b) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Percent-encode everything outside the IRI-safe ASCII set
fn encode_signature(signature: &str) -> String {
    let mut out = String::with_capacity(signature.len());
    for byte in signature.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.kb == other.kb && self.id == other.id
    }
}

impl Eq for Concept {}

impl Hash for Concept {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kb.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Concept")
            .field("id", &self.id)
            .field("form", &self.form.tag())
            .field("instances", &self.instances.len())
            .finish()
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::to_dl(self))
    }
}

//! DL rendering of concept trees
//!
//! `⊤`, `⊥`, `¬`, `⊔`, `⊓`, `∃ r.C`, `∀ r.C`, with local names for classes
//! and roles. Only the form tree is read.

use super::{Concept, ConceptForm};

pub fn to_dl(concept: &Concept) -> String {
    let mut out = String::new();
    write_concept(concept, &mut out, false);
    out
}

fn write_concept(concept: &Concept, out: &mut String, nested: bool) {
    match concept.form() {
        ConceptForm::Atomic(class) if class.is_thing() => out.push('⊤'),
        ConceptForm::Atomic(class) if class.is_nothing() => out.push('⊥'),
        ConceptForm::Atomic(class) => out.push_str(&class.name),
        ConceptForm::Negation(operand) => {
            out.push('¬');
            write_concept(operand, out, true);
        }
        ConceptForm::Union(left, right) => write_binary(left, "⊔", right, out, nested),
        ConceptForm::Intersection(left, right) => write_binary(left, "⊓", right, out, nested),
        ConceptForm::ExistentialRestriction { filler, role } => {
            write_restriction('∃', role.local_name(), filler, out, nested)
        }
        ConceptForm::UniversalRestriction { filler, role } => {
            write_restriction('∀', role.local_name(), filler, out, nested)
        }
    }
}

fn write_binary(left: &Concept, op: &str, right: &Concept, out: &mut String, nested: bool) {
    if nested {
        out.push('(');
    }
    write_concept(left, out, true);
    out.push(' ');
    out.push_str(op);
    out.push(' ');
    write_concept(right, out, true);
    if nested {
        out.push(')');
    }
}

fn write_restriction(quantifier: char, role: &str, filler: &Concept, out: &mut String, nested: bool) {
    if nested {
        out.push('(');
    }
    out.push(quantifier);
    out.push(' ');
    out.push_str(role);
    out.push('.');
    write_concept(filler, out, true);
    if nested {
        out.push(')');
    }
}

//! RDFS materialization pass
//!
//! Completes type and role assertions before table extraction by running
//! SPARQL UPDATE rules to a fixpoint: sub-property propagation, domain and
//! range typing, and supertype propagation. No subsumption or consistency
//! checking happens here.

use oxigraph::store::Store;
use tracing::{debug, warn};

use super::query::SparqlQuery;
use crate::errors::Result;

/// Outcome of a materialization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Materialization {
    pub added: usize,
    pub rounds: usize,
    /// False when the round limit was hit before a round added nothing
    pub converged: bool,
}

#[derive(Debug, Clone)]
pub struct RdfsMaterializer {
    max_rounds: usize,
}

impl Default for RdfsMaterializer {
    fn default() -> Self {
        Self { max_rounds: 16 }
    }
}

impl RdfsMaterializer {
    fn rules() -> [SparqlQuery; 4] {
        [
            SparqlQuery::materialize_sub_properties(),
            SparqlQuery::materialize_domains(),
            SparqlQuery::materialize_ranges(),
            SparqlQuery::materialize_supertypes(),
        ]
    }

    /// Apply every rule until no new triple appears
    pub fn run(&self, store: &Store) -> Result<Materialization> {
        let initial = store.len()?;
        let mut previous = initial;
        let mut rounds = 0;
        let mut converged = false;

        while rounds < self.max_rounds {
            for rule in Self::rules() {
                store.update(rule.as_str())?;
            }
            let current = store.len()?;
            debug!(round = rounds, added = current - previous, "materialization round");
            rounds += 1;
            if current == previous {
                converged = true;
                break;
            }
            previous = current;
        }

        let added = previous - initial;
        if !converged {
            warn!(rounds, added, "materialization stopped at the round limit before a fixpoint");
        }
        Ok(Materialization {
            added,
            rounds,
            converged,
        })
    }
}

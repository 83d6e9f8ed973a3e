//! Property (role) catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ontology::{OntologyAccess, PropertyRef};

/// Which properties count as "most general" when generating restrictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSelection {
    /// Every property, regardless of the role hierarchy
    #[default]
    Unfiltered,
    /// Only properties without a super-property in the catalog
    MostGeneral,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    all: Vec<PropertyRef>,
    data: Vec<PropertyRef>,
    object: Vec<PropertyRef>,
    annotation: Vec<PropertyRef>,
    most_general: Vec<PropertyRef>,
    selection: RoleSelection,
}

impl PropertyIndex {
    pub fn load<O: OntologyAccess + ?Sized>(ontology: &O, selection: RoleSelection) -> Self {
        let all = ontology.properties();
        let most_general = match selection {
            RoleSelection::Unfiltered => all.clone(),
            RoleSelection::MostGeneral => {
                let known: BTreeSet<&PropertyRef> = all.iter().collect();
                all.iter()
                    .filter(|p| {
                        ontology
                            .super_properties(p)
                            .iter()
                            .all(|sup| sup == *p || !known.contains(sup))
                    })
                    .cloned()
                    .collect()
            }
        };

        Self {
            data: ontology.data_properties(),
            object: ontology.object_properties(),
            annotation: ontology.annotation_properties(),
            all,
            most_general,
            selection,
        }
    }

    pub fn all_properties(&self) -> &[PropertyRef] {
        &self.all
    }

    pub fn data_properties(&self) -> &[PropertyRef] {
        &self.data
    }

    pub fn object_properties(&self) -> &[PropertyRef] {
        &self.object
    }

    pub fn annotation_properties(&self) -> &[PropertyRef] {
        &self.annotation
    }

    pub fn selection(&self) -> RoleSelection {
        self.selection
    }

    /// Properties used to generate the most general restrictions
    pub fn most_general_properties(&self) -> std::slice::Iter<'_, PropertyRef> {
        self.most_general.iter()
    }

    pub fn contains(&self, property: &PropertyRef) -> bool {
        self.all.contains(property)
    }

    pub fn find(&self, iri: &str) -> Option<&PropertyRef> {
        self.all.iter().find(|p| p.iri == iri)
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

//! In-memory Tbox/Abox tables
//!
//! `AssertedOntology` answers every `OntologyAccess` query from asserted
//! axioms alone: ancestry is the transitive closure of asserted
//! `subClassOf` edges, and class membership is closed under it. The RDF
//! loader extracts into this structure; tests build it directly.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

use oxigraph::model::{GraphName, NamedNode, Quad};
use oxigraph::store::Store;

use super::rdf::{vocab, write_store};
use super::{ClassRef, Individual, OntologyAccess, PropertyKind, PropertyRef, SerializationFormat};
use crate::errors::Result;

#[derive(Debug, Clone, Default)]
pub struct AssertedOntology {
    name: String,
    classes: BTreeSet<ClassRef>,
    /// class -> direct asserted superclasses
    parents: BTreeMap<ClassRef, BTreeSet<ClassRef>>,
    /// class -> direct asserted subclasses
    children: BTreeMap<ClassRef, BTreeSet<ClassRef>>,
    individuals: BTreeSet<Individual>,
    types: BTreeMap<Individual, BTreeSet<ClassRef>>,
    properties: Vec<PropertyRef>,
    super_properties: BTreeMap<PropertyRef, BTreeSet<PropertyRef>>,
    /// (subject, property IRI) -> objects
    roles: BTreeMap<(Individual, String), BTreeSet<Individual>>,
}

impl AssertedOntology {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare a named class. `owl:Thing` and `owl:Nothing` are implicit.
    pub fn add_class(&mut self, class: ClassRef) -> &mut Self {
        if !class.is_thing() && !class.is_nothing() {
            self.classes.insert(class);
        }
        self
    }

    /// Assert `sub subClassOf sup`, declaring both classes
    pub fn add_subclass(&mut self, sub: ClassRef, sup: ClassRef) -> &mut Self {
        // Thing is already every class's root; Nothing takes no part in the asserted graph
        if sub == sup || sup.is_thing() || sub.is_nothing() || sub.is_thing() || sup.is_nothing() {
            self.add_class(sub).add_class(sup);
            return self;
        }
        self.add_class(sub.clone()).add_class(sup.clone());
        self.parents.entry(sub.clone()).or_default().insert(sup.clone());
        self.children.entry(sup).or_default().insert(sub);
        self
    }

    pub fn add_individual(&mut self, individual: Individual) -> &mut Self {
        self.individuals.insert(individual);
        self
    }

    /// Assert `individual rdf:type class`, declaring both
    pub fn add_type(&mut self, individual: Individual, class: ClassRef) -> &mut Self {
        self.individuals.insert(individual.clone());
        if class.is_thing() {
            return self;
        }
        self.add_class(class.clone());
        self.types.entry(individual).or_default().insert(class);
        self
    }

    pub fn add_property(&mut self, property: PropertyRef) -> &mut Self {
        if !self.properties.contains(&property) {
            self.properties.push(property);
        }
        self
    }

    pub fn add_sub_property(&mut self, sub: PropertyRef, sup: PropertyRef) -> &mut Self {
        self.add_property(sub.clone()).add_property(sup.clone());
        self.super_properties.entry(sub).or_default().insert(sup);
        self
    }

    /// Assert `property(subject, object)`; both ends become known individuals
    pub fn add_role_assertion(
        &mut self,
        subject: Individual,
        property: &PropertyRef,
        object: Individual,
    ) -> &mut Self {
        self.add_property(property.clone());
        self.individuals.insert(subject.clone());
        self.individuals.insert(object.clone());
        self.roles
            .entry((subject, property.iri.clone()))
            .or_default()
            .insert(object);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Asserted types of an individual (no closure)
    pub fn asserted_types(&self, individual: &Individual) -> BTreeSet<ClassRef> {
        self.types.get(individual).cloned().unwrap_or_default()
    }

    fn properties_of_kind(&self, kind: PropertyKind) -> Vec<PropertyRef> {
        self.properties.iter().filter(|p| p.kind == kind).cloned().collect()
    }

    fn closure(
        edges: &BTreeMap<ClassRef, BTreeSet<ClassRef>>,
        start: &ClassRef,
        include_self: bool,
    ) -> BTreeSet<ClassRef> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&ClassRef> = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for next in edges.get(current).into_iter().flatten() {
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        // a subclass cycle would otherwise list the class among its own ancestors
        seen.remove(start);
        if include_self {
            seen.insert(start.clone());
        }
        seen
    }

    /// Rebuild an RDF graph from the tables
    pub fn to_store(&self) -> Result<Store> {
        let store = Store::new()?;
        let insert = |s: &str, p: &str, o: &str| -> Result<()> {
            store.insert(&Quad::new(
                NamedNode::new(s)?,
                NamedNode::new(p)?,
                NamedNode::new(o)?,
                GraphName::DefaultGraph,
            ))?;
            Ok(())
        };

        for class in &self.classes {
            insert(&class.iri(), vocab::RDF_TYPE, vocab::OWL_CLASS)?;
        }
        for (sub, sups) in &self.parents {
            for sup in sups {
                insert(&sub.iri(), vocab::RDFS_SUB_CLASS_OF, &sup.iri())?;
            }
        }
        for individual in &self.individuals {
            insert(individual.iri(), vocab::RDF_TYPE, vocab::OWL_NAMED_INDIVIDUAL)?;
        }
        for (individual, classes) in &self.types {
            for class in classes {
                insert(individual.iri(), vocab::RDF_TYPE, &class.iri())?;
            }
        }
        for property in &self.properties {
            let kind = match property.kind {
                PropertyKind::Object => vocab::OWL_OBJECT_PROPERTY,
                PropertyKind::Data => vocab::OWL_DATATYPE_PROPERTY,
                PropertyKind::Annotation => vocab::OWL_ANNOTATION_PROPERTY,
            };
            insert(&property.iri, vocab::RDF_TYPE, kind)?;
        }
        for (sub, sups) in &self.super_properties {
            for sup in sups {
                insert(&sub.iri, vocab::RDFS_SUB_PROPERTY_OF, &sup.iri)?;
            }
        }
        for ((subject, property), objects) in &self.roles {
            for object in objects {
                insert(subject.iri(), property, object.iri())?;
            }
        }
        Ok(store)
    }
}

impl OntologyAccess for AssertedOntology {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> Vec<ClassRef> {
        self.classes.iter().cloned().collect()
    }

    fn individuals(&self) -> BTreeSet<Individual> {
        self.individuals.clone()
    }

    fn instances_of(&self, class: &ClassRef) -> BTreeSet<Individual> {
        if class.is_thing() {
            return self.individuals.clone();
        }
        if class.is_nothing() {
            return BTreeSet::new();
        }
        let members = self.descendants(class, true);
        self.types
            .iter()
            .filter(|(_, asserted)| asserted.iter().any(|c| members.contains(c)))
            .map(|(individual, _)| individual.clone())
            .collect()
    }

    fn ancestors(&self, class: &ClassRef, include_self: bool) -> BTreeSet<ClassRef> {
        let mut result = if class.is_thing() {
            BTreeSet::new()
        } else if class.is_nothing() {
            BTreeSet::from([ClassRef::thing()])
        } else {
            let mut named = Self::closure(&self.parents, class, false);
            named.insert(ClassRef::thing());
            named
        };
        if include_self {
            result.insert(class.clone());
        }
        result
    }

    fn descendants(&self, class: &ClassRef, include_self: bool) -> BTreeSet<ClassRef> {
        if class.is_thing() {
            let mut all: BTreeSet<ClassRef> = self.classes.clone();
            if include_self {
                all.insert(class.clone());
            }
            return all;
        }
        if class.is_nothing() {
            return if include_self { BTreeSet::from([class.clone()]) } else { BTreeSet::new() };
        }
        Self::closure(&self.children, class, include_self)
    }

    fn subclasses(&self, class: &ClassRef) -> BTreeSet<ClassRef> {
        if class.is_thing() {
            // roots: named classes with no named superclass
            return self
                .classes
                .iter()
                .filter(|c| self.parents.get(*c).map_or(true, |p| p.is_empty()))
                .cloned()
                .collect();
        }
        self.children.get(class).cloned().unwrap_or_default()
    }

    fn data_properties(&self) -> Vec<PropertyRef> {
        self.properties_of_kind(PropertyKind::Data)
    }

    fn object_properties(&self) -> Vec<PropertyRef> {
        self.properties_of_kind(PropertyKind::Object)
    }

    fn annotation_properties(&self) -> Vec<PropertyRef> {
        self.properties_of_kind(PropertyKind::Annotation)
    }

    fn super_properties(&self, property: &PropertyRef) -> BTreeSet<PropertyRef> {
        self.super_properties.get(property).cloned().unwrap_or_default()
    }

    fn role_fillers(&self, individual: &Individual, property: &PropertyRef) -> BTreeSet<Individual> {
        self.roles
            .get(&(individual.clone(), property.iri.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn assert_type(&mut self, individual: &Individual, class: &ClassRef) -> Result<()> {
        self.add_type(individual.clone(), class.clone());
        Ok(())
    }

    fn save(&self, path: &Path, format: SerializationFormat) -> Result<()> {
        let store = self.to_store()?;
        write_store(&store, path, format)
    }
}

/**
 * rdf.rs
 * Oxigraph-backed ontology: loads RDF, extracts asserted tables, saves back
 */

use oxigraph::model::{GraphName, GraphNameRef, NamedNode, Quad, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::asserted::AssertedOntology;
use super::query::SparqlQuery;
use super::reasoner::RdfsMaterializer;
use super::{ClassRef, Individual, OntologyAccess, PropertyKind, PropertyRef, SerializationFormat};
use crate::errors::{KbError, Result};

pub mod vocab {
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const RDFS_SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
}

/// Serialize the default graph of `store` to `path`
pub(crate) fn write_store(store: &Store, path: &Path, format: SerializationFormat) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = store
        .dump_graph_to_writer(GraphNameRef::DefaultGraph, format.rdf_format(), BufWriter::new(file))
        .map_err(|e| KbError::Store(format!("Failed to serialize {}: {}", path.display(), e)))?;
    writer.flush()?;
    Ok(())
}

/// Run a SELECT query, keeping only IRI bindings
pub fn select_iris(store: &Store, query: &SparqlQuery) -> Result<Vec<HashMap<String, String>>> {
    match store.query(query.as_str())? {
        QueryResults::Solutions(solutions) => {
            let mut rows = Vec::new();
            for solution in solutions {
                let solution = solution?;
                let mut row = HashMap::new();
                for (var, term) in solution.iter() {
                    if let Term::NamedNode(node) = term {
                        row.insert(var.as_str().to_string(), node.as_str().to_string());
                    }
                }
                rows.push(row);
            }
            Ok(rows)
        }
        QueryResults::Boolean(_) | QueryResults::Graph(_) => Err(KbError::Query(
            "Expected SELECT solutions".to_string(),
        )),
    }
}

fn column(rows: &[HashMap<String, String>], var: &str) -> Vec<String> {
    rows.iter().filter_map(|row| row.get(var).cloned()).collect()
}

/// Ontology loaded from an RDF document into an Oxigraph store.
///
/// Queries are answered from tables extracted once at load time; the store
/// is kept so enrichment can be written back by `save`.
pub struct RdfOntology {
    store: Store,
    tables: AssertedOntology,
    source: Option<PathBuf>,
}

impl RdfOntology {
    /// Load an ontology file; the format is taken from the extension unless given
    pub fn load(
        path: impl AsRef<Path>,
        format: Option<SerializationFormat>,
        materialize: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| KbError::OntologyLoad {
            path: path.display().to_string(),
            reason,
        };

        if !path.exists() {
            return Err(KbError::FileNotFound(path.display().to_string()));
        }
        if path.is_dir() {
            return Err(load_error("path is a directory".to_string()));
        }

        let format = format
            .or_else(|| SerializationFormat::from_path(path))
            .ok_or_else(|| load_error("cannot infer RDF format from extension".to_string()))?;

        info!(path = %path.display(), ?format, "loading ontology");
        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut ontology = Self::from_reader(name, file, format, materialize)
            .map_err(|e| match e {
                KbError::RdfParse(reason) => load_error(reason),
                other => other,
            })?;
        ontology.source = Some(path.to_path_buf());
        Ok(ontology)
    }

    /// Parse an RDF document from any reader
    pub fn from_reader(
        name: impl Into<String>,
        reader: impl Read,
        format: SerializationFormat,
        materialize: bool,
    ) -> Result<Self> {
        let store = Store::new()?;
        store
            .load_from_reader(format.rdf_format(), reader)
            .map_err(|e| KbError::RdfParse(e.to_string()))?;

        if materialize {
            let report = RdfsMaterializer::default().run(&store)?;
            info!(added = report.added, rounds = report.rounds, "materialized inferred assertions");
        }

        let tables = Self::extract(&store, name.into())?;
        Ok(Self {
            store,
            tables,
            source: None,
        })
    }

    /// Parse an RDF document held in a string
    pub fn from_text(
        name: impl Into<String>,
        content: &str,
        format: SerializationFormat,
        materialize: bool,
    ) -> Result<Self> {
        Self::from_reader(name, content.as_bytes(), format, materialize)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn extract(store: &Store, fallback_name: String) -> Result<AssertedOntology> {
        let name = column(&select_iris(store, &SparqlQuery::ontology_iri())?, "ontology")
            .into_iter()
            .next()
            .map(|iri| ClassRef::from_iri(iri.trim_end_matches(['#', '/'])).name)
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback_name);

        let mut tables = AssertedOntology::new(name);

        for iri in column(&select_iris(store, &SparqlQuery::named_classes())?, "class") {
            tables.add_class(ClassRef::from_iri(&iri));
        }
        for row in select_iris(store, &SparqlQuery::subclass_axioms())? {
            if let (Some(sub), Some(sup)) = (row.get("sub"), row.get("sup")) {
                tables.add_subclass(ClassRef::from_iri(sub), ClassRef::from_iri(sup));
            }
        }
        for iri in column(&select_iris(store, &SparqlQuery::named_individuals())?, "individual") {
            tables.add_individual(Individual::new(iri));
        }
        // classes may be known only from subClassOf, so filter in memory
        let known: BTreeSet<ClassRef> = tables.classes().into_iter().collect();
        for row in select_iris(store, &SparqlQuery::type_assertions())? {
            if let (Some(individual), Some(class)) = (row.get("individual"), row.get("class")) {
                let class = ClassRef::from_iri(class);
                if class.is_thing() || known.contains(&class) {
                    tables.add_type(Individual::new(individual.as_str()), class);
                }
            }
        }

        let kinds = [
            ("owl:ObjectProperty", PropertyKind::Object),
            ("owl:DatatypeProperty", PropertyKind::Data),
            ("owl:AnnotationProperty", PropertyKind::Annotation),
        ];
        let mut declared: HashMap<String, PropertyRef> = HashMap::new();
        for (owl_type, kind) in kinds {
            for iri in column(&select_iris(store, &SparqlQuery::properties_of_type(owl_type))?, "property") {
                let property = PropertyRef::new(iri.clone(), kind);
                declared.entry(iri).or_insert_with(|| property.clone());
                tables.add_property(property);
            }
        }
        for row in select_iris(store, &SparqlQuery::sub_property_axioms())? {
            if let (Some(sub), Some(sup)) = (
                row.get("sub").and_then(|iri| declared.get(iri)),
                row.get("sup").and_then(|iri| declared.get(iri)),
            ) {
                tables.add_sub_property(sub.clone(), sup.clone());
            }
        }
        for row in select_iris(store, &SparqlQuery::role_assertions())? {
            if let (Some(subject), Some(property), Some(object)) =
                (row.get("subject"), row.get("property"), row.get("object"))
            {
                if let Some(property) = declared.get(property) {
                    tables.add_role_assertion(
                        Individual::new(subject.as_str()),
                        property,
                        Individual::new(object.as_str()),
                    );
                }
            }
        }

        debug!(
            classes = tables.classes().len(),
            individuals = tables.individuals().len(),
            properties = tables.properties().len(),
            "extracted ontology tables"
        );
        Ok(tables)
    }
}

impl OntologyAccess for RdfOntology {
    fn name(&self) -> &str {
        self.tables.name()
    }

    fn classes(&self) -> Vec<ClassRef> {
        self.tables.classes()
    }

    fn individuals(&self) -> BTreeSet<Individual> {
        self.tables.individuals()
    }

    fn instances_of(&self, class: &ClassRef) -> BTreeSet<Individual> {
        self.tables.instances_of(class)
    }

    fn ancestors(&self, class: &ClassRef, include_self: bool) -> BTreeSet<ClassRef> {
        self.tables.ancestors(class, include_self)
    }

    fn descendants(&self, class: &ClassRef, include_self: bool) -> BTreeSet<ClassRef> {
        self.tables.descendants(class, include_self)
    }

    fn subclasses(&self, class: &ClassRef) -> BTreeSet<ClassRef> {
        self.tables.subclasses(class)
    }

    fn data_properties(&self) -> Vec<PropertyRef> {
        self.tables.data_properties()
    }

    fn object_properties(&self) -> Vec<PropertyRef> {
        self.tables.object_properties()
    }

    fn annotation_properties(&self) -> Vec<PropertyRef> {
        self.tables.annotation_properties()
    }

    fn super_properties(&self, property: &PropertyRef) -> BTreeSet<PropertyRef> {
        self.tables.super_properties(property)
    }

    fn role_fillers(&self, individual: &Individual, property: &PropertyRef) -> BTreeSet<Individual> {
        self.tables.role_fillers(individual, property)
    }

    fn assert_type(&mut self, individual: &Individual, class: &ClassRef) -> Result<()> {
        let rdf_type = NamedNode::new(vocab::RDF_TYPE)?;
        let class_node = NamedNode::new(class.iri())?;
        // declared so the assertion survives save and reload
        self.store.insert(&Quad::new(
            class_node.clone(),
            rdf_type.clone(),
            NamedNode::new(vocab::OWL_CLASS)?,
            GraphName::DefaultGraph,
        ))?;
        self.store.insert(&Quad::new(
            NamedNode::new(individual.iri())?,
            rdf_type,
            class_node,
            GraphName::DefaultGraph,
        ))?;
        self.tables.assert_type(individual, class)
    }

    fn save(&self, path: &Path, format: SerializationFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), ?format, "saving ontology");
        write_store(&self.store, path, format)
    }
}

//! evokb - knowledge base CLI
//!
//! Loads an ontology and inspects the concept hierarchy and concept algebra

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use evokb_core::{
    Concept, KbConfig, KbStats, KnowledgeBase, SerializationFormat, DEFAULT_CONFIG_FILE, VERSION,
};

#[derive(Parser)]
#[command(name = "evokb")]
#[command(version = VERSION)]
#[command(about = "Description logic knowledge base for concept learning", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./evokb.yaml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show knowledge base statistics
    Stats {
        /// Ontology file (.owl, .rdf, .ttl, .nt)
        ontology: PathBuf,
    },
    /// Show parents, ancestors, sub-concepts and leaves of a class
    Hierarchy {
        ontology: PathBuf,
        /// Class local name or IRI
        class: String,
    },
    /// Show refinements of a class: negation and most general restrictions
    Refine {
        ontology: PathBuf,
        /// Class local name or IRI
        class: String,
    },
    /// Assert a class (or its negation) on its instances and save the result
    Enrich {
        ontology: PathBuf,
        /// Class local name or IRI
        class: String,
        /// Enrich with the negation of the class instead
        #[arg(long)]
        negate: bool,
        /// Output file
        #[arg(long, short)]
        output: PathBuf,
        /// Output serialization (guessed from the output extension otherwise)
        #[arg(long)]
        output_format: Option<String>,
    },
}

#[derive(Serialize)]
struct ConceptRow {
    name: String,
    id: String,
    size: usize,
    viable: bool,
}

impl ConceptRow {
    fn new(kb: &KnowledgeBase, concept: &Arc<Concept>) -> Self {
        Self {
            name: concept.to_string(),
            id: concept.id().to_string(),
            size: concept.len(),
            viable: kb.is_viable(concept),
        }
    }
}

#[derive(Serialize)]
struct HierarchyReport {
    concept: ConceptRow,
    direct_parents: Vec<ConceptRow>,
    all_ancestors: Vec<ConceptRow>,
    direct_sub_concepts: Vec<ConceptRow>,
    all_sub_concepts: Vec<ConceptRow>,
    leaf_concepts: Vec<ConceptRow>,
}

#[derive(Serialize)]
struct RefineReport {
    concept: ConceptRow,
    negation: ConceptRow,
    existential: Vec<ConceptRow>,
    universal: Vec<ConceptRow>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Stats { ontology } => {
            let kb = open(&ontology, config)?;
            handle_stats(&kb.stats(), cli.format)?;
        }
        Commands::Hierarchy { ontology, class } => {
            let kb = open(&ontology, config)?;
            handle_hierarchy(&kb, &class, cli.format)?;
        }
        Commands::Refine { ontology, class } => {
            let mut kb = open(&ontology, config)?;
            handle_refine(&mut kb, &class, cli.format)?;
        }
        Commands::Enrich { ontology, class, negate, output, output_format } => {
            let mut kb = open(&ontology, config)?;
            handle_enrich(&mut kb, &class, negate, &output, output_format.as_deref())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<KbConfig> {
    match path {
        Some(path) => KbConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Ok(KbConfig::load(DEFAULT_CONFIG_FILE)?)
        }
        None => Ok(KbConfig::default()),
    }
}

fn open(path: &Path, config: KbConfig) -> anyhow::Result<KnowledgeBase> {
    KnowledgeBase::load(path, config)
        .with_context(|| format!("Failed to build knowledge base from {}", path.display()))
}

/// Resolve a class by IRI first, then by local name
fn resolve(kb: &KnowledgeBase, class: &str) -> anyhow::Result<Arc<Concept>> {
    kb.concept(class)
        .or_else(|| kb.concept_by_name(class))
        .cloned()
        .ok_or_else(|| anyhow!("Class not found: {}", class))
}

fn rows<'a>(kb: &KnowledgeBase, concepts: impl Iterator<Item = &'a Arc<Concept>>) -> Vec<ConceptRow> {
    concepts.map(|c| ConceptRow::new(kb, c)).collect()
}

/// Handle `evokb stats <ontology>`
fn handle_stats(stats: &KbStats, format: OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("\n{}", stats.name.bold());
    println!("{}", "-".repeat(40));
    println!("{:<24} {}", "Atomic concepts", stats.atomic_concepts);
    println!("{:<24} {}", "Individuals", stats.individuals);
    println!("{:<24} {}", "Properties", stats.properties);
    println!("{:<24} {}", "Subsumptions", stats.subsumptions);
    println!("{:<24} {}", "Min concept size", stats.min_size_of_concept);
    println!("{:<24} {}", "Max concept size", stats.max_size_of_concept);
    if stats.top_repairs > 0 {
        println!("{:<24} {}", "Top repairs", stats.top_repairs.to_string().yellow());
    }
    println!();
    Ok(())
}

/// Handle `evokb hierarchy <ontology> <class>`
fn handle_hierarchy(kb: &KnowledgeBase, class: &str, format: OutputFormat) -> anyhow::Result<()> {
    let concept = resolve(kb, class)?;
    let report = HierarchyReport {
        concept: ConceptRow::new(kb, &concept),
        direct_parents: rows(kb, kb.direct_parents(&concept)?),
        all_ancestors: rows(kb, kb.all_ancestors(&concept)?),
        direct_sub_concepts: rows(kb, kb.direct_sub_concepts(&concept)?),
        all_sub_concepts: rows(kb, kb.all_sub_concepts(&concept)?),
        leaf_concepts: rows(kb, kb.leaf_concepts(&concept)?),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            print_heading(&report.concept);
            print_table("DIRECT PARENTS", &report.direct_parents);
            print_table("ALL ANCESTORS", &report.all_ancestors);
            print_table("DIRECT SUB-CONCEPTS", &report.direct_sub_concepts);
            print_table("ALL SUB-CONCEPTS", &report.all_sub_concepts);
            print_table("LEAVES", &report.leaf_concepts);
        }
    }
    Ok(())
}

/// Handle `evokb refine <ontology> <class>`
fn handle_refine(kb: &mut KnowledgeBase, class: &str, format: OutputFormat) -> anyhow::Result<()> {
    let concept = resolve(kb, class)?;
    let negation = kb.negation(&concept)?;
    let existential = kb.most_general_existential_restrictions(&concept)?;
    let universal = kb.most_general_universal_restrictions(&concept)?;

    let report = RefineReport {
        concept: ConceptRow::new(kb, &concept),
        negation: ConceptRow::new(kb, &negation),
        existential: rows(kb, existential.iter()),
        universal: rows(kb, universal.iter()),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            print_heading(&report.concept);
            print_table("NEGATION", std::slice::from_ref(&report.negation));
            print_table("EXISTENTIAL", &report.existential);
            print_table("UNIVERSAL", &report.universal);
        }
    }
    Ok(())
}

/// Handle `evokb enrich <ontology> <class> --output <path>`
fn handle_enrich(
    kb: &mut KnowledgeBase,
    class: &str,
    negate: bool,
    output: &Path,
    output_format: Option<&str>,
) -> anyhow::Result<()> {
    let mut concept = resolve(kb, class)?;
    if negate {
        concept = kb.negation(&concept)?;
    }

    let format = match output_format {
        Some(name) => name.parse::<SerializationFormat>()?,
        None => SerializationFormat::from_path(output).unwrap_or_default(),
    };

    let asserted = kb.apply_type_enrichment(&concept)?;
    kb.save(output, format)?;

    println!("\n{} Enriched {} individuals with {}", "✓".green(), asserted, concept);
    println!("  Class: {}", concept.enrichment_class());
    println!("  Output: {} ({:?})", output.display(), format);
    println!();
    Ok(())
}

fn print_heading(concept: &ConceptRow) {
    println!("\n{} ({} instances)", concept.name.bold(), concept.size);
    println!("  {}", concept.id.dimmed());
}

fn print_table(title: &str, rows: &[ConceptRow]) {
    println!("\n{}", title.bold());
    if rows.is_empty() {
        println!("  (none)");
        return;
    }

    println!("{:<48} {:<8} {:<8}", "CONCEPT", "SIZE", "VIABLE");
    println!("{}", "-".repeat(66));
    for row in rows {
        let viable = if row.viable { "yes".green() } else { "no".red() };
        println!("{:<48} {:<8} {:<8}", row.name, row.size, viable);
    }
}

//! Satyacheck CLI
//!
//! Command-line entry points for:
//! - Extracting subject/predicate/object triples from Sinhala text
//! - Scoring an article's credibility against the trusted news ontology
//! - Running the full verification pipeline through the remote services
//! - Inspecting and populating the trusted news ontology

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use satyacheck_nlp::{EntityCollection, EntityExtractor, FailurePolicy, TripleObject};
use satyacheck_ontology::NewsArticleRecord;
use satyacheck_scoring::{ArticleInput, CredibilityScorer, ScorerOptions};
use satyacheck_services::{ServiceClients, ServiceConfig, ServiceOverrides};

mod pipeline;
mod resources;

use pipeline::{Collaborators, VerifyOutcome, VerifyPipeline, VerifyRequest};
use resources::{NlpArgs, OntologyArgs, PreprocessArgs};

#[derive(Parser)]
#[command(name = "satyacheck")]
#[command(author, version, about = "Satyacheck: Sinhala news credibility checking")]
struct Cli {
    /// Debug-level logging (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a triple from one Sinhala sentence.
    Extract {
        /// Text to analyze (reads --input or stdin when omitted)
        text: Option<String>,

        #[arg(long)]
        input: Option<PathBuf>,

        /// Entity lists as JSON (`{"persons": [...], ...}`)
        #[arg(long, conflicts_with = "ner")]
        entities: Option<PathBuf>,

        /// Ask the NER service for entities
        #[arg(long)]
        ner: bool,

        /// Print the full extraction as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        nlp: NlpArgs,

        #[command(flatten)]
        services: ServiceArgs,
    },

    /// Score an article (JSON `{content, category, subcategory, persons, ..., source}`).
    Score {
        input: PathBuf,

        /// Fail instead of scoring 0.0 when the similarity service is down
        #[arg(long)]
        strict_similarity: bool,

        #[command(flatten)]
        ontology: OntologyArgs,

        #[command(flatten)]
        services: ServiceArgs,
    },

    /// Run the full verification pipeline on raw text.
    Verify {
        /// Text to verify (reads --input or stdin when omitted)
        text: Option<String>,

        #[arg(long)]
        input: Option<PathBuf>,

        /// Publisher of the text
        #[arg(long, default_value = "")]
        source: String,

        /// Do not ask the news detector first
        #[arg(long)]
        skip_news_check: bool,

        /// What to do when the NER service fails
        #[arg(long, value_enum, default_value_t = PolicyArg::Propagate)]
        entity_policy: PolicyArg,

        /// What to do when the similarity service fails
        #[arg(long, value_enum, default_value_t = PolicyArg::Degrade)]
        similarity_policy: PolicyArg,

        #[command(flatten)]
        nlp: NlpArgs,

        #[command(flatten)]
        preprocess: PreprocessArgs,

        #[command(flatten)]
        ontology: OntologyArgs,

        #[command(flatten)]
        services: ServiceArgs,
    },

    /// Inspect or extend the trusted news ontology.
    Ontology {
        #[command(subcommand)]
        command: OntologyCommands,
    },
}

#[derive(Subcommand)]
enum OntologyCommands {
    /// Print statement, article, publisher, category and entity counts.
    Stats {
        #[command(flatten)]
        ontology: OntologyArgs,
    },

    /// Add articles from a JSON array and write the result as N-Triples.
    Populate {
        /// JSON array of articles
        records: PathBuf,

        /// Output N-Triples file
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        ontology: OntologyArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct ServiceArgs {
    #[arg(long)]
    ner_url: Option<String>,

    #[arg(long)]
    similarity_url: Option<String>,

    #[arg(long)]
    classifier_url: Option<String>,

    #[arg(long)]
    news_detector_url: Option<String>,

    /// HTTP timeout in seconds (0 disables)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl ServiceArgs {
    fn clients(&self) -> Result<ServiceClients> {
        let config = ServiceConfig::resolve(&ServiceOverrides {
            ner_url: self.ner_url.clone(),
            similarity_url: self.similarity_url.clone(),
            classifier_url: self.classifier_url.clone(),
            news_detector_url: self.news_detector_url.clone(),
            timeout_secs: self.timeout_secs,
        })?;
        tracing::debug!(?config, "service configuration");
        Ok(ServiceClients::new(&config)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Propagate,
    Degrade,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Propagate => FailurePolicy::Propagate,
            PolicyArg::Degrade => FailurePolicy::Degrade,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            text,
            input,
            entities,
            ner,
            json,
            nlp,
            services,
        } => cmd_extract(text, input.as_ref(), entities.as_ref(), ner, json, &nlp, &services),
        Commands::Score {
            input,
            strict_similarity,
            ontology,
            services,
        } => cmd_score(&input, strict_similarity, &ontology, &services),
        Commands::Verify {
            text,
            input,
            source,
            skip_news_check,
            entity_policy,
            similarity_policy,
            nlp,
            preprocess,
            ontology,
            services,
        } => {
            let request = VerifyRequest {
                text: read_text(text, input.as_ref())?,
                source,
                check_news: !skip_news_check,
            };
            cmd_verify(
                &request,
                entity_policy.into(),
                similarity_policy.into(),
                &nlp,
                &preprocess,
                &ontology,
                &services,
            )
        }
        Commands::Ontology { command } => match command {
            OntologyCommands::Stats { ontology } => cmd_ontology_stats(&ontology),
            OntologyCommands::Populate {
                records,
                out,
                ontology,
            } => cmd_ontology_populate(&records, &out, &ontology),
        },
    }
}

/// Positional text, else `--input`, else stdin.
fn read_text(text: Option<String>, input: Option<&PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = input {
        return fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read text from stdin")?;
    Ok(buf)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn cmd_extract(
    text: Option<String>,
    input: Option<&PathBuf>,
    entities_path: Option<&PathBuf>,
    use_ner: bool,
    json: bool,
    nlp: &NlpArgs,
    services: &ServiceArgs,
) -> Result<()> {
    let text = read_text(text, input)?;
    let extractor = nlp.load_extractor()?;
    let entities: EntityCollection = match (entities_path, use_ner) {
        (Some(path), _) => read_json(path)?,
        (None, true) => services.clients()?.ner.extract_entities(&text)?,
        (None, false) => EntityCollection::default(),
    };

    let result = extractor.extract(&text, &entities);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} {}", "Extracting".green().bold(), text.trim());
    println!("  {} {}", "tree".yellow(), result.chunk_tree);
    if result.triples.is_empty() {
        println!("  {} no triple (no verb phrase found)", "→".cyan());
    }
    for triple in &result.triples {
        println!("  {} subject:   {}", "→".cyan(), triple.subject.bold());
        println!("  {} predicate: {}", "→".cyan(), triple.predicate.bold());
        match &triple.object {
            TripleObject::Text(object) => println!("  {} object:    {}", "→".cyan(), object.bold()),
            TripleObject::Clause(clause) => {
                println!("  {} object:    {}", "→".cyan(), clause.content_text.bold());
                println!(
                    "      inner: ({}, {}, {})",
                    clause.inner_subject, clause.inner_verb, clause.inner_object
                );
            }
        }
    }
    Ok(())
}

fn cmd_score(
    input: &PathBuf,
    strict_similarity: bool,
    ontology: &OntologyArgs,
    services: &ServiceArgs,
) -> Result<()> {
    let article: ArticleInput = read_json(input)?;
    let store = ontology.load()?;
    let clients = services.clients()?;
    let options = ScorerOptions {
        similarity_policy: if strict_similarity {
            FailurePolicy::Propagate
        } else {
            FailurePolicy::Degrade
        },
    };
    let report = CredibilityScorer::new(&store, &clients.similarity)
        .with_options(options)
        .score(&article)?;
    eprintln!(
        "{} {} ({:.3})",
        "Verdict".green().bold(),
        report.result.to_string().bold(),
        report.final_score
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_verify(
    request: &VerifyRequest,
    entity_policy: FailurePolicy,
    similarity_policy: FailurePolicy,
    nlp: &NlpArgs,
    preprocess: &PreprocessArgs,
    ontology: &OntologyArgs,
    services: &ServiceArgs,
) -> Result<()> {
    if request.text.trim().is_empty() {
        return Err(anyhow!("nothing to verify: the text is empty"));
    }
    let preprocessor = preprocess.load()?;
    let extractor = nlp.load_extractor()?;
    let store = ontology.load()?;
    let clients = services.clients()?;

    let pipeline = VerifyPipeline {
        preprocessor: &preprocessor,
        extractor: &extractor,
        services: Collaborators {
            detector: &clients.detector,
            classifier: &clients.classifier,
            ner: &clients.ner,
            store: &store,
            similarity: &clients.similarity,
        },
        entity_policy,
        scorer_options: ScorerOptions { similarity_policy },
    };
    let outcome = pipeline.verify(request)?;
    match &outcome {
        VerifyOutcome::NotNews { .. } => {
            eprintln!("{} the text is not recognized as news", "Rejected".yellow().bold());
        }
        VerifyOutcome::Unclassified { .. } => {
            eprintln!(
                "{} could not determine category or subcategory",
                "Rejected".yellow().bold()
            );
        }
        VerifyOutcome::Verified(report) => {
            eprintln!(
                "{} {} ({:.3})",
                "Verdict".green().bold(),
                report.credibility.result.to_string().bold(),
                report.credibility.final_score
            );
        }
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn cmd_ontology_stats(ontology: &OntologyArgs) -> Result<()> {
    let store = ontology.load()?;
    let stats = store.stats();
    println!("{} {}", "Ontology".green().bold(), ontology.ontology.display());
    println!("  {} statements: {}", "→".cyan(), stats.statements);
    println!("  {} articles:   {}", "→".cyan(), stats.articles);
    println!("  {} publishers: {}", "→".cyan(), stats.publishers);
    println!("  {} categories: {}", "→".cyan(), stats.categories);
    println!("  {} entities:   {}", "→".cyan(), stats.entities);
    Ok(())
}

fn cmd_ontology_populate(records_path: &PathBuf, out: &PathBuf, ontology: &OntologyArgs) -> Result<()> {
    let records: Vec<NewsArticleRecord> = read_json(records_path)?;
    println!(
        "{} {} articles into {}",
        "Populating".green().bold(),
        records.len(),
        ontology.ontology.display()
    );
    let mut store = ontology.load()?;
    let report = store.populate(&records);
    for error in &report.errors {
        println!("  {} {}", "✗".red(), error);
    }
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    store.save_ntriples(out)?;
    println!(
        "  {} {} added, {} failed",
        "→".yellow(),
        report.successful,
        report.failed
    );
    println!("  {} {}", "→".cyan(), out.display());
    Ok(())
}

//! Static resources loaded once at startup.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use satyacheck_nlp::{
    ChunkGrammar, PosLexicon, PreprocessorResources, SinhalaPreprocessor, TripleExtractor,
};
use satyacheck_ontology::OntologyStore;

pub const DEFAULT_LEXICON: &str = "data/sinhala_pos.txt";
pub const DEFAULT_STOPWORDS: &str = "data/stopwords.txt";
pub const DEFAULT_STEMS: &str = "data/stem_dictionary.txt";
pub const DEFAULT_ONTOLOGY: &str = "data/trusted_news.ttl";

#[derive(Args, Debug, Clone)]
pub struct NlpArgs {
    /// POS dictionary (`word tag` per line)
    #[arg(long, default_value = DEFAULT_LEXICON)]
    pub lexicon: PathBuf,

    /// Chunk grammar file (defaults to the built-in Sinhala grammar)
    #[arg(long)]
    pub grammar: Option<PathBuf>,
}

impl NlpArgs {
    pub fn load_extractor(&self) -> Result<TripleExtractor> {
        let lexicon = PosLexicon::from_path(&self.lexicon)?;
        let grammar = match &self.grammar {
            Some(path) => ChunkGrammar::from_path(path)?,
            None => ChunkGrammar::sinhala().context("built-in grammar failed to parse")?,
        };
        tracing::debug!(rules = grammar.rules().len(), "chunk grammar ready");
        Ok(TripleExtractor::new(lexicon, grammar))
    }
}

#[derive(Args, Debug, Clone)]
pub struct PreprocessArgs {
    #[arg(long, default_value = DEFAULT_STOPWORDS)]
    pub stopwords: PathBuf,

    #[arg(long, default_value = DEFAULT_STEMS)]
    pub stems: PathBuf,
}

impl PreprocessArgs {
    pub fn load(&self) -> Result<SinhalaPreprocessor> {
        let resources = PreprocessorResources::load(&self.stopwords, &self.stems);
        Ok(SinhalaPreprocessor::new(resources)?)
    }
}

#[derive(Args, Debug, Clone)]
pub struct OntologyArgs {
    /// Trusted news ontology (.ttl, .nt, .rdf/.owl)
    #[arg(long, default_value = DEFAULT_ONTOLOGY)]
    pub ontology: PathBuf,
}

impl OntologyArgs {
    pub fn load(&self) -> Result<OntologyStore> {
        OntologyStore::from_path(&self.ontology)
    }
}

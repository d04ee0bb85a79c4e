//! Dictionary-backed POS lookup.
//!
//! The dictionary is a whitespace-separated `word tag` file, one entry per
//! line, `#` comments allowed. Lookups are exact string matches; anything not
//! in the table is tagged `UNK`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::tags::{Tag, TaggedToken};

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("failed to read POS dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Exact-match token → tag table.
#[derive(Debug, Clone, Default)]
pub struct PosLexicon {
    entries: HashMap<String, Tag>,
}

impl PosLexicon {
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::parse(&text);
        tracing::info!(path = %path.display(), entries = lexicon.len(), "loaded POS dictionary");
        Ok(lexicon)
    }

    /// Parse dictionary text. Lines with fewer than two fields are skipped;
    /// a repeated word keeps its last tag.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(word), Some(tag)) = (parts.next(), parts.next()) else {
                continue;
            };
            entries.insert(word.to_string(), Tag::new(tag));
        }
        Self { entries }
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(w, t)| (w.to_string(), Tag::new(t)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, token: &str) -> Tag {
        self.entries.get(token).cloned().unwrap_or_else(Tag::unknown)
    }

    /// Tag whitespace-separated text.
    pub fn tag_text(&self, text: &str) -> Vec<TaggedToken> {
        text.split_whitespace()
            .map(|word| TaggedToken {
                text: word.to_string(),
                tag: self.lookup(word),
            })
            .collect()
    }
}

//! Sinhala text cleanup ahead of tagging and scoring.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Stop words and stem dictionary.
#[derive(Debug, Clone, Default)]
pub struct PreprocessorResources {
    pub stopwords: HashSet<String>,
    pub stems: HashMap<String, String>,
}

impl PreprocessorResources {
    /// Load both resources. A file that cannot be read yields an empty table
    /// and a warning; preprocessing then skips the corresponding step.
    pub fn load(stopwords_path: &Path, stems_path: &Path) -> Self {
        let stopwords = match std::fs::read_to_string(stopwords_path) {
            Ok(text) => parse_stopwords(&text),
            Err(err) => {
                tracing::warn!(path = %stopwords_path.display(), error = %err, "stop words not loaded");
                HashSet::new()
            }
        };
        let stems = match std::fs::read_to_string(stems_path) {
            Ok(text) => parse_stems(&text),
            Err(err) => {
                tracing::warn!(path = %stems_path.display(), error = %err, "stem dictionary not loaded");
                HashMap::new()
            }
        };
        tracing::info!(
            stopwords = stopwords.len(),
            stems = stems.len(),
            "preprocessor resources loaded"
        );
        Self { stopwords, stems }
    }
}

/// One word per line.
pub fn parse_stopwords(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// `word<TAB>stem` per line; other lines are ignored.
pub fn parse_stems(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.trim().split('\t').collect();
            match parts.as_slice() {
                [word, stem] => Some((word.to_string(), stem.to_string())),
                _ => None,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub remove_urls: bool,
    pub remove_emojis: bool,
    pub remove_non_sinhala: bool,
    pub remove_numbers: bool,
    pub remove_punctuation: bool,
    pub remove_stopwords: bool,
    pub apply_stemming: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            remove_urls: true,
            remove_emojis: true,
            remove_non_sinhala: true,
            remove_numbers: false,
            remove_punctuation: true,
            remove_stopwords: true,
            apply_stemming: false,
        }
    }
}

impl PreprocessOptions {
    /// Light cleanup for text that still goes to NER and tagging: stop words
    /// are kept so the sentence structure survives.
    pub fn for_extraction() -> Self {
        Self {
            remove_stopwords: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("invalid preprocessing pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone)]
struct Patterns {
    url: Regex,
    emoji: Regex,
    non_sinhala: Regex,
    non_sinhala_or_digit: Regex,
    digits: Regex,
    punctuation: Regex,
    whitespace: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            url: Regex::new(r"https?\S+|www\S+")?,
            emoji: Regex::new(
                r"(?:\p{Extended_Pictographic}|[\x{1F1E6}-\x{1F1FF}\x{1F3FB}-\x{1F3FF}\x{FE0F}\x{20E3}])(?:\x{200D}(?:\p{Extended_Pictographic}|\x{FE0F}))*",
            )?,
            // ZWJ / ZWNJ are kept: Sinhala conjuncts (ශ්‍රී) depend on them.
            non_sinhala_or_digit: Regex::new(r"[^\x{0D80}-\x{0DFF}\x{200C}\x{200D}0-9\s]+")?,
            non_sinhala: Regex::new(r"[^\x{0D80}-\x{0DFF}\x{200C}\x{200D}\s]+")?,
            digits: Regex::new(r"[0-9]+")?,
            punctuation: Regex::new(r#"[.,;:!?@#$%^&*()_+={}\[\]|\\"'<>/~`‘’“”-]"#)?,
            whitespace: Regex::new(r"\s+")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SinhalaPreprocessor {
    resources: PreprocessorResources,
    patterns: Patterns,
}

impl SinhalaPreprocessor {
    pub fn new(resources: PreprocessorResources) -> Result<Self, PreprocessError> {
        Ok(Self {
            resources,
            patterns: Patterns::compile()?,
        })
    }

    pub fn resources(&self) -> &PreprocessorResources {
        &self.resources
    }

    pub fn remove_urls(&self, text: &str) -> String {
        self.patterns.url.replace_all(text, "").into_owned()
    }

    pub fn remove_emojis(&self, text: &str) -> String {
        self.patterns.emoji.replace_all(text, "").into_owned()
    }

    /// Drop everything outside the Sinhala block except whitespace, and
    /// ASCII digits when `keep_numbers` is set.
    pub fn remove_non_sinhala(&self, text: &str, keep_numbers: bool) -> String {
        let pattern = if keep_numbers {
            &self.patterns.non_sinhala_or_digit
        } else {
            &self.patterns.non_sinhala
        };
        pattern.replace_all(text, "").into_owned()
    }

    pub fn remove_numbers(&self, text: &str) -> String {
        self.patterns.digits.replace_all(text, "").into_owned()
    }

    pub fn remove_punctuation(&self, text: &str) -> String {
        self.patterns.punctuation.replace_all(text, "").into_owned()
    }

    pub fn normalize_whitespace(&self, text: &str) -> String {
        self.patterns.whitespace.replace_all(text, " ").trim().to_string()
    }

    pub fn remove_stopwords(&self, text: &str) -> String {
        if self.resources.stopwords.is_empty() {
            tracing::debug!("no stop words loaded; skipping stop word removal");
            return text.to_string();
        }
        text.split_whitespace()
            .filter(|w| !self.resources.stopwords.contains(*w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn apply_stemming(&self, text: &str) -> String {
        if self.resources.stems.is_empty() {
            tracing::debug!("no stem dictionary loaded; skipping stemming");
            return text.to_string();
        }
        text.split_whitespace()
            .map(|w| self.resources.stems.get(w).map(String::as_str).unwrap_or(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the enabled steps in order: URLs, emoji, non-Sinhala characters
    /// (or digits alone), punctuation, whitespace, stop words, stemming.
    pub fn preprocess(&self, text: &str, options: &PreprocessOptions) -> String {
        let mut out = text.to_string();
        if options.remove_urls {
            out = self.remove_urls(&out);
        }
        if options.remove_emojis {
            out = self.remove_emojis(&out);
        }
        if options.remove_non_sinhala {
            out = self.remove_non_sinhala(&out, !options.remove_numbers);
        } else if options.remove_numbers {
            out = self.remove_numbers(&out);
        }
        if options.remove_punctuation {
            out = self.remove_punctuation(&out);
        }
        out = self.normalize_whitespace(&out);
        if options.remove_stopwords {
            out = self.remove_stopwords(&out);
        }
        if options.apply_stemming {
            out = self.apply_stemming(&out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor() -> SinhalaPreprocessor {
        let resources = PreprocessorResources {
            stopwords: parse_stopwords("ක\nද\n\n"),
            stems: parse_stems("වැඩිවීමක්\tවැඩිවීම\nbroken line\n"),
        };
        SinhalaPreprocessor::new(resources).expect("patterns")
    }

    const SAMPLE: &str = "ගුවන්තොටුපළ ඉදිරිපිට https://example.com ✈️ 2024 අයවැය 5% ක වැඩිවීමක්. 😊 Some English #news";

    #[test]
    fn default_pipeline_keeps_sinhala_and_digits() {
        let out = preprocessor().preprocess(SAMPLE, &PreprocessOptions::default());
        assert_eq!(out, "ගුවන්තොටුපළ ඉදිරිපිට 2024 අයවැය 5 වැඩිවීමක්");
    }

    #[test]
    fn numbers_can_be_dropped() {
        let options = PreprocessOptions {
            remove_numbers: true,
            ..PreprocessOptions::default()
        };
        let out = preprocessor().preprocess(SAMPLE, &options);
        assert_eq!(out, "ගුවන්තොටුපළ ඉදිරිපිට අයවැය වැඩිවීමක්");
    }

    #[test]
    fn digits_only_removal_keeps_latin_text() {
        let options = PreprocessOptions {
            remove_non_sinhala: false,
            remove_numbers: true,
            remove_stopwords: false,
            ..PreprocessOptions::default()
        };
        let out = preprocessor().preprocess("abc 12 def", &options);
        assert_eq!(out, "abc def");
    }

    #[test]
    fn stemming_uses_dictionary() {
        let p = preprocessor();
        assert_eq!(p.apply_stemming("අයවැය වැඩිවීමක්"), "අයවැය වැඩිවීම");
        assert_eq!(p.resources().stems.len(), 1);
    }

    #[test]
    fn conjunct_joiners_survive_cleanup() {
        let out = preprocessor().preprocess("ශ්‍රී ලංකා", &PreprocessOptions::default());
        assert_eq!(out, "ශ්‍රී ලංකා");
    }

    #[test]
    fn missing_resources_skip_steps() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resources = PreprocessorResources::load(
            &dir.path().join("stopwords.txt"),
            &dir.path().join("stems.txt"),
        );
        let p = SinhalaPreprocessor::new(resources).expect("patterns");
        assert_eq!(p.remove_stopwords("ක ද"), "ක ද");
        assert_eq!(p.apply_stemming("වැඩිවීමක්"), "වැඩිවීමක්");
    }

    #[test]
    fn extraction_options_keep_stopwords() {
        let out = preprocessor().preprocess("ඔහු ක ගියා", &PreprocessOptions::for_extraction());
        assert_eq!(out, "ඔහු ක ගියා");
    }
}

//! Chunk grammar: an ordered list of tag-pattern rules.
//!
//! Rules are written one per line:
//!
//! ```text
//! NP: {<JJ|NNJ|NUM|NNC>*<NNP_PERSON>+<POST>*}   # entity names with modifiers
//! NP: {[NP]<CC>[NP]}                            # coordination of built NPs
//! VP: {<VFM>+}
//! ```
//!
//! - `<A|B>` matches one leaf tagged `A` or `B`; `X.*` matches any tag that
//!   starts with `X`.
//! - `[NP]` / `[VP]` matches a phrase node built by an earlier rule. Leaf tags
//!   and phrase labels never match each other, so the `VP` participle tag and
//!   the `[VP]` phrase stay distinct.
//! - `?`, `*`, `+` quantify the preceding element.
//! - `#` starts a comment.
//!
//! Rules run top to bottom; see [`crate::chunk`] for the matching semantics.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char as pchar, multispace0},
    combinator::{all_consuming, map, opt},
    multi::{many1, separated_list1},
    sequence::{delimited, preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::tags::Tag;

/// Label of a phrase node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhraseKind {
    NP,
    VP,
}

impl PhraseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PhraseKind::NP => "NP",
            PhraseKind::VP => "VP",
        }
    }
}

impl fmt::Display for PhraseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatcher {
    Exact(String),
    Prefix(String),
}

impl TagMatcher {
    pub fn matches(&self, tag: &Tag) -> bool {
        match self {
            TagMatcher::Exact(t) => tag.as_str() == t,
            TagMatcher::Prefix(p) => tag.as_str().starts_with(p.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// One leaf whose tag matches any alternative.
    Tags(Vec<TagMatcher>),
    /// One phrase node with this label.
    Phrase(PhraseKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Repeat {
    /// Inclusive (min, max) repetition bounds.
    pub fn bounds(self) -> (usize, usize) {
        match self {
            Repeat::One => (1, 1),
            Repeat::Optional => (0, 1),
            Repeat::ZeroOrMore => (0, usize::MAX),
            Repeat::OneOrMore => (1, usize::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternElement {
    pub atom: Atom,
    pub repeat: Repeat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRule {
    pub label: PhraseKind,
    pub pattern: Vec<PatternElement>,
    /// The rule as written, for diagnostics.
    pub source: String,
}

/// Ordered rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkGrammar {
    rules: Vec<ChunkRule>,
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarParseError {
    #[error("grammar parse error on line {line}: {message}")]
    Line { line: usize, message: String },
    #[error("grammar has no rules")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarLoadError {
    #[error("failed to read grammar file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] GrammarParseError),
}

/// Entity-aware Sinhala NP/VP grammar.
pub const SINHALA_GRAMMAR: &str = r#"
# Entity-marked proper nouns, with optional leading modifiers or titles.
NP: {<JJ|NNJ|NUM|NNC>*<NNP_PERSON>+<POST>*}
NP: {<JJ|NNJ|NUM|NNC>*<NNP_ORG>+<POST>*}
NP: {<JJ|NNJ|NUM|NNC>*<NNP_LOC>+<POST>*}
NP: {<JJ|NNJ|NUM|NNC>*<NNP_EVENT>+<POST>*}

# Generic proper nouns.
NP: {<JJ|NNJ|NUM>*<NNP>+<POST>*}

# Adjective / numeral modified common nouns.
NP: {<JJ|NNJ|NUM>*<NNC>+<POST>*}

# Determiner-led common nouns.
NP: {<DET>?<JJ|NNJ|NUM>*<NNC>+<POST>*}

# Pronouns.
NP: {<PRP.*>+<POST>*}

# Bare nominal with optional postposition.
NP: {<NN.*><POST>?}

# Coordination of two built NPs.
NP: {[NP]<CC>[NP]}

# Compound verbs: co-verb + non-finite/participle + finite.
VP: {<NCV|JCV|PCV><VNF>+<VP>+<VFM>+}
VP: {<NCV|JCV|PCV><VNF|VP>+<VFM>+}
VP: {<NCV|JCV|PCV><VFM><VFM>+}
VP: {<VNF><VP><VFM>+}

# Two-part compounds.
VP: {<VNF><VFM>+}
VP: {<VFM><VFM>+}

# Bare verb sequences.
VP: {<VFM>+}
VP: {<VP>+}
VP: {<VNF>+}
VP: {<VNN>+}

# Sentence-final verb-like words.
VP: {<NVB>+}
"#;

impl ChunkGrammar {
    pub fn new(rules: Vec<ChunkRule>) -> Self {
        Self { rules }
    }

    /// The built-in Sinhala grammar.
    pub fn sinhala() -> Result<Self, GrammarParseError> {
        Self::parse(SINHALA_GRAMMAR)
    }

    pub fn from_path(path: &Path) -> Result<Self, GrammarLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| GrammarLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grammar = Self::parse(&text)?;
        tracing::info!(path = %path.display(), rules = grammar.rules.len(), "loaded chunk grammar");
        Ok(grammar)
    }

    pub fn parse(text: &str) -> Result<Self, GrammarParseError> {
        let mut rules = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let rule = parse_rule(line).map_err(|message| GrammarParseError::Line {
                line: idx + 1,
                message,
            })?;
            rules.push(rule);
        }
        if rules.is_empty() {
            return Err(GrammarParseError::Empty);
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ChunkRule] {
        &self.rules
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

enum RawAtom<'a> {
    Tags(Vec<&'a str>),
    Phrase(PhraseKind),
}

fn phrase_label(input: &str) -> IResult<&str, PhraseKind> {
    alt((
        map(tag("NP"), |_| PhraseKind::NP),
        map(tag("VP"), |_| PhraseKind::VP),
    ))(input)
}

fn quantifier(input: &str) -> IResult<&str, Repeat> {
    map(
        opt(alt((pchar('?'), pchar('*'), pchar('+')))),
        |q| match q {
            Some('?') => Repeat::Optional,
            Some('*') => Repeat::ZeroOrMore,
            Some('+') => Repeat::OneOrMore,
            _ => Repeat::One,
        },
    )(input)
}

fn tag_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '*'))(input)
}

fn tag_atom(input: &str) -> IResult<&str, RawAtom<'_>> {
    map(
        delimited(pchar('<'), separated_list1(pchar('|'), tag_name), pchar('>')),
        RawAtom::Tags,
    )(input)
}

fn phrase_atom(input: &str) -> IResult<&str, RawAtom<'_>> {
    map(delimited(pchar('['), phrase_label, pchar(']')), RawAtom::Phrase)(input)
}

fn element(input: &str) -> IResult<&str, (RawAtom<'_>, Repeat)> {
    preceded(multispace0, tuple((alt((tag_atom, phrase_atom)), quantifier)))(input)
}

fn rule_line(input: &str) -> IResult<&str, (PhraseKind, Vec<(RawAtom<'_>, Repeat)>)> {
    let (input, label) = phrase_label(input)?;
    let (input, _) = preceded(multispace0, pchar(':'))(input)?;
    let (input, _) = preceded(multispace0, pchar('{'))(input)?;
    let (input, elements) = many1(element)(input)?;
    let (input, _) = preceded(multispace0, pchar('}'))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, (label, elements)))
}

fn tag_matcher(name: &str) -> Result<TagMatcher, String> {
    if let Some(prefix) = name.strip_suffix(".*") {
        if prefix.is_empty() || prefix.contains(['.', '*']) {
            return Err(format!("unsupported tag wildcard `{name}`"));
        }
        return Ok(TagMatcher::Prefix(prefix.to_string()));
    }
    if name.contains(['.', '*']) {
        return Err(format!("unsupported tag wildcard `{name}` (only a trailing `.*` is allowed)"));
    }
    Ok(TagMatcher::Exact(name.to_string()))
}

fn parse_rule(line: &str) -> Result<ChunkRule, String> {
    let (_, (label, raw)) = all_consuming(rule_line)(line)
        .map_err(|_| "rule expects: `NP: {<TAG|TAG>*[NP]...}`".to_string())?;

    let mut pattern = Vec::with_capacity(raw.len());
    for (atom, repeat) in raw {
        let atom = match atom {
            RawAtom::Tags(names) => Atom::Tags(
                names
                    .into_iter()
                    .map(tag_matcher)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            RawAtom::Phrase(kind) => Atom::Phrase(kind),
        };
        pattern.push(PatternElement { atom, repeat });
    }

    Ok(ChunkRule {
        label,
        pattern,
        source: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_grammar_parses_in_priority_order() {
        let grammar = ChunkGrammar::sinhala().expect("grammar");
        let rules = grammar.rules();
        assert_eq!(rules.len(), 21);

        let np_rules: Vec<_> = rules.iter().filter(|r| r.label == PhraseKind::NP).collect();
        let vp_rules: Vec<_> = rules.iter().filter(|r| r.label == PhraseKind::VP).collect();
        assert_eq!(np_rules.len(), 10);
        assert_eq!(vp_rules.len(), 11);

        assert!(np_rules[0].source.contains("NNP_PERSON"));
        assert!(np_rules[1].source.contains("NNP_ORG"));
        assert!(np_rules[2].source.contains("NNP_LOC"));
        assert!(np_rules[3].source.contains("NNP_EVENT"));
        assert_eq!(np_rules[9].pattern[0].atom, Atom::Phrase(PhraseKind::NP));
        assert!(vp_rules[10].source.contains("NVB"));
    }

    #[test]
    fn parses_alternatives_wildcards_and_quantifiers() {
        let grammar = ChunkGrammar::parse("NP: {<DET>? <JJ|NN.*>* <NNC>+ [NP]}").expect("parse");
        let rule = &grammar.rules()[0];
        assert_eq!(rule.pattern.len(), 4);
        assert_eq!(rule.pattern[0].repeat, Repeat::Optional);
        assert_eq!(
            rule.pattern[1].atom,
            Atom::Tags(vec![
                TagMatcher::Exact("JJ".to_string()),
                TagMatcher::Prefix("NN".to_string()),
            ])
        );
        assert_eq!(rule.pattern[1].repeat, Repeat::ZeroOrMore);
        assert_eq!(rule.pattern[2].repeat, Repeat::OneOrMore);
        assert_eq!(rule.pattern[3].repeat, Repeat::One);
    }

    #[test]
    fn reports_line_numbers() {
        let err = ChunkGrammar::parse("NP: {<NNC>+}\n\nXP: {<NNC>}\n").expect_err("bad label");
        match err {
            GrammarParseError::Line { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_inner_wildcards() {
        assert!(ChunkGrammar::parse("NP: {<N.C>}").is_err());
        assert!(ChunkGrammar::parse("NP: {<.*>}").is_err());
    }

    #[test]
    fn empty_grammar_is_an_error() {
        assert!(matches!(
            ChunkGrammar::parse("# nothing here\n"),
            Err(GrammarParseError::Empty)
        ));
    }

    #[test]
    fn prefix_matcher_covers_entity_variants() {
        let matcher = TagMatcher::Prefix("NN".to_string());
        assert!(matcher.matches(&Tag::new("NNC")));
        assert!(matcher.matches(&Tag::new("NNP_PERSON")));
        assert!(!matcher.matches(&Tag::new("VFM")));
    }
}

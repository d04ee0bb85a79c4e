//! In-memory RDF store answering trusted-news queries.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use satyacheck_nlp::EntityCategory;
use satyacheck_scoring::{StoreError, TrustedContent, TrustedStore};

use crate::rdf::{parse_statements, Node, Object, RdfFormat, Statement};
use crate::vocab::{self, ns};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyStats {
    pub statements: usize,
    pub articles: usize,
    pub publishers: usize,
    pub categories: usize,
    pub entities: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OntologyStore {
    statements: Vec<Statement>,
    by_subject: HashMap<Node, Vec<usize>>,
}

impl OntologyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a Turtle, N-Triples or RDF/XML document (chosen by extension).
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = RdfFormat::from_path(path)?;
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read ontology {}", path.display()))?;
        let store = Self::parse(&bytes, format)
            .with_context(|| format!("failed to load ontology {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            statements = store.statements.len(),
            "loaded ontology"
        );
        Ok(store)
    }

    pub fn parse(bytes: &[u8], format: RdfFormat) -> Result<Self> {
        let mut store = Self::new();
        for statement in parse_statements(bytes, format)? {
            store.push(statement);
        }
        Ok(store)
    }

    pub(crate) fn push(&mut self, statement: Statement) {
        let idx = self.statements.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(idx);
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub(crate) fn has_subject(&self, node: &Node) -> bool {
        self.by_subject.contains_key(node)
    }

    /// Objects of `subject` for a namespace predicate, in document order.
    fn objects<'a>(&'a self, subject: &Node, local: &str) -> impl Iterator<Item = &'a Object> + 'a {
        let predicate = ns(local);
        self.by_subject
            .get(subject)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.statements[i])
            .filter(move |s| s.predicate == predicate)
            .map(|s| &s.object)
    }

    fn first_text(&self, subject: &Node, local: &str) -> Option<String> {
        self.objects(subject, local).find_map(object_text)
    }

    /// Subjects that carry at least one article predicate, by first appearance.
    pub fn articles(&self) -> Vec<&Node> {
        let predicates: HashSet<String> = vocab::ARTICLE_PREDICATES.iter().map(|p| ns(p)).collect();
        let mut seen = HashSet::new();
        self.statements
            .iter()
            .filter(|s| predicates.contains(&s.predicate))
            .filter(|s| seen.insert(&s.subject))
            .map(|s| &s.subject)
            .collect()
    }

    /// Articles filed under `category` as either category or subcategory.
    fn articles_in(&self, category: &str) -> Vec<&Node> {
        self.articles()
            .into_iter()
            .filter(|article| {
                self.objects(article, vocab::HAS_CATEGORY)
                    .chain(self.objects(article, vocab::HAS_SUB_CATEGORY))
                    .any(|o| category_matches(o, category))
            })
            .collect()
    }

    /// Display name of a mentioned entity.
    fn entity_name(&self, object: &Object) -> Option<String> {
        match object {
            Object::Literal(lit) => Some(lit.lexical.clone()),
            Object::Node(node) => self.first_text(node, vocab::HAS_NAME).or_else(|| {
                node.as_iri()
                    .map(|iri| vocab::local_name(iri).replace('_', " "))
            }),
        }
    }

    pub fn contents_in(&self, category: &str) -> Vec<TrustedContent> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for article in self.articles_in(category) {
            let (Some(full_text), Some(title), Some(url)) = (
                self.first_text(article, vocab::HAS_FULL_TEXT),
                self.first_text(article, vocab::HAS_TITLE),
                self.first_text(article, vocab::HAS_SOURCE_URL),
            ) else {
                continue;
            };
            let publisher = self
                .first_text(article, vocab::PUBLISHER_NAME)
                .unwrap_or_default();
            let content = TrustedContent::new(full_text, title, url).with_publisher(publisher);
            if seen.insert(content.clone()) {
                out.push(content);
            }
        }
        out
    }

    pub fn publishers(&self) -> Vec<String> {
        let predicate = ns(vocab::PUBLISHER_NAME);
        let mut seen = HashSet::new();
        self.statements
            .iter()
            .filter(|s| s.predicate == predicate)
            .filter_map(|s| object_text(&s.object))
            .filter(|p| seen.insert(p.clone()))
            .collect()
    }

    pub fn entities_in(&self, category: &str, kind: EntityCategory) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for article in self.articles_in(category) {
            for object in self.objects(article, vocab::mentions_predicate(kind)) {
                if let Some(name) = self.entity_name(object) {
                    if seen.insert(name.clone()) {
                        out.push(name);
                    }
                }
            }
        }
        out
    }

    pub fn stats(&self) -> OntologyStats {
        let mut categories = HashSet::new();
        let mut entities = HashSet::new();
        let category_predicates = [ns(vocab::HAS_CATEGORY), ns(vocab::HAS_SUB_CATEGORY)];
        let mention_predicates: Vec<String> = EntityCategory::ALL
            .iter()
            .map(|k| ns(vocab::mentions_predicate(*k)))
            .collect();
        for statement in &self.statements {
            if category_predicates.contains(&statement.predicate) {
                if let Some(name) = category_name(&statement.object) {
                    categories.insert(name);
                }
            } else if mention_predicates.contains(&statement.predicate) {
                entities.insert(statement.object.clone());
            }
        }
        OntologyStats {
            statements: self.statements.len(),
            articles: self.articles().len(),
            publishers: self.publishers().len(),
            categories: categories.len(),
            entities: entities.len(),
        }
    }

    /// Serialize every statement as N-Triples.
    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            out.push_str(&statement.to_string());
            out.push('\n');
        }
        out
    }

    pub fn save_ntriples(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ntriples())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), statements = self.statements.len(), "saved ontology");
        Ok(())
    }
}

/// Literal lexical form, or the IRI itself for node objects such as URLs.
fn object_text(object: &Object) -> Option<String> {
    match object {
        Object::Literal(lit) => Some(lit.lexical.clone()),
        Object::Node(Node::Iri(iri)) => Some(iri.clone()),
        Object::Node(Node::Blank(_)) => None,
    }
}

fn category_name(object: &Object) -> Option<String> {
    match object {
        Object::Literal(lit) => Some(lit.lexical.clone()),
        Object::Node(Node::Iri(iri)) => Some(vocab::local_name(iri).to_string()),
        Object::Node(Node::Blank(_)) => None,
    }
}

/// Categories are individuals (`ns:politics`) or plain literals.
fn category_matches(object: &Object, category: &str) -> bool {
    let category = category.trim();
    if category.is_empty() {
        return false;
    }
    match category_name(object) {
        Some(name) => name == category || name == vocab::sanitize_local(category),
        None => false,
    }
}

impl TrustedStore for OntologyStore {
    fn trusted_contents(&self, category: &str) -> Result<Vec<TrustedContent>, StoreError> {
        Ok(self.contents_in(category))
    }

    fn trusted_publishers(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.publishers())
    }

    fn verified_entities(
        &self,
        subcategory: &str,
        kind: EntityCategory,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self.entities_in(subcategory, kind))
    }
}

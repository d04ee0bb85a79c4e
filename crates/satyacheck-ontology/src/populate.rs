//! Adding trusted articles to the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use satyacheck_nlp::{EntityCategory, EntityCollection};

use crate::rdf::{Literal, Node, Object, Statement};
use crate::store::OntologyStore;
use crate::vocab::{self, ns};

/// A trusted article as supplied for population.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticleRecord {
    pub headline: String,
    pub content: String,
    /// RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`; empty when unknown.
    #[serde(default)]
    pub timestamp: String,
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(flatten)]
    pub entities: EntityCollection,
}

#[derive(Debug, thiserror::Error)]
pub enum PopulateError {
    #[error("article field `{0}` must not be empty")]
    MissingField(&'static str),
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),
    #[error("article already present: {0}")]
    DuplicateArticle(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkPopulateReport {
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Normalize a timestamp to an `xsd:dateTime` lexical form (UTC).
pub fn parse_timestamp(value: &str) -> Result<String, PopulateError> {
    let value = value.trim();
    let parsed: Option<DateTime<Utc>> = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        });
    parsed
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| PopulateError::InvalidTimestamp(value.to_string()))
}

fn require(value: &str, field: &'static str) -> Result<(), PopulateError> {
    if value.trim().is_empty() {
        Err(PopulateError::MissingField(field))
    } else {
        Ok(())
    }
}

impl OntologyStore {
    /// Add one article and its entity mentions. Returns the article IRI.
    pub fn insert_article(&mut self, record: &NewsArticleRecord) -> Result<String, PopulateError> {
        require(&record.headline, "headline")?;
        require(&record.content, "content")?;
        require(&record.url, "url")?;
        let published_at = if record.timestamp.trim().is_empty() {
            None
        } else {
            Some(parse_timestamp(&record.timestamp)?)
        };

        let article_iri = vocab::article_iri(&record.url);
        let article = Node::iri(article_iri.clone());
        if self.has_subject(&article) {
            return Err(PopulateError::DuplicateArticle(record.url.trim().to_string()));
        }

        let mut statements = vec![
            Statement {
                subject: article.clone(),
                predicate: vocab::RDF_TYPE.to_string(),
                object: Object::Node(Node::iri(ns(vocab::NEWS_ARTICLE))),
            },
            literal(&article, vocab::HAS_HEADLINE, record.headline.trim()),
            literal(&article, vocab::HAS_TITLE, record.headline.trim()),
            literal(&article, vocab::HAS_FULL_TEXT, record.content.trim()),
            literal(&article, vocab::HAS_SOURCE_URL, record.url.trim()),
        ];
        if !record.source.trim().is_empty() {
            statements.push(literal(&article, vocab::PUBLISHER_NAME, record.source.trim()));
        }
        for (predicate, value) in [
            (vocab::HAS_CATEGORY, &record.category),
            (vocab::HAS_SUB_CATEGORY, &record.subcategory),
        ] {
            if !value.trim().is_empty() {
                statements.push(Statement {
                    subject: article.clone(),
                    predicate: ns(predicate),
                    object: Object::Node(Node::iri(ns(&vocab::sanitize_local(value)))),
                });
            }
        }
        if let Some(ts) = published_at {
            statements.push(Statement {
                subject: article.clone(),
                predicate: ns(vocab::PUBLISHED_AT),
                object: Object::Literal(Literal::typed(ts, vocab::XSD_DATE_TIME)),
            });
        }

        for kind in EntityCategory::ALL {
            for name in record.entities.get(kind) {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let entity = Node::iri(vocab::entity_iri(kind, name));
                if !self.has_subject(&entity) && !statements.iter().any(|s| s.subject == entity) {
                    statements.push(Statement {
                        subject: entity.clone(),
                        predicate: vocab::RDF_TYPE.to_string(),
                        object: Object::Node(Node::iri(ns(vocab::entity_class(kind)))),
                    });
                    statements.push(literal(&entity, vocab::HAS_NAME, name));
                }
                statements.push(Statement {
                    subject: article.clone(),
                    predicate: ns(vocab::mentions_predicate(kind)),
                    object: Object::Node(entity),
                });
            }
        }

        let added = statements.len();
        for statement in statements {
            self.push(statement);
        }
        tracing::debug!(article = %article_iri, statements = added, "inserted article");
        Ok(article_iri)
    }

    /// Insert every record, collecting failures instead of stopping.
    pub fn populate(&mut self, records: &[NewsArticleRecord]) -> BulkPopulateReport {
        let mut report = BulkPopulateReport {
            total_processed: records.len(),
            ..BulkPopulateReport::default()
        };
        for (idx, record) in records.iter().enumerate() {
            match self.insert_article(record) {
                Ok(_) => report.successful += 1,
                Err(err) => {
                    report.failed += 1;
                    report.errors.push(format!("article {}: {err}", idx + 1));
                }
            }
        }
        tracing::info!(
            total = report.total_processed,
            successful = report.successful,
            failed = report.failed,
            "populated ontology"
        );
        report
    }
}

fn literal(subject: &Node, local: &str, value: &str) -> Statement {
    Statement {
        subject: subject.clone(),
        predicate: ns(local),
        object: Object::Literal(Literal::plain(value)),
    }
}

//! Trusted news knowledge base.
//!
//! Articles from trusted publishers live in an RDF graph using the news
//! ontology namespace ([`vocab::NS`]). [`OntologyStore`] loads Turtle,
//! N-Triples or RDF/XML, answers the queries scoring needs through
//! [`satyacheck_scoring::TrustedStore`], and can be extended with new
//! articles and saved back as N-Triples.

pub mod populate;
pub mod rdf;
pub mod store;
pub mod vocab;

pub use populate::{parse_timestamp, BulkPopulateReport, NewsArticleRecord, PopulateError};
pub use rdf::{Literal, Node, Object, RdfFormat, Statement};
pub use store::{OntologyStats, OntologyStore};

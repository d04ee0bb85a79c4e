//! News ontology vocabulary.

use satyacheck_nlp::EntityCategory;

pub const NS: &str = "http://www.semanticweb.org/kingmalitha/ontologies/2025/5/new-ontology-v1#";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

pub const NEWS_ARTICLE: &str = "NewsArticle";
pub const HAS_CATEGORY: &str = "hasCategory";
pub const HAS_SUB_CATEGORY: &str = "hasSubCategory";
pub const HAS_FULL_TEXT: &str = "hasFullText";
pub const HAS_TITLE: &str = "hasTitle";
pub const HAS_HEADLINE: &str = "hasHeadline";
pub const HAS_SOURCE_URL: &str = "hasSourceURL";
pub const PUBLISHER_NAME: &str = "publisherName";
pub const PUBLISHED_AT: &str = "publishedAt";
pub const HAS_NAME: &str = "hasName";

/// Full IRI of a term in the news namespace.
pub fn ns(local: &str) -> String {
    format!("{NS}{local}")
}

/// Local part of an IRI (after the last `#` or `/`).
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

pub fn mentions_predicate(kind: EntityCategory) -> &'static str {
    match kind {
        EntityCategory::Persons => "mentionsPerson",
        EntityCategory::Locations => "mentionsLocation",
        EntityCategory::Events => "mentionsEvent",
        EntityCategory::Organizations => "mentionsOrganization",
    }
}

pub fn entity_class(kind: EntityCategory) -> &'static str {
    match kind {
        EntityCategory::Persons => "Person",
        EntityCategory::Locations => "Location",
        EntityCategory::Events => "Event",
        EntityCategory::Organizations => "Organization",
    }
}

/// Article predicates that mark a subject as an article.
pub const ARTICLE_PREDICATES: [&str; 5] = [
    HAS_CATEGORY,
    HAS_SUB_CATEGORY,
    HAS_FULL_TEXT,
    HAS_HEADLINE,
    HAS_SOURCE_URL,
];

/// Replace characters that are awkward in an IRI local name.
pub fn sanitize_local(s: &str) -> String {
    let out: String = s
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if out.is_empty() {
        "_".to_string()
    } else {
        out
    }
}

/// FNV-1a 64-bit digest, hex encoded.
pub fn fnv1a64_hex(bytes: &[u8]) -> String {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{hash:016x}")
}

pub fn article_iri(url: &str) -> String {
    ns(&format!("Article_{}", fnv1a64_hex(url.trim().as_bytes())))
}

pub fn entity_iri(kind: EntityCategory, name: &str) -> String {
    ns(&format!("{}_{}", entity_class(kind), fnv1a64_hex(name.trim().as_bytes())))
}

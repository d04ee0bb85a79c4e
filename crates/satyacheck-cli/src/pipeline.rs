//! End-to-end verification: cleanup, news check, classification, entity
//! extraction, triple extraction, credibility scoring.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use satyacheck_nlp::{
    extract_entities_with_policy, EntityCollection, EntityExtractor, ExtractionResult,
    FailurePolicy, PreprocessOptions, SinhalaPreprocessor, TripleExtractor,
};
use satyacheck_scoring::{
    ArticleInput, CredibilityReport, CredibilityScorer, ScorerOptions, SemanticSimilarity,
    TrustedStore,
};
use satyacheck_services::{Classification, NewsClassifier, NewsDetector};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyRequest {
    pub text: String,
    /// Publisher name, used for source credibility.
    pub source: String,
    pub check_news: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub cleaned_text: String,
    pub classification: Classification,
    pub entities: EntityCollection,
    pub extraction: ExtractionResult,
    pub credibility: CredibilityReport,
}

/// Result of a verification run. Rejections are ordinary outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyOutcome {
    NotNews { cleaned_text: String },
    Unclassified {
        cleaned_text: String,
        classification: Classification,
    },
    Verified(Box<VerificationReport>),
}

/// External collaborators of the pipeline.
pub struct Collaborators<'a> {
    pub detector: &'a dyn NewsDetector,
    pub classifier: &'a dyn NewsClassifier,
    pub ner: &'a dyn EntityExtractor,
    pub store: &'a dyn TrustedStore,
    pub similarity: &'a dyn SemanticSimilarity,
}

pub struct VerifyPipeline<'a> {
    pub preprocessor: &'a SinhalaPreprocessor,
    pub extractor: &'a TripleExtractor,
    pub services: Collaborators<'a>,
    pub entity_policy: FailurePolicy,
    pub scorer_options: ScorerOptions,
}

impl VerifyPipeline<'_> {
    pub fn verify(&self, request: &VerifyRequest) -> Result<VerifyOutcome> {
        let cleaned_text = self
            .preprocessor
            .preprocess(&request.text, &PreprocessOptions::default());
        let extraction_text = self
            .preprocessor
            .preprocess(&request.text, &PreprocessOptions::for_extraction());

        if request.check_news {
            let is_news = self
                .services
                .detector
                .is_news(&cleaned_text)
                .context("news detection failed")?;
            if !is_news {
                tracing::info!("text is not recognized as news");
                return Ok(VerifyOutcome::NotNews { cleaned_text });
            }
        }

        let classification = self
            .services
            .classifier
            .classify(&cleaned_text)
            .context("classification failed")?;
        if !classification.is_determined() {
            tracing::info!(
                category = %classification.category,
                subcategory = %classification.subcategory,
                "could not determine category or subcategory"
            );
            return Ok(VerifyOutcome::Unclassified {
                cleaned_text,
                classification,
            });
        }

        let entities = extract_entities_with_policy(self.services.ner, &extraction_text, self.entity_policy)
            .context("entity extraction failed")?;
        let extraction = self.extractor.extract(&extraction_text, &entities);

        let article = ArticleInput {
            content: cleaned_text.clone(),
            category: classification.category.clone(),
            subcategory: classification.subcategory.clone(),
            entities: entities.clone(),
            source: request.source.clone(),
        };
        let credibility = CredibilityScorer::new(self.services.store, self.services.similarity)
            .with_options(self.scorer_options)
            .score(&article)
            .context("credibility scoring failed")?;
        tracing::info!(
            final_score = credibility.final_score,
            result = %credibility.result,
            "article verified"
        );

        Ok(VerifyOutcome::Verified(Box::new(VerificationReport {
            cleaned_text,
            classification,
            entities,
            extraction,
            credibility,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satyacheck_nlp::{
        ChunkGrammar, EntityCategory, EntityExtractionError, PosLexicon, PreprocessorResources,
    };
    use satyacheck_scoring::{InMemoryTrustedStore, SimilarityError, TrustedContent, Verdict};
    use satyacheck_services::ServiceError;

    struct Detector(bool);

    impl NewsDetector for Detector {
        fn is_news(&self, _text: &str) -> Result<bool, ServiceError> {
            Ok(self.0)
        }
    }

    struct Classifier(&'static str, &'static str);

    impl NewsClassifier for Classifier {
        fn classify(&self, _text: &str) -> Result<Classification, ServiceError> {
            Ok(Classification {
                category: self.0.to_string(),
                subcategory: self.1.to_string(),
            })
        }
    }

    struct Ner(Option<EntityCollection>);

    impl EntityExtractor for Ner {
        fn extract_entities(&self, _text: &str) -> Result<EntityCollection, EntityExtractionError> {
            self.0
                .clone()
                .ok_or_else(|| EntityExtractionError::Service("connection refused".to_string()))
        }
    }

    struct Identical;

    impl SemanticSimilarity for Identical {
        fn similarities(&self, candidate: &str, references: &[String]) -> Result<Vec<f64>, SimilarityError> {
            Ok(references
                .iter()
                .map(|r| if r == candidate { 1.0 } else { 0.2 })
                .collect())
        }
    }

    const STORY: &str = "ජනාධිපති අනුර කුමාර දිසානායක කොළඹ දී කතා කළේය";

    fn fixtures() -> (SinhalaPreprocessor, TripleExtractor, InMemoryTrustedStore) {
        let preprocessor = SinhalaPreprocessor::new(PreprocessorResources::default()).expect("patterns");
        let lexicon = PosLexicon::from_entries([
            ("ජනාධිපති", "NNC"),
            ("කොළඹ", "NNP"),
            ("දී", "POST"),
            ("කතා", "NNC"),
            ("කළේය", "VFM"),
        ]);
        let extractor = TripleExtractor::new(lexicon, ChunkGrammar::sinhala().expect("grammar"));
        let store = InMemoryTrustedStore::new()
            .with_content("president", TrustedContent::new(STORY, "කතාව", "https://www.newsfirst.lk/1"))
            .with_publisher("News First")
            .with_entities("president", EntityCategory::Persons, &["අනුර කුමාර දිසානායක"])
            .with_entities("president", EntityCategory::Locations, &["කොළඹ"]);
        (preprocessor, extractor, store)
    }

    fn entities() -> EntityCollection {
        EntityCollection::default()
            .with(EntityCategory::Persons, &["අනුර කුමාර දිසානායක"])
            .with(EntityCategory::Locations, &["කොළඹ"])
    }

    fn run(
        detector: bool,
        classifier: Classifier,
        ner: Ner,
        entity_policy: FailurePolicy,
    ) -> Result<VerifyOutcome> {
        let (preprocessor, extractor, store) = fixtures();
        let pipeline = VerifyPipeline {
            preprocessor: &preprocessor,
            extractor: &extractor,
            services: Collaborators {
                detector: &Detector(detector),
                classifier: &classifier,
                ner: &ner,
                store: &store,
                similarity: &Identical,
            },
            entity_policy,
            scorer_options: ScorerOptions::default(),
        };
        pipeline.verify(&VerifyRequest {
            text: format!("{STORY} https://t.co/x 🙂"),
            source: "News First".to_string(),
            check_news: true,
        })
    }

    #[test]
    fn trusted_story_is_verified() {
        let outcome = run(
            true,
            Classifier("politics", "president"),
            Ner(Some(entities())),
            FailurePolicy::Propagate,
        )
        .expect("verify");
        let VerifyOutcome::Verified(report) = outcome else {
            panic!("expected a verified report, got {outcome:?}");
        };
        assert_eq!(report.cleaned_text, STORY);
        assert_eq!(report.credibility.result, Verdict::NotFake);
        approx::assert_abs_diff_eq!(report.credibility.final_score, 1.0);
        assert_eq!(report.extraction.triples.len(), 1);
        // The title is a leading modifier of the person NP.
        assert_eq!(report.extraction.triples[0].subject, "ජනාධිපති අනුර කුමාර දිසානායක");
        assert_eq!(report.extraction.triples[0].predicate, "කළේය");
    }

    #[test]
    fn non_news_stops_early() {
        let outcome = run(false, Classifier("politics", "president"), Ner(None), FailurePolicy::Propagate)
            .expect("verify");
        assert!(matches!(outcome, VerifyOutcome::NotNews { .. }));
    }

    #[test]
    fn missing_subcategory_is_unclassified() {
        let outcome = run(true, Classifier("politics", ""), Ner(None), FailurePolicy::Propagate)
            .expect("verify");
        let json = serde_json::to_value(&outcome).expect("json");
        assert_eq!(json["status"], "unclassified");
        assert_eq!(json["classification"]["category"], "politics");
    }

    #[test]
    fn ner_outage_follows_policy() {
        let err = run(true, Classifier("politics", "president"), Ner(None), FailurePolicy::Propagate)
            .expect_err("propagate");
        assert!(err.to_string().contains("entity extraction failed"));

        let outcome = run(true, Classifier("politics", "president"), Ner(None), FailurePolicy::Degrade)
            .expect("degrade");
        let VerifyOutcome::Verified(report) = outcome else {
            panic!("expected a verified report, got {outcome:?}");
        };
        assert!(report.entities.is_empty());
        approx::assert_abs_diff_eq!(report.credibility.breakdown.entity_similarity, 0.0);
    }
}

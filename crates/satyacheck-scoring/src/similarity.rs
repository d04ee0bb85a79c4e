//! Entity-name matching against verified names.

use serde::{Deserialize, Serialize};

use crate::fuzzy::ratio;

/// Best verified match for one article entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub input: String,
    /// `None` when there was nothing to match against.
    pub matched: Option<String>,
    /// Fuzzy ratio scaled to `[0, 1]`.
    pub score: f64,
}

/// Mean best-match similarity of `inputs` against `verified`.
///
/// - no inputs: `(1.0, [])`, a vacuous full match;
/// - no verified names: every input scores 0 with no match;
/// - ties keep the first maximal verified name.
pub fn get_average_similarity(inputs: &[String], verified: &[String]) -> (f64, Vec<EntityMatch>) {
    if inputs.is_empty() {
        return (1.0, Vec::new());
    }

    let matches: Vec<EntityMatch> = inputs
        .iter()
        .map(|input| {
            let best = verified
                .iter()
                .map(|candidate| (candidate, ratio(input, candidate)))
                .fold(None::<(&String, f64)>, |best, (candidate, score)| match best {
                    Some((_, best_score)) if best_score >= score => best,
                    _ => Some((candidate, score)),
                });
            match best {
                Some((candidate, score)) => EntityMatch {
                    input: input.clone(),
                    matched: Some(candidate.clone()),
                    score: score / 100.0,
                },
                None => EntityMatch {
                    input: input.clone(),
                    matched: None,
                    score: 0.0,
                },
            }
        })
        .collect();

    let total: f64 = matches.iter().map(|m| m.score).sum();
    (total / matches.len() as f64, matches)
}

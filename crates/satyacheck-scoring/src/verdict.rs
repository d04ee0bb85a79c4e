use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOT_FAKE_THRESHOLD: f64 = 0.7;
pub const MIGHT_BE_FAKE_THRESHOLD: f64 = 0.4;

/// Discrete credibility label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "NOT FAKE")]
    NotFake,
    #[serde(rename = "MIGHT BE FAKE")]
    MightBeFake,
    #[serde(rename = "POSSIBLY FAKE")]
    PossiblyFake,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= NOT_FAKE_THRESHOLD {
            Verdict::NotFake
        } else if score >= MIGHT_BE_FAKE_THRESHOLD {
            Verdict::MightBeFake
        } else {
            Verdict::PossiblyFake
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::NotFake => "NOT FAKE",
            Verdict::MightBeFake => "MIGHT BE FAKE",
            Verdict::PossiblyFake => "POSSIBLY FAKE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        assert_eq!(Verdict::from_score(0.7), Verdict::NotFake);
        assert_eq!(Verdict::from_score(0.699999), Verdict::MightBeFake);
        assert_eq!(Verdict::from_score(0.4), Verdict::MightBeFake);
        assert_eq!(Verdict::from_score(0.399999), Verdict::PossiblyFake);
        assert_eq!(Verdict::from_score(0.0), Verdict::PossiblyFake);
        assert_eq!(Verdict::from_score(1.0), Verdict::NotFake);
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Verdict::MightBeFake).expect("json"),
            "\"MIGHT BE FAKE\""
        );
    }
}

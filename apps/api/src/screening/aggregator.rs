//! Score aggregation: equal-weight blend of similarity and skill coverage, plus rating bands.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const SIMILARITY_WEIGHT: f64 = 0.5;
pub const SKILL_WEIGHT: f64 = 0.5;

/// Qualitative band of a final score. Lower edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Poor Match")]
    Poor,
    #[serde(rename = "Limited Match")]
    Limited,
    #[serde(rename = "Partial Match")]
    Partial,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Excellent Match")]
    Excellent,
}

impl Rating {
    /// Band for a 0–100 percentage: ≥80 Excellent, ≥60 Good, ≥40 Partial, ≥20 Limited, else Poor.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Rating::Excellent
        } else if percent >= 60.0 {
            Rating::Good
        } else if percent >= 40.0 {
            Rating::Partial
        } else if percent >= 20.0 {
            Rating::Limited
        } else {
            Rating::Poor
        }
    }

    /// Band for a final score in [0, 1].
    pub fn from_score(final_score: f64) -> Self {
        Self::from_percent(final_score * 100.0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent Match",
            Rating::Good => "Good Match",
            Rating::Partial => "Partial Match",
            Rating::Limited => "Limited Match",
            Rating::Poor => "Poor Match",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `0.5 · similarity + 0.5 · skill_match`, clamped to [0, 1].
pub fn final_score(similarity_score: f64, skill_match_score: f64) -> f64 {
    (SIMILARITY_WEIGHT * similarity_score + SKILL_WEIGHT * skill_match_score).clamp(0.0, 1.0)
}

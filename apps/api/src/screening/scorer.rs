//! Match Scoring: the resume ↔ JD pipeline and its pluggable, trait-based scorer.
//!
//! Default: `TfidfMatchScorer` (pure-Rust, deterministic, no I/O).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`; handlers never call the pipeline directly.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::screening::aggregator::{final_score, Rating};
use crate::screening::extractor::{extract_skills, ExtractedSkills};
use crate::screening::feedback::generate_feedback;
use crate::screening::matcher::match_skills;
use crate::screening::normalizer::{Document, NormalizerOptions};
use crate::screening::similarity::cosine_similarity;
use crate::screening::taxonomy::SkillTaxonomy;

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

/// Result of scoring one resume against one JD. Built once, handed to the caller as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub similarity_score: f64,  // 0.0 – 1.0
    pub skill_match_score: f64, // 0.0 – 1.0
    pub final_score: f64,       // 0.5 × similarity + 0.5 × skill_match
    pub rating: Rating,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    /// Unneeded options of a satisfied "A or B" requirement.
    pub waived_skills: BTreeSet<String>,
    pub feedback: String,
    pub resume_skills: ExtractedSkills,
    pub jd_skills: ExtractedSkills,
    pub required_count: usize,
    pub found_count: usize,
    pub scorer_backend: String, // "tfidf"
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implement this to swap backends without touching
/// the handlers.
///
/// Carried in `AppState` as `Arc<dyn MatchScorer>`.
pub trait MatchScorer: Send + Sync {
    fn score(&self, resume_text: &str, jd_text: &str) -> MatchResult;
}

// ────────────────────────────────────────────────────────────────────────────
// TfidfMatchScorer (default)
// ────────────────────────────────────────────────────────────────────────────

/// TF-IDF similarity + taxonomy skill coverage over a shared, immutable taxonomy.
pub struct TfidfMatchScorer {
    taxonomy: Arc<SkillTaxonomy>,
    options: NormalizerOptions,
}

impl TfidfMatchScorer {
    pub fn new(taxonomy: Arc<SkillTaxonomy>, options: NormalizerOptions) -> Self {
        Self { taxonomy, options }
    }
}

impl MatchScorer for TfidfMatchScorer {
    fn score(&self, resume_text: &str, jd_text: &str) -> MatchResult {
        if self.options == NormalizerOptions::default() {
            score(resume_text, jd_text, &self.taxonomy)
        } else {
            score_with_options(resume_text, jd_text, &self.taxonomy, &self.options)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Scores a resume against a JD with default normalization.
///
/// Pure and infallible for every string input, including empty strings. Cost grows
/// with input length: callers must cap text size before calling.
pub fn score(resume_text: &str, jd_text: &str, taxonomy: &SkillTaxonomy) -> MatchResult {
    score_with_options(resume_text, jd_text, taxonomy, &NormalizerOptions::default())
}

/// Algorithm:
/// 1. Normalize both texts into token sequences (similarity) and skill text (extraction)
/// 2. similarity = TF-IDF cosine of the token sequences
/// 3. Extract skills from both documents; coverage = satisfied / JD requirements,
///    where "A or B" in the JD is one requirement
/// 4. final = 0.5 × similarity + 0.5 × coverage → rating band → feedback
pub fn score_with_options(
    resume_text: &str,
    jd_text: &str,
    taxonomy: &SkillTaxonomy,
    options: &NormalizerOptions,
) -> MatchResult {
    let resume = Document::new(resume_text, options);
    let jd = Document::new(jd_text, options);

    let similarity_score = cosine_similarity(&resume.normalized_tokens, &jd.normalized_tokens);

    let resume_skills = extract_skills(&resume.skill_text(), taxonomy);
    let jd_skills = extract_skills(&jd.skill_text(), taxonomy);
    let skill_match = match_skills(&resume_skills, &jd_skills);

    let final_score = final_score(similarity_score, skill_match.score);
    let rating = Rating::from_score(final_score);
    let feedback = generate_feedback(rating, &skill_match.missing);

    debug!(
        similarity = similarity_score,
        skill_match = skill_match.score,
        final_score,
        "Scored resume ({} tokens) against JD ({} tokens): {rating}",
        resume.normalized_tokens.len(),
        jd.normalized_tokens.len(),
    );

    MatchResult {
        similarity_score,
        skill_match_score: skill_match.score,
        final_score,
        rating,
        matched_skills: skill_match.matched,
        missing_skills: skill_match.missing,
        waived_skills: skill_match.waived,
        feedback,
        resume_skills,
        jd_skills,
        required_count: skill_match.required_count,
        found_count: skill_match.found_count,
        scorer_backend: "tfidf".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::taxonomy::{CategorySpec, SkillEntry};

    const RESUME: &str = "Python, Django, MongoDB, PostgreSQL, AWS, Docker, Git";
    const JD: &str = "Python, Django or Flask, PostgreSQL, AWS, Docker, RESTful API design";

    fn web_taxonomy() -> SkillTaxonomy {
        let cat = |name: &str, skills: &[&str]| {
            CategorySpec::new(
                name,
                skills.iter().map(|s| SkillEntry::Name(s.to_string())).collect(),
            )
        };
        SkillTaxonomy::new(vec![
            cat("languages", &["Python"]),
            cat("web_frameworks", &["Django"]),
            cat("databases", &["PostgreSQL", "MongoDB"]),
            cat("cloud", &["AWS", "Docker"]),
            cat("tools", &["Git"]),
            cat("practices", &["RESTful API design"]),
        ])
        .unwrap()
    }

    fn assert_invariants(result: &MatchResult) {
        for s in [result.similarity_score, result.skill_match_score, result.final_score] {
            assert!((0.0..=1.0).contains(&s), "score out of range: {s}");
        }
        assert_eq!(
            result.final_score,
            0.5 * result.similarity_score + 0.5 * result.skill_match_score
        );
        let mut covered: BTreeSet<String> = result
            .matched_skills
            .union(&result.missing_skills)
            .cloned()
            .collect();
        covered.extend(result.waived_skills.iter().cloned());
        assert_eq!(covered, result.jd_skills.flatten());
        assert!(result.matched_skills.is_disjoint(&result.missing_skills));
        assert_eq!(result.rating, Rating::from_score(result.final_score));
    }

    #[test]
    fn test_python_django_scenario() {
        let result = score(RESUME, JD, &web_taxonomy());
        assert_invariants(&result);

        let missing: Vec<&str> = result.missing_skills.iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["RESTful API design"]);
        assert!((result.skill_match_score - 5.0 / 6.0).abs() < 1e-12);
        assert_eq!(result.required_count, 6);
        assert!(
            result.final_score * 100.0 >= 60.0,
            "final score {} below Good Match",
            result.final_score
        );
        assert!(matches!(result.rating, Rating::Good | Rating::Excellent));
        assert!(result.feedback.contains("RESTful API design"));
    }

    #[test]
    fn test_python_django_scenario_with_builtin_taxonomy() {
        let taxonomy = SkillTaxonomy::builtin().unwrap();
        let result = score(RESUME, JD, &taxonomy);
        assert_invariants(&result);

        // "Django or Flask" is one requirement, met by Django
        let missing: Vec<&str> = result.missing_skills.iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["RESTful API design"]);
        let waived: Vec<&str> = result.waived_skills.iter().map(String::as_str).collect();
        assert_eq!(waived, vec!["Flask"]);
        assert_eq!(result.required_count, 6);
        assert!((result.skill_match_score - 5.0 / 6.0).abs() < 1e-12);
        assert!(result.final_score * 100.0 >= 60.0, "final score {}", result.final_score);
        assert_eq!(result.rating, Rating::Good);
        assert!(result.matched_skills.contains("Django"));
        assert!(result.resume_skills.by_category["databases"].contains("MongoDB"));
    }

    #[test]
    fn test_zero_overlap_scenario() {
        let taxonomy = SkillTaxonomy::builtin().unwrap();
        let result = score(
            "Gardening enthusiast who grows roses and tulips",
            "Kernel scheduler interrupts latency",
            &taxonomy,
        );
        assert_invariants(&result);
        assert_eq!(result.similarity_score, 0.0);
        assert_eq!(result.skill_match_score, 1.0);
        assert_eq!(result.final_score, 0.5);
        assert_eq!(result.rating, Rating::Partial);
        assert!(result.jd_skills.is_empty());
    }

    #[test]
    fn test_empty_resume_scenario() {
        let result = score("", JD, &web_taxonomy());
        assert_invariants(&result);
        assert_eq!(result.similarity_score, 0.0);
        assert_eq!(result.skill_match_score, 0.0);
        assert_eq!(result.final_score, 0.0);
        assert_eq!(result.rating, Rating::Poor);
        assert_eq!(result.missing_skills.len(), 6);
    }

    #[test]
    fn test_both_empty_never_fails() {
        let result = score("", "", &web_taxonomy());
        assert_invariants(&result);
        assert_eq!(result.similarity_score, 0.0);
        assert_eq!(result.skill_match_score, 1.0);
    }

    #[test]
    fn test_self_similarity_is_one() {
        let result = score(JD, JD, &web_taxonomy());
        assert_eq!(result.similarity_score, 1.0);
        assert_eq!(result.skill_match_score, 1.0);
        assert_eq!(result.final_score, 1.0);
        assert_eq!(result.rating, Rating::Excellent);
        assert!(result.feedback.ends_with("All required skills are covered."));
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let taxonomy = web_taxonomy();
        let forward = score(RESUME, JD, &taxonomy);
        let backward = score(JD, RESUME, &taxonomy);
        assert_eq!(forward.similarity_score, backward.similarity_score);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let taxonomy = web_taxonomy();
        assert_eq!(score(RESUME, JD, &taxonomy), score(RESUME, JD, &taxonomy));
    }

    #[test]
    fn test_stemming_only_affects_similarity() {
        let taxonomy = web_taxonomy();
        let plain = score_with_options(
            "Deployed services on AWS",
            "Deploying service to AWS",
            &taxonomy,
            &NormalizerOptions::default(),
        );
        let stemmed = score_with_options(
            "Deployed services on AWS",
            "Deploying service to AWS",
            &taxonomy,
            &NormalizerOptions { stem: true },
        );
        assert!(stemmed.similarity_score > plain.similarity_score);
        assert_eq!(stemmed.skill_match_score, plain.skill_match_score);
    }

    #[test]
    fn test_trait_scorer_delegates_to_pipeline() {
        let taxonomy = Arc::new(web_taxonomy());
        let scorer: Arc<dyn MatchScorer> =
            Arc::new(TfidfMatchScorer::new(taxonomy.clone(), NormalizerOptions::default()));
        assert_eq!(scorer.score(RESUME, JD), score(RESUME, JD, &taxonomy));
        assert_eq!(scorer.score(RESUME, JD).scorer_backend, "tfidf");
    }

    #[test]
    fn test_trait_scorer_with_stemming_uses_options() {
        let taxonomy = Arc::new(web_taxonomy());
        let scorer = TfidfMatchScorer::new(taxonomy.clone(), NormalizerOptions { stem: true });
        let expected = score_with_options(
            "Deployed services",
            "Deploying service",
            &taxonomy,
            &NormalizerOptions { stem: true },
        );
        assert_eq!(scorer.score("Deployed services", "Deploying service"), expected);
    }

    #[test]
    fn test_scorer_is_shareable_across_threads() {
        let scorer: Arc<dyn MatchScorer> = Arc::new(TfidfMatchScorer::new(
            Arc::new(web_taxonomy()),
            NormalizerOptions::default(),
        ));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let scorer = scorer.clone();
                std::thread::spawn(move || scorer.score(RESUME, JD).final_score)
            })
            .collect();
        let scores: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] == w[1]));
    }
}

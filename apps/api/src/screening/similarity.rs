//! Similarity engine: two-document TF-IDF cosine similarity.
//!
//! tf is the raw term count. idf is smoothed over the two-document corpus,
//! `ln((1 + n) / (1 + df)) + 1` with n = 2, so a term shared by both documents
//! still carries weight 1.0 while a term unique to one document weighs ~1.405.
//!
//! Terms are visited in sorted order and the norm product is taken as
//! `sqrt(|a|² · |b|²)`: similarity(a, b) == similarity(b, a) bit for bit and
//! similarity(d, d) == 1.0 exactly for any non-empty d.

use std::collections::{BTreeMap, BTreeSet};

/// Corpus size for the pairwise weighting scheme.
const DOCUMENT_COUNT: f64 = 2.0;

/// Smoothed inverse document frequency for a term found in `document_frequency` of the two documents.
pub fn smoothed_idf(document_frequency: usize) -> f64 {
    ((1.0 + DOCUMENT_COUNT) / (1.0 + document_frequency as f64)).ln() + 1.0
}

fn term_frequencies(tokens: &[String]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

/// TF-IDF weight vectors for both documents over their shared vocabulary.
pub fn tfidf_vectors<'a>(
    resume: &'a [String],
    jd: &'a [String],
) -> (BTreeMap<&'a str, f64>, BTreeMap<&'a str, f64>) {
    let tf_resume = term_frequencies(resume);
    let tf_jd = term_frequencies(jd);

    let mut resume_weights = BTreeMap::new();
    let mut jd_weights = BTreeMap::new();

    let vocabulary: BTreeSet<&str> = tf_resume.keys().chain(tf_jd.keys()).copied().collect();
    for term in vocabulary {
        let in_resume = tf_resume.get(term).copied().unwrap_or(0);
        let in_jd = tf_jd.get(term).copied().unwrap_or(0);
        let df = usize::from(in_resume > 0) + usize::from(in_jd > 0);
        let idf = smoothed_idf(df);

        if in_resume > 0 {
            resume_weights.insert(term, in_resume as f64 * idf);
        }
        if in_jd > 0 {
            jd_weights.insert(term, in_jd as f64 * idf);
        }
    }

    (resume_weights, jd_weights)
}

/// Cosine similarity of the two TF-IDF vectors, in [0, 1]. A zero-norm side yields 0.
pub fn cosine_similarity(resume: &[String], jd: &[String]) -> f64 {
    let (resume_weights, jd_weights) = tfidf_vectors(resume, jd);
    if resume_weights.is_empty() || jd_weights.is_empty() {
        return 0.0;
    }

    let vocabulary: BTreeSet<&str> = resume_weights
        .keys()
        .chain(jd_weights.keys())
        .copied()
        .collect();

    let mut dot = 0.0_f64;
    let mut resume_sq = 0.0_f64;
    let mut jd_sq = 0.0_f64;
    for term in vocabulary {
        let a = resume_weights.get(term).copied().unwrap_or(0.0);
        let b = jd_weights.get(term).copied().unwrap_or(0.0);
        dot += a * b;
        resume_sq += a * a;
        jd_sq += b * b;
    }

    if resume_sq == 0.0 || jd_sq == 0.0 {
        return 0.0;
    }

    (dot / (resume_sq * jd_sq).sqrt()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_identical_documents_score_exactly_one() {
        for text in [
            "rust",
            "python django postgresql aws docker",
            "kafka kafka kafka streams streams zookeeper",
        ] {
            let doc = tokens(text);
            assert_eq!(cosine_similarity(&doc, &doc), 1.0, "text: {text}");
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let pairs = [
            ("python django aws", "python flask aws docker"),
            ("rust rust tokio axum", "tokio async runtime rust"),
            ("a b c d e f", "f e d"),
        ];
        for (a, b) in pairs {
            let (a, b) = (tokens(a), tokens(b));
            assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        }
    }

    #[test]
    fn test_disjoint_vocabulary_scores_zero() {
        let a = tokens("gardening roses tulips");
        let b = tokens("kernel scheduler interrupts");
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let empty: Vec<String> = vec![];
        let doc = tokens("python django");
        assert_eq!(cosine_similarity(&empty, &doc), 0.0);
        assert_eq!(cosine_similarity(&doc, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_shared_terms_are_down_weighted() {
        assert_eq!(smoothed_idf(2), 1.0);
        assert!((smoothed_idf(1) - (1.5_f64.ln() + 1.0)).abs() < 1e-12);
        assert!(smoothed_idf(1) > smoothed_idf(2));

        let resume = tokens("python git");
        let jd = tokens("python flask");
        let (r, j) = tfidf_vectors(&resume, &jd);
        assert_eq!(r["python"], 1.0);
        assert_eq!(j["python"], 1.0);
        assert!(r["git"] > r["python"]);
        assert!(!r.contains_key("flask"));
    }

    #[test]
    fn test_term_frequency_scales_weight() {
        let resume = tokens("rust rust rust");
        let jd = tokens("rust");
        let (r, j) = tfidf_vectors(&resume, &jd);
        assert_eq!(r["rust"], 3.0);
        assert_eq!(j["rust"], 1.0);
        // single shared term: vectors are parallel regardless of magnitude
        assert_eq!(cosine_similarity(&resume, &jd), 1.0);
    }

    #[test]
    fn test_partial_overlap_matches_hand_computation() {
        // 5 shared terms (w = 1), 2 resume-only and 4 jd-only terms (w = idf(1))
        let resume = tokens("python django mongodb postgresql aws docker git");
        let jd = tokens("python django flask postgresql aws docker restful api design");
        let w = smoothed_idf(1);
        let expected = 5.0 / ((5.0 + 2.0 * w * w) * (5.0 + 4.0 * w * w)).sqrt();

        let score = cosine_similarity(&resume, &jd);
        assert!((score - expected).abs() < 1e-12, "score {score}, expected {expected}");
        assert!(score > 0.45 && score < 0.48);
    }

    #[test]
    fn test_score_is_bounded() {
        let a = tokens("x y z x y z q");
        let b = tokens("x q r s");
        let score = cosine_similarity(&a, &b);
        assert!((0.0..=1.0).contains(&score));
    }
}

//! Feedback generation: a deterministic summary sentence per rating band plus missing skills.

use std::collections::BTreeSet;

use crate::screening::aggregator::Rating;

/// At most this many missing skills are named; the rest collapse into "(+N more)".
pub const MAX_LISTED_MISSING: usize = 5;

fn headline(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "Excellent match. This resume aligns well with the job requirements.",
        Rating::Good => "Good match. The candidate has relevant skills and experience.",
        Rating::Partial => {
            "Partial match. The candidate has some relevant skills but may lack others."
        }
        Rating::Limited => {
            "Limited match. Consider looking for candidates with more aligned experience."
        }
        Rating::Poor => "Poor match. The resume shows little overlap with the job requirements.",
    }
}

/// Builds the feedback string. Same inputs always produce the same string.
pub fn generate_feedback(rating: Rating, missing_skills: &BTreeSet<String>) -> String {
    let mut feedback = headline(rating).to_string();

    if missing_skills.is_empty() {
        feedback.push_str(" All required skills are covered.");
        return feedback;
    }

    let listed: Vec<&str> = missing_skills
        .iter()
        .take(MAX_LISTED_MISSING)
        .map(String::as_str)
        .collect();
    feedback.push_str(&format!(" Missing skills: {}", listed.join(", ")));

    let remaining = missing_skills.len().saturating_sub(MAX_LISTED_MISSING);
    if remaining > 0 {
        feedback.push_str(&format!(" (+{remaining} more)"));
    }
    feedback.push('.');

    feedback
}

//! Skill matching: coverage of the JD's required skills by the resume.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::screening::extractor::ExtractedSkills;

/// Coverage of JD requirements by resume skills.
///
/// A requirement is either a single JD skill or an alternative group ("Django or Flask")
/// that any one member satisfies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// satisfied requirements / requirements, or 1.0 when the JD names no skills.
    pub score: f64,
    /// JD skills the resume has.
    pub matched: BTreeSet<String>,
    /// Skills of unsatisfied requirements.
    pub missing: BTreeSet<String>,
    /// Alternatives the resume lacks but does not need: another option of the same
    /// requirement is matched.
    pub waived: BTreeSet<String>,
    /// Number of requirements; an alternative group counts once.
    pub required_count: usize,
    /// Unique taxonomy skills found in the resume, required or not.
    pub found_count: usize,
}

/// Compares the resume's skills with the JD's requirements.
///
/// A JD with no extractable skills states no requirements, so it is trivially
/// satisfied: score 1.0 with empty matched / missing sets.
///
/// `matched`, `missing` and `waived` are disjoint and together cover every JD skill.
pub fn match_skills(resume: &ExtractedSkills, jd: &ExtractedSkills) -> SkillMatch {
    let resume_skills = resume.flatten();
    let requirements = requirements(jd);

    let mut matched = BTreeSet::new();
    let mut missing = BTreeSet::new();
    let mut waived = BTreeSet::new();
    let mut satisfied = 0usize;

    for requirement in &requirements {
        let held: BTreeSet<String> = requirement.intersection(&resume_skills).cloned().collect();
        if held.is_empty() {
            missing.extend(requirement.iter().cloned());
        } else {
            satisfied += 1;
            waived.extend(requirement.difference(&held).cloned());
            matched.extend(held);
        }
    }

    let score = if requirements.is_empty() {
        1.0
    } else {
        (satisfied as f64 / requirements.len() as f64).clamp(0.0, 1.0)
    };

    SkillMatch {
        score,
        matched,
        missing,
        waived,
        required_count: requirements.len(),
        found_count: resume_skills.len(),
    }
}

/// Splits the JD's skills into requirements. Alternative groups sharing a skill merge;
/// every other skill stands alone.
fn requirements(jd: &ExtractedSkills) -> Vec<BTreeSet<String>> {
    let required = jd.flatten();
    let mut groups: Vec<BTreeSet<String>> = Vec::new();

    for alternative in &jd.alternatives {
        let mut merged: BTreeSet<String> = alternative.intersection(&required).cloned().collect();
        groups.retain(|group| {
            if group.is_disjoint(&merged) {
                true
            } else {
                merged.extend(group.iter().cloned());
                false
            }
        });
        if !merged.is_empty() {
            groups.push(merged);
        }
    }

    for skill in &required {
        if !groups.iter().any(|group| group.contains(skill)) {
            groups.push(BTreeSet::from([skill.clone()]));
        }
    }

    groups
}

//! Skill extraction: finds taxonomy skills mentioned in a document.
//!
//! Algorithm:
//! 1. Run the taxonomy's phrase automaton over the skill text, collecting overlapping hits
//! 2. Keep hits whose neighbours are not alphanumeric ("java" never fires inside "javascript")
//! 3. Drop any hit strictly contained in a longer kept hit (longest phrase wins)
//! 4. Fold every surviving phrase to its canonical skill, grouped by category
//! 5. Record runs of skills joined only by "or" ("django or flask") as alternative groups

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::screening::taxonomy::SkillTaxonomy;

/// Skills found in one document, grouped by taxonomy category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkills {
    pub by_category: BTreeMap<String, BTreeSet<String>>,
    /// Canonical skill → number of mentions.
    pub frequencies: BTreeMap<String, usize>,
    /// Skills offered as interchangeable options, e.g. "Django or Flask". Each group has
    /// at least two distinct names.
    #[serde(default)]
    pub alternatives: Vec<BTreeSet<String>>,
}

impl ExtractedSkills {
    /// Union of matched skills across all categories.
    pub fn flatten(&self) -> BTreeSet<String> {
        self.by_category.values().flatten().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }

    pub fn total_unique(&self) -> usize {
        self.flatten().len()
    }
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    start: usize,
    end: usize,
    pattern: usize,
}

/// Extracts skills from already-normalized skill text (see [`crate::screening::normalizer::skill_text`]).
pub fn extract_skills(text: &str, taxonomy: &SkillTaxonomy) -> ExtractedSkills {
    let mut extracted = ExtractedSkills::default();

    let Some(matcher) = taxonomy.matcher() else {
        return extracted;
    };
    if text.is_empty() {
        return extracted;
    }

    let mut hits: Vec<Hit> = matcher
        .find_overlapping_iter(text)
        .filter(|m| on_word_boundary(text, m.start(), m.end()))
        .map(|m| Hit {
            start: m.start(),
            end: m.end(),
            pattern: m.pattern().as_usize(),
        })
        .collect();

    // start ascending, longer first: any earlier hit reaching past `end` contains this one
    hits.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut reach = 0usize;
    let mut previous_end: Option<usize> = None;
    let mut group: BTreeSet<String> = BTreeSet::new();
    for hit in hits {
        let contained = reach >= hit.end;
        reach = reach.max(hit.end);
        if contained {
            continue;
        }

        let mut names = BTreeSet::new();
        for &owner in taxonomy.owners(hit.pattern) {
            let name = taxonomy.skill_name(owner).to_string();
            extracted
                .by_category
                .entry(taxonomy.category_name(owner).to_string())
                .or_default()
                .insert(name.clone());
            names.insert(name);
        }
        for name in &names {
            *extracted.frequencies.entry(name.clone()).or_insert(0) += 1;
        }

        let joined = previous_end
            .filter(|&end| end <= hit.start)
            .map_or(false, |end| is_or_gap(&text[end..hit.start]));
        if !joined {
            push_group(&mut extracted.alternatives, std::mem::take(&mut group));
        }
        group.extend(names);
        previous_end = Some(hit.end);
    }
    push_group(&mut extracted.alternatives, group);

    debug!(
        "Extracted {} unique skills across {} categories",
        extracted.total_unique(),
        extracted.by_category.len()
    );

    extracted
}

/// True when the text between two skills is just the word "or".
fn is_or_gap(gap: &str) -> bool {
    let mut words = gap.split_whitespace();
    words.next() == Some("or") && words.next().is_none()
}

fn push_group(alternatives: &mut Vec<BTreeSet<String>>, group: BTreeSet<String>) {
    if group.len() >= 2 && !alternatives.contains(&group) {
        alternatives.push(group);
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

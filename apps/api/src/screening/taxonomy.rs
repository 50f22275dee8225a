//! Skill taxonomy: immutable category → canonical skill mapping.
//!
//! Built once at startup (built-in JSON or `SKILLS_TAXONOMY_PATH`), validated, then shared
//! read-only behind an `Arc`. Construction compiles every skill name and synonym into one
//! Aho–Corasick automaton so extraction is a single pass over the text.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::screening::normalizer::skill_text;

const BUILTIN_TAXONOMY: &str = include_str!("../../data/skills.json");

/// Top-level taxonomy object, read entry by entry so a repeated category key
/// reaches validation instead of silently replacing the earlier one.
struct RawCategories(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawCategories;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping category names to skill lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawCategories, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RawCategories(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Configuration errors. Raised at load time only, never while scoring.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Failed to read taxonomy file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Taxonomy is not a JSON object of category -> skill list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Category '{category}' has an invalid skill list: {source}")]
    InvalidCategory {
        category: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    #[error("Duplicate category '{0}'")]
    DuplicateCategory(String),

    #[error("Category '{category}' contains an empty skill name")]
    EmptySkillName { category: String },

    #[error("Category '{category}' lists '{name}' more than once (case-insensitive)")]
    DuplicateSkill { category: String, name: String },

    #[error("Failed to build skill matcher: {0}")]
    Automaton(String),
}

/// One skill as written in the taxonomy source: a bare name, or a name with synonyms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillEntry {
    Name(String),
    WithSynonyms {
        name: String,
        #[serde(default)]
        synonyms: Vec<String>,
    },
}

impl SkillEntry {
    fn name(&self) -> &str {
        match self {
            SkillEntry::Name(name) => name,
            SkillEntry::WithSynonyms { name, .. } => name,
        }
    }

    fn synonyms(&self) -> &[String] {
        match self {
            SkillEntry::Name(_) => &[],
            SkillEntry::WithSynonyms { synonyms, .. } => synonyms,
        }
    }
}

/// A category as written in the taxonomy source, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpec {
    pub name: String,
    pub skills: Vec<SkillEntry>,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, skills: Vec<SkillEntry>) -> Self {
        Self {
            name: name.into(),
            skills,
        }
    }
}

#[derive(Debug, Clone)]
struct Skill {
    name: String,
}

#[derive(Debug, Clone)]
struct Category {
    name: String,
    skills: Vec<Skill>,
}

/// Address of a canonical skill inside the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkillRef {
    pub category: usize,
    pub skill: usize,
}

/// Validated, immutable skill taxonomy. No mutation API; safe to share across threads.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    categories: Vec<Category>,
    matcher: Option<AhoCorasick>,
    /// Pattern id → every skill that registered that phrase.
    owners: Vec<Vec<SkillRef>>,
}

impl SkillTaxonomy {
    /// Validates the source and compiles the phrase automaton.
    pub fn new(specs: Vec<CategorySpec>) -> Result<Self, TaxonomyError> {
        let mut categories = Vec::with_capacity(specs.len());
        let mut seen_categories = HashSet::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut pattern_ids: HashMap<String, usize> = HashMap::new();
        let mut owners: Vec<Vec<SkillRef>> = Vec::new();

        for (category_idx, spec) in specs.into_iter().enumerate() {
            let category_name = spec.name.trim().to_string();
            if category_name.is_empty() {
                return Err(TaxonomyError::EmptyCategoryName);
            }
            if !seen_categories.insert(category_name.to_lowercase()) {
                return Err(TaxonomyError::DuplicateCategory(category_name));
            }

            // phrase → owning skill index, scoped to this category
            let mut phrases: HashMap<String, usize> = HashMap::new();
            let mut skills = Vec::with_capacity(spec.skills.len());

            for (skill_idx, entry) in spec.skills.iter().enumerate() {
                let name = entry.name().trim().to_string();
                if skill_text(&name).is_empty() {
                    return Err(TaxonomyError::EmptySkillName {
                        category: category_name,
                    });
                }

                let variants = std::iter::once(entry.name())
                    .chain(entry.synonyms().iter().map(String::as_str));
                for variant in variants {
                    let phrase = skill_text(variant);
                    if phrase.is_empty() {
                        return Err(TaxonomyError::EmptySkillName {
                            category: category_name,
                        });
                    }
                    match phrases.get(&phrase).copied() {
                        Some(owner) if owner == skill_idx => continue,
                        Some(_) => {
                            return Err(TaxonomyError::DuplicateSkill {
                                category: category_name,
                                name: variant.trim().to_string(),
                            })
                        }
                        None => {
                            phrases.insert(phrase.clone(), skill_idx);
                        }
                    }

                    let pattern_id = *pattern_ids.entry(phrase.clone()).or_insert_with(|| {
                        patterns.push(phrase);
                        owners.push(Vec::new());
                        patterns.len() - 1
                    });
                    owners[pattern_id].push(SkillRef {
                        category: category_idx,
                        skill: skill_idx,
                    });
                }

                skills.push(Skill { name });
            }

            categories.push(Category {
                name: category_name,
                skills,
            });
        }

        let matcher = if patterns.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::Standard)
                    .build(&patterns)
                    .map_err(|e| TaxonomyError::Automaton(e.to_string()))?,
            )
        };

        debug!(
            "Compiled skill taxonomy: {} categories, {} phrases",
            categories.len(),
            patterns.len()
        );

        Ok(Self {
            categories,
            matcher,
            owners,
        })
    }

    /// Parses `{ "category": [ "skill" | { "name", "synonyms" } ] }`, keeping category order.
    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        let RawCategories(raw) = serde_json::from_str(json)?;

        let specs = raw
            .into_iter()
            .map(|(category, value)| {
                serde_json::from_value::<Vec<SkillEntry>>(value)
                    .map(|skills| CategorySpec::new(category.clone(), skills))
                    .map_err(|source| TaxonomyError::InvalidCategory { category, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(specs)
    }

    /// Loads a taxonomy JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let taxonomy = Self::from_json_str(&json)?;
        info!(
            "Loaded skill taxonomy from {} ({} skills)",
            path.display(),
            taxonomy.skill_count()
        );
        Ok(taxonomy)
    }

    /// The taxonomy bundled with the binary.
    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::from_json_str(BUILTIN_TAXONOMY)
    }

    /// Category names in source order.
    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Canonical skill names of one category; empty for an unknown category.
    pub fn skills(&self, category: &str) -> BTreeSet<&str> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.skills.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Every canonical skill name across all categories.
    pub fn all_skills(&self) -> BTreeSet<&str> {
        self.categories
            .iter()
            .flat_map(|c| c.skills.iter().map(|s| s.name.as_str()))
            .collect()
    }

    pub fn skill_count(&self) -> usize {
        self.categories.iter().map(|c| c.skills.len()).sum()
    }

    pub fn category_name(&self, skill: SkillRef) -> &str {
        &self.categories[skill.category].name
    }

    pub fn skill_name(&self, skill: SkillRef) -> &str {
        &self.categories[skill.category].skills[skill.skill].name
    }

    pub(crate) fn matcher(&self) -> Option<&AhoCorasick> {
        self.matcher.as_ref()
    }

    pub(crate) fn owners(&self, pattern_id: usize) -> &[SkillRef] {
        &self.owners[pattern_id]
    }
}

//! Text normalization: turns raw resume / JD text into the two forms the pipeline needs:
//!
//! - a stopword-free token sequence (optionally stemmed) for term-weighted similarity
//! - an unstemmed, punctuation-normalized phrase text for skill extraction
//!
//! Never fails: any string, including the empty string, normalizes to a (possibly empty) value.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// NLTK English stopword list (contraction forms omitted; tokens never contain apostrophes).
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:https?://|www\.)\S+").expect("valid URL regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").expect("valid e-mail regex"));

/// Punctuation that carries meaning inside skill names (`c++`, `c#`, `node.js`, `ci/cd`).
const SKILL_PUNCTUATION: &[char] = &['+', '#', '.', '-', '/'];

/// Tunables for the similarity token stream. Skill text is never stemmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizerOptions {
    /// Reduce tokens to a root form with a light suffix stemmer.
    pub stem: bool,
}

/// A request-local document: the raw text plus its normalized token sequence.
/// Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Document {
    pub raw_text: String,
    pub normalized_tokens: Vec<String>,
}

impl Document {
    pub fn new(raw_text: &str, options: &NormalizerOptions) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            normalized_tokens: normalize_tokens(raw_text, options),
        }
    }

    /// Phrase text used by skill extraction.
    pub fn skill_text(&self) -> String {
        skill_text(&self.raw_text)
    }
}

/// Removes URLs and e-mail addresses, which only add noise to term statistics.
pub fn strip_noise(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, " ");
    EMAIL_RE.replace_all(&without_urls, " ").into_owned()
}

/// Lowercases, strips noise, splits on non-alphanumeric boundaries and drops stopwords.
pub fn normalize_tokens(text: &str, options: &NormalizerOptions) -> Vec<String> {
    let lowered = strip_noise(&text.to_lowercase());

    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !STOPWORD_SET.contains(token))
        .map(|token| {
            if options.stem {
                stem(token)
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// Lowercased, whitespace-collapsed text with punctuation outside [`SKILL_PUNCTUATION`]
/// replaced by spaces. Taxonomy phrases go through the same function so both sides agree.
pub fn skill_text(text: &str) -> String {
    let lowered: Vec<char> = text.to_lowercase().chars().collect();
    let mut mapped = String::with_capacity(lowered.len());

    for (i, &c) in lowered.iter().enumerate() {
        if c.is_alphanumeric() || SKILL_PUNCTUATION.contains(&c) {
            mapped.push(c);
        } else if c == '&' && joins_word(&lowered, i) {
            // "r&d" and "at&t" stay one word, so "r" and "t" never match on their own
        } else {
            mapped.push(' ');
        }
    }

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn joins_word(chars: &[char], i: usize) -> bool {
    i > 0
        && chars[i - 1].is_alphanumeric()
        && chars.get(i + 1).map_or(false, |c| c.is_alphanumeric())
}

/// Light English suffix stripper. Short tokens are left alone so acronyms survive.
pub fn stem(token: &str) -> String {
    let len = token.chars().count();
    if len <= 3 || !token.is_ascii() {
        return token.to_string();
    }

    if let Some(base) = token.strip_suffix("sses") {
        return format!("{base}ss");
    }
    if len > 4 {
        if let Some(base) = token.strip_suffix("ies") {
            return format!("{base}y");
        }
    }
    if len > 5 {
        if let Some(base) = token.strip_suffix("ing") {
            return base.to_string();
        }
    }
    if len > 4 {
        if let Some(base) = token.strip_suffix("ed") {
            return base.to_string();
        }
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}

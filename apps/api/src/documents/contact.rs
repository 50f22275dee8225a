use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid e-mail regex")
});

// Basic US format: optional +1, optional parentheses, `-`, `.` or space separators.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}")
        .expect("valid phone regex")
});

/// Only the first few lines of a resume are considered for the candidate name.
const NAME_SCAN_LINES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Best-effort contact details from raw resume text (newlines intact).
///
/// - email: first address-shaped token
/// - phone: first US-style number
/// - name: first of the leading lines with 2–4 words and under 60 characters
pub fn extract_contact_info(text: &str) -> ContactInfo {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(text).map(|m| m.as_str().to_string());

    let name = text
        .lines()
        .take(NAME_SCAN_LINES)
        .map(str::trim)
        .find(|line| {
            let words = line.split_whitespace().count();
            !line.is_empty() && (2..=4).contains(&words) && line.chars().count() < 60
        })
        .map(str::to_string);

    ContactInfo { name, email, phone }
}

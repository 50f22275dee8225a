use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; persistence is disabled when `DATABASE_URL` is unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    /// JSON taxonomy file. The built-in taxonomy is used when unset.
    pub skills_taxonomy_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub max_text_chars: usize,
    pub history_limit: i64,
    pub stem_tokens: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            skills_taxonomy_path: None,
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            max_text_chars: 100_000,
            history_limit: 50,
            stem_tokens: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            skills_taxonomy_path: optional_env("SKILLS_TAXONOMY_PATH"),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_text_chars: parse_env("MAX_TEXT_CHARS", defaults.max_text_chars)?,
            history_limit: parse_env("HISTORY_LIMIT", defaults.history_limit)?,
            stem_tokens: parse_env("STEM_TOKENS", defaults.stem_tokens)?,
        })
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 52_428_800);
        assert_eq!(config.max_text_chars, 100_000);
        assert_eq!(config.history_limit, 50);
        assert!(!config.stem_tokens);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("SCREENER_TEST_UNSET_PORT", 9000).unwrap();
        assert_eq!(value, 9000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCREENER_TEST_BAD_LIMIT", "fifty");
        let err = parse_env::<i64>("SCREENER_TEST_BAD_LIMIT", 50).unwrap_err();
        assert!(err.to_string().contains("SCREENER_TEST_BAD_LIMIT"));
    }

    #[test]
    fn test_parse_env_reads_bool() {
        std::env::set_var("SCREENER_TEST_STEM", "true");
        assert!(parse_env("SCREENER_TEST_STEM", false).unwrap());
    }
}

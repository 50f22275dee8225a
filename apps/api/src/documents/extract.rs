//! Text extraction: pluggable, trait-based extractor turning uploaded bytes into plain text.
//!
//! Default: `DocumentExtractor` (PDF via `pdf-extract`, UTF-8 plain text).
//! `AppState` holds an `Arc<dyn TextExtractor>`.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No file selected")]
    MissingFileName,

    #[error("File type not allowed: '{0}'. Allowed: pdf, txt")]
    UnsupportedFormat(String),

    #[error("Uploaded document contains no text")]
    Empty,

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Supported upload formats, resolved from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        if filename.trim().is_empty() {
            return Err(ExtractionError::MissingFileName);
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::PlainText),
            other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, filename: &str, content: Bytes) -> Result<String, ExtractionError>;
}

/// Default extractor. PDF parsing is CPU-bound and runs on the blocking pool.
pub struct DocumentExtractor;

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, filename: &str, content: Bytes) -> Result<String, ExtractionError> {
        let format = DocumentFormat::from_filename(filename)?;
        debug!("Extracting {format:?} text from '{filename}' ({} bytes)", content.len());

        let text = match format {
            DocumentFormat::PlainText => String::from_utf8_lossy(&content).into_owned(),
            DocumentFormat::Pdf => tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&content)
                    .map_err(|e| ExtractionError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??,
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            warn!("No text extracted from '{filename}'");
            return Err(ExtractionError::Empty);
        }
        Ok(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text hygiene
// ────────────────────────────────────────────────────────────────────────────

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max_chars` characters, on a char boundary.
/// Scoring cost grows with input length, so the service caps text before scoring.
pub fn cap_text(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::documents::contact::{extract_contact_info, ContactInfo};
use crate::documents::extract::{cap_text, clean_text};
use crate::errors::AppError;
use crate::models::screening::{CandidateRow, ScreeningRow};
use crate::screening::scorer::MatchResult;
use crate::screening::storage::{
    get_candidates, get_screening_by_id, get_screening_history, save_candidate, save_screening,
    NewScreening,
};
use crate::state::AppState;

/// Stored as the JD "filename" when the JD arrives as form or JSON text.
const PASTED_JD_FILENAME: &str = "uploaded_jd.txt";
const PASTED_RESUME_FILENAME: &str = "pasted_resume.txt";

#[derive(Debug, Deserialize)]
pub struct ScreenTextRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub resume_filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    pub candidate_info: ContactInfo,
    /// Present only when the screening was persisted.
    pub screening_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// POST /api/v1/screen
/// Multipart form: `resume` (pdf or txt file) and `jd_text`.
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut resume: Option<(String, Bytes)> = None;
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?;
                resume = Some((filename, content));
            }
            "jd_text" => jd_text = Some(field.text().await?),
            _ => {}
        }
    }

    let (filename, content) =
        resume.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    let jd_text = require_text(jd_text, "No job description provided")?;

    let resume_text = state.extractor.extract(&filename, content).await?;
    let response = run_screening(&state, &filename, resume_text, jd_text).await?;
    Ok(Json(response))
}

/// POST /api/v1/screen/text
pub async fn handle_screen_text(
    State(state): State<AppState>,
    Json(req): Json<ScreenTextRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let resume_text = require_text(Some(req.resume_text), "No resume text provided")?;
    let jd_text = require_text(Some(req.jd_text), "No job description provided")?;
    let filename = req
        .resume_filename
        .unwrap_or_else(|| PASTED_RESUME_FILENAME.to_string());

    let response = run_screening(&state, &filename, resume_text, jd_text).await?;
    Ok(Json(response))
}

/// GET /api/v1/history?limit=N
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<ScreeningRow>>, AppError> {
    let limit = resolve_limit(params.limit, state.config.history_limit)?;
    let pool = state.require_db()?;
    Ok(Json(get_screening_history(pool, limit).await?))
}

/// GET /api/v1/screenings/:id
pub async fn handle_get_screening(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScreeningRow>, AppError> {
    let pool = state.require_db()?;
    let screening = get_screening_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Screening {id} not found")))?;
    Ok(Json(screening))
}

/// GET /api/v1/candidates?limit=N
pub async fn handle_candidates(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<CandidateRow>>, AppError> {
    let limit = resolve_limit(params.limit, state.config.history_limit)?;
    let pool = state.require_db()?;
    Ok(Json(get_candidates(pool, limit).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared flow
// ────────────────────────────────────────────────────────────────────────────

/// Caps both texts, scores them off the async runtime, and persists when a pool is configured.
async fn run_screening(
    state: &AppState,
    resume_filename: &str,
    resume_text: String,
    jd_text: String,
) -> Result<ScreeningResponse, AppError> {
    let max_chars = state.config.max_text_chars;
    let resume_text = cap_text(&resume_text, max_chars).to_string();
    let jd_text = cap_text(&jd_text, max_chars).to_string();

    // Contact details need the original line breaks.
    let candidate_info = extract_contact_info(&resume_text);

    let scorer = state.scorer.clone();
    let resume_clean = clean_text(&resume_text);
    let jd_clean = clean_text(&jd_text);
    let result = tokio::task::spawn_blocking(move || scorer.score(&resume_clean, &jd_clean))
        .await
        .map_err(|e| anyhow::anyhow!("Scoring task failed: {e}"))?;

    info!(
        final_score = result.final_score,
        "Screened '{resume_filename}': {} ({}/{} skills)",
        result.rating,
        result.found_count,
        result.required_count
    );

    let screening_id = match &state.db {
        Some(pool) => {
            let id = save_screening(
                pool,
                NewScreening {
                    result: &result,
                    resume_filename,
                    jd_filename: PASTED_JD_FILENAME,
                    resume_text: &resume_text,
                    jd_text: &jd_text,
                },
            )
            .await?;
            save_candidate(pool, &candidate_info, &resume_text, resume_filename).await?;
            Some(id)
        }
        None => None,
    };

    Ok(ScreeningResponse {
        result,
        candidate_info,
        screening_id,
    })
}

fn require_text(text: Option<String>, message: &str) -> Result<String, AppError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

fn resolve_limit(requested: Option<i64>, default: i64) -> Result<i64, AppError> {
    match requested {
        None => Ok(default),
        Some(limit) if limit > 0 => Ok(limit),
        Some(limit) => Err(AppError::Validation(format!(
            "limit must be a positive integer, got {limit}"
        ))),
    }
}

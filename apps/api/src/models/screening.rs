use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningRow {
    pub id: Uuid,
    pub resume_filename: String,
    pub jd_filename: String,
    pub final_score: f64,
    pub similarity_score: f64,
    pub skill_match_score: f64,
    pub rating: String,
    pub feedback: String,
    /// matched/missing skills and per-category extraction, as produced by the scorer.
    pub skill_details: Value,
    pub resume_text: String,
    pub jd_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub resume_text: String,
    pub resume_filename: String,
    pub created_at: DateTime<Utc>,
}

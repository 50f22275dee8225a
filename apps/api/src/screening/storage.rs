//! Screening persistence: PostgreSQL via runtime `sqlx` queries.
//!
//! Rows are insert-only; the schema is created at startup.

use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::documents::contact::ContactInfo;
use crate::documents::extract::cap_text;
use crate::models::screening::{CandidateRow, ScreeningRow};
use crate::screening::scorer::MatchResult;

/// Resume and JD text are truncated to this many characters before storage, in every table.
pub const STORED_TEXT_CHARS: usize = 5000;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS screenings (
        id                UUID PRIMARY KEY,
        resume_filename   TEXT NOT NULL,
        jd_filename       TEXT NOT NULL,
        final_score       DOUBLE PRECISION NOT NULL,
        similarity_score  DOUBLE PRECISION NOT NULL,
        skill_match_score DOUBLE PRECISION NOT NULL,
        rating            TEXT NOT NULL,
        feedback          TEXT NOT NULL,
        skill_details     JSONB NOT NULL,
        resume_text       TEXT NOT NULL,
        jd_text           TEXT NOT NULL,
        created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS screenings_created_at_idx ON screenings (created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS candidates (
        id              UUID PRIMARY KEY,
        name            TEXT NOT NULL,
        email           TEXT,
        phone           TEXT,
        resume_text     TEXT NOT NULL,
        resume_filename TEXT NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Creates the `screenings` and `candidates` tables if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> sqlx::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Screening schema ready");
    Ok(())
}

/// Parameters for recording one screening.
pub struct NewScreening<'a> {
    pub result: &'a MatchResult,
    pub resume_filename: &'a str,
    pub jd_filename: &'a str,
    pub resume_text: &'a str,
    pub jd_text: &'a str,
}

/// Skill-level detail stored alongside the scores.
pub fn skill_details(result: &MatchResult) -> Value {
    json!({
        "matched_skills": result.matched_skills,
        "missing_skills": result.missing_skills,
        "waived_skills": result.waived_skills,
        "required_count": result.required_count,
        "found_count": result.found_count,
        "resume_skills": result.resume_skills,
        "jd_skills": result.jd_skills,
    })
}

pub async fn save_screening(pool: &PgPool, screening: NewScreening<'_>) -> sqlx::Result<Uuid> {
    let NewScreening {
        result,
        resume_filename,
        jd_filename,
        resume_text,
        jd_text,
    } = screening;
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO screenings
            (id, resume_filename, jd_filename, final_score, similarity_score,
             skill_match_score, rating, feedback, skill_details, resume_text, jd_text)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(id)
    .bind(resume_filename)
    .bind(jd_filename)
    .bind(result.final_score)
    .bind(result.similarity_score)
    .bind(result.skill_match_score)
    .bind(result.rating.label())
    .bind(&result.feedback)
    .bind(skill_details(result))
    .bind(cap_text(resume_text, STORED_TEXT_CHARS))
    .bind(cap_text(jd_text, STORED_TEXT_CHARS))
    .execute(pool)
    .await?;

    info!("Saved screening {id} ({resume_filename}: {})", result.rating);
    Ok(id)
}

/// Candidate row as it is stored: only for resumes with a name, text capped like screenings.
#[derive(Debug, PartialEq)]
pub struct CandidateRecord<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub resume_text: &'a str,
    pub resume_filename: &'a str,
}

pub fn candidate_record<'a>(
    contact: &'a ContactInfo,
    resume_text: &'a str,
    resume_filename: &'a str,
) -> Option<CandidateRecord<'a>> {
    Some(CandidateRecord {
        name: contact.name.as_deref()?,
        email: contact.email.as_deref(),
        phone: contact.phone.as_deref(),
        resume_text: cap_text(resume_text, STORED_TEXT_CHARS),
        resume_filename,
    })
}

/// Records the candidate behind a resume. Returns `None` when no name was found.
pub async fn save_candidate(
    pool: &PgPool,
    contact: &ContactInfo,
    resume_text: &str,
    resume_filename: &str,
) -> sqlx::Result<Option<Uuid>> {
    let Some(record) = candidate_record(contact, resume_text, resume_filename) else {
        return Ok(None);
    };
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO candidates (id, name, email, phone, resume_text, resume_filename)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(record.name)
    .bind(record.email)
    .bind(record.phone)
    .bind(record.resume_text)
    .bind(record.resume_filename)
    .execute(pool)
    .await?;

    info!("Saved candidate {} with id {id}", record.name);
    Ok(Some(id))
}

/// Most recent screenings first.
pub async fn get_screening_history(pool: &PgPool, limit: i64) -> sqlx::Result<Vec<ScreeningRow>> {
    sqlx::query_as::<_, ScreeningRow>(
        "SELECT * FROM screenings ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_screening_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<ScreeningRow>> {
    sqlx::query_as::<_, ScreeningRow>("SELECT * FROM screenings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_candidates(pool: &PgPool, limit: i64) -> sqlx::Result<Vec<CandidateRow>> {
    sqlx::query_as::<_, CandidateRow>(
        "SELECT * FROM candidates ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

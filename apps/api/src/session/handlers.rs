use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::batch::{run_batch, BatchFailure};
use crate::analysis::service::Outcome;
use crate::errors::AppError;
use crate::models::analysis::GeneratedQuestions;
use crate::models::resume::ParsedResume;
use crate::routes::multipart::UploadForm;
use crate::session::RankingRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub job_description: Option<String>,
    pub ranking: Vec<RankingRow>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    pub candidate_id: Option<Uuid>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub candidate_id: Uuid,
    pub name: String,
    /// Set when the name matched more than one ranked candidate.
    pub warning: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome<GeneratedQuestions>,
}

/// What a questions request resolved to, copied out of the session.
struct Selection {
    candidate_id: Uuid,
    name: String,
    warning: Option<String>,
    resume: ParsedResume,
    jd_text: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

fn ranking_of(state: &AppState, id: Uuid) -> Result<RankingResponse, AppError> {
    state
        .sessions
        .with_session(id, |session| RankingResponse {
            job_description: session.job_description.clone(),
            ranking: session.ranking(),
            failures: session.failures.clone(),
        })
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session = state.sessions.create();
    info!("Session {} started", session.id);
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).ok_or_else(|| not_found(id))?;
    info!("Session {id} ended");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .with_session(id, |session| session.reset())
        .ok_or_else(|| not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/batch
///
/// Multipart: `jd_text` plus one or more `resumes` files. Files are analysed
/// one at a time; the ranked result replaces the session's previous batch.
pub async fn handle_run_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<RankingResponse>, AppError> {
    if !state.sessions.exists(id) {
        return Err(not_found(id));
    }

    let mut form = UploadForm::read(multipart).await?;
    let jd_text = form.text("jd_text")?;
    let files = form.files("resumes");
    if files.is_empty() {
        return Err(AppError::Validation(
            "Upload at least one resume under 'resumes'".to_string(),
        ));
    }

    info!("Session {id}: ranking {} resumes", files.len());
    let report = run_batch(&state.analyzer, &files, &jd_text, |progress| {
        debug!(
            "Session {id}: {:.0}% analysed",
            progress.fraction() * 100.0
        )
    })
    .await;

    // The session may have been ended while the batch ran.
    state
        .sessions
        .with_session(id, |session| session.store_batch(&jd_text, report))
        .ok_or_else(|| not_found(id))?;

    Ok(Json(ranking_of(&state, id)?))
}

/// GET /api/v1/sessions/:id/ranking
pub async fn handle_get_ranking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RankingResponse>, AppError> {
    Ok(Json(ranking_of(&state, id)?))
}

/// POST /api/v1/sessions/:id/questions
///
/// Generates interview questions for a ranked candidate from the parsed
/// resume stored at batch time. The document is never parsed again.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let selection = state
        .sessions
        .with_session(id, |session| {
            let jd_text = session.job_description.clone().unwrap_or_default();
            let selected = session.select(request.candidate_id, request.name.as_deref())?;
            let entry = selected.item;
            let warning = selected.is_ambiguous().then(|| {
                format!(
                    "{} candidates are named '{}'; using the highest ranked one",
                    selected.duplicates + 1,
                    entry.comparison.name
                )
            });
            Ok::<_, AppError>(Selection {
                candidate_id: entry.candidate_id,
                name: entry.comparison.name.clone(),
                warning,
                resume: entry.resume.clone(),
                jd_text,
            })
        })
        .ok_or_else(|| not_found(id))??;

    let result = state
        .analyzer
        .interview_questions(&selection.resume, &selection.jd_text)
        .await;
    Ok(Json(QuestionsResponse {
        candidate_id: selection.candidate_id,
        name: selection.name,
        warning: selection.warning,
        outcome: Outcome::from_result(result, "generating questions"),
    }))
}


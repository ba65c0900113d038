//! Axum route handlers for single-resume analysis and model listing.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::analysis::service::Outcome;
use crate::errors::AppError;
use crate::models::analysis::{ResumeComparison, ResumeFeedback};
use crate::models::resume::ParsedResume;
use crate::oracle::ModelInfo;
use crate::routes::multipart::UploadForm;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PeerComparison {
    pub resume_a: ParsedResume,
    pub resume_b: ParsedResume,
    pub comparison: ResumeComparison,
}

#[derive(Debug, Serialize)]
pub struct FeedbackReport {
    pub resume: ParsedResume,
    pub feedback: ResumeFeedback,
}

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    pub current: String,
    pub models: Vec<ModelInfo>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Multipart field `resume`. Returns the parsed resume, or a message.
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Outcome<ParsedResume>>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.file("resume")?;

    let result = state.analyzer.parse_resume(&file).await;
    Ok(Json(Outcome::from_result(
        result,
        &format!("parsing resume '{}'", file.file_name),
    )))
}

/// POST /api/v1/resumes/compare
///
/// Multipart fields `resume_a` and `resume_b`. Both are parsed, then compared.
pub async fn handle_compare(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Outcome<PeerComparison>>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let file_a = form.file("resume_a")?;
    let file_b = form.file("resume_b")?;
    let analyzer = &state.analyzer;

    let resume_a = match analyzer.parse_resume(&file_a).await {
        Ok(r) => r,
        Err(e) => {
            let activity = format!("parsing resume '{}'", file_a.file_name);
            return Ok(Json(Outcome::from_result(Err(e), &activity)));
        }
    };
    let resume_b = match analyzer.parse_resume(&file_b).await {
        Ok(r) => r,
        Err(e) => {
            let activity = format!("parsing resume '{}'", file_b.file_name);
            return Ok(Json(Outcome::from_result(Err(e), &activity)));
        }
    };

    let result = analyzer
        .compare_two_resumes(&resume_a, &resume_b)
        .await
        .map(|comparison| PeerComparison {
            resume_a,
            resume_b,
            comparison,
        });
    Ok(Json(Outcome::from_result(result, "during resume comparison")))
}

/// POST /api/v1/resumes/feedback
///
/// Multipart fields `resume` and `jd_text`. Coaching feedback for a candidate,
/// returned together with the parsed resume.
pub async fn handle_feedback(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Outcome<FeedbackReport>>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let jd_text = form.text("jd_text")?;
    let file = form.file("resume")?;
    let analyzer = &state.analyzer;

    let resume = match analyzer.parse_resume(&file).await {
        Ok(r) => r,
        Err(e) => {
            let activity = format!("parsing resume '{}'", file.file_name);
            return Ok(Json(Outcome::from_result(Err(e), &activity)));
        }
    };

    let result = analyzer
        .resume_feedback(&resume, &jd_text)
        .await
        .map(|feedback| FeedbackReport { resume, feedback });
    Ok(Json(Outcome::from_result(result, "generating feedback")))
}

/// GET /api/v1/models
///
/// Models the oracle offers that support `generateContent`.
pub async fn handle_list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelListResponse>, AppError> {
    let models = state
        .analyzer
        .oracle()
        .list_models()
        .await
        .map_err(|e| AppError::Oracle(format!("Listing models failed: {e}")))?;

    Ok(Json(ModelListResponse {
        current: state.analyzer.model().to_string(),
        models: models
            .into_iter()
            .filter(ModelInfo::supports_generate_content)
            .collect(),
    }))
}

pub mod health;
pub mod multipart;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(analysis::handle_list_models))
        // Single-resume analysis
        .route("/api/v1/resumes/parse", post(analysis::handle_parse))
        .route("/api/v1/resumes/compare", post(analysis::handle_compare))
        .route("/api/v1/resumes/feedback", post(analysis::handle_feedback))
        // Recruiter sessions: batch ranking and interview questions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route("/api/v1/sessions/:id", delete(session::handle_end_session))
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handle_reset_session),
        )
        .route("/api/v1/sessions/:id/batch", post(session::handle_run_batch))
        .route(
            "/api/v1/sessions/:id/ranking",
            get(session::handle_get_ranking),
        )
        .route(
            "/api/v1/sessions/:id/questions",
            post(session::handle_generate_questions),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

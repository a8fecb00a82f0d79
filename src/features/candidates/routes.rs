//! Candidate routes

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::candidates::handlers;
use crate::features::candidates::services::CandidateService;
use crate::shared::constants::{MAX_DOCUMENTS, MAX_DOCUMENT_SIZE};

/// Multipart framing and text fields on top of the largest allowed document set
const SUBMISSION_BODY_LIMIT: usize = MAX_DOCUMENTS * MAX_DOCUMENT_SIZE + 1024 * 1024;

/// Create routes for the candidates feature
///
/// Note: Submission is public (no authentication required) as it backs
/// the verification form.
pub fn routes(service: Arc<CandidateService>) -> Router {
    Router::new()
        .route(
            "/api/candidates/submit",
            post(handlers::submit_application).layer(DefaultBodyLimit::max(SUBMISSION_BODY_LIMIT)),
        )
        .route("/api/candidates/{id}", get(handlers::get_candidate))
        .with_state(service)
}

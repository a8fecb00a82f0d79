//! Verification form routes

use axum::{routing::get, Router};

use crate::features::verification_form::handlers;

/// Create routes for the verification form page
pub fn routes() -> Router {
    Router::new().route("/", get(handlers::verification_form))
}

use utoipa::{Modify, OpenApi};

use crate::features::candidates::{dtos as candidates_dtos, handlers as candidates_handlers};
use crate::features::candidates::models as candidates_models;
use crate::features::verification_form::handlers as form_handlers;
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Candidates (public)
        candidates_handlers::submit_application,
        candidates_handlers::get_candidate,
        // Verification form (public)
        form_handlers::verification_form,
    ),
    components(
        schemas(
            // Candidates
            candidates_models::Address,
            candidates_models::DocumentType,
            candidates_dtos::SubmitCandidateDto,
            candidates_dtos::DocumentResponseDto,
            candidates_dtos::CandidateResponseDto,
            ApiResponse<candidates_dtos::CandidateResponseDto>,
        )
    ),
    tags(
        (name = "candidates", description = "Candidate verification submissions (public)"),
        (name = "verification-form", description = "Server-rendered submission form"),
    ),
    info(
        title = "Candidate Verification API",
        version = "0.1.0",
        description = "API documentation for candidate verification",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_candidate_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/candidates/submit"));
        assert!(doc.paths.paths.contains_key("/api/candidates/{id}"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Verification".to_string(),
            version: "9.9.9".to_string(),
            description: "Custom".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Verification");
        assert_eq!(doc.info.description.as_deref(), Some("Custom"));
    }
}

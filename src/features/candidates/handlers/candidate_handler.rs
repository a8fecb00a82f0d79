use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::core::extractor::AppMultipart;
use crate::features::candidates::dtos::{
    is_document_type_allowed, CandidateResponseDto, SubmissionForm, SubmitCandidateDto,
    UploadedFile,
};
use crate::features::candidates::services::submission_rules::{
    DOCUMENT_TOO_LARGE_MESSAGE, DOCUMENT_TYPE_MESSAGE, TOO_MANY_DOCUMENTS_MESSAGE,
};
use crate::features::candidates::services::CandidateService;
use crate::shared::constants::{MAX_DOCUMENTS, MAX_DOCUMENT_SIZE};
use crate::shared::types::ApiResponse;

const DOCUMENTS_FIELD: &str = "documents";

/// Submit a candidate verification application
///
/// Accepts multipart/form-data with the candidate's details as text parts
/// and 2 to 5 files under `documents`. Addresses may be sent as JSON text
/// or as `residentialAddress[street1]` style parts.
#[utoipa::path(
    post,
    path = "/api/candidates/submit",
    tag = "candidates",
    request_body(
        content = SubmitCandidateDto,
        content_type = "multipart/form-data",
        description = "Candidate details and identity documents",
    ),
    responses(
        (status = 201, description = "Application submitted successfully", body = ApiResponse<CandidateResponseDto>),
        (status = 400, description = "Validation or persistence failure"),
        (status = 409, description = "A candidate with this email already exists"),
        (status = 413, description = "Request body too large")
    )
)]
pub async fn submit_application(
    State(service): State<Arc<CandidateService>>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<ApiResponse<CandidateResponseDto>>), AppError> {
    let form = read_submission(&mut multipart).await?;

    let candidate = service.submit(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(candidate),
            Some("Application submitted successfully".to_string()),
        )),
    ))
}

/// Get a submitted candidate by ID
#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    tag = "candidates",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found", body = ApiResponse<CandidateResponseDto>),
        (status = 404, description = "Candidate not found")
    )
)]
pub async fn get_candidate(
    State(service): State<Arc<CandidateService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CandidateResponseDto>>, AppError> {
    let candidate = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(candidate), None)))
}

/// Drain the multipart body into a form, rejecting bad documents as they arrive
async fn read_submission(multipart: &mut Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::Validation(DOCUMENT_TOO_LARGE_MESSAGE.to_string())
        } else {
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        }
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == DOCUMENTS_FIELD {
            if form.documents.len() >= MAX_DOCUMENTS {
                return Err(AppError::Validation(TOO_MANY_DOCUMENTS_MESSAGE.to_string()));
            }
            let document = read_document(field).await?;
            form.documents.push(document);
            continue;
        }

        let value = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field {}: {}", field_name, e))
        })?;
        if !form.apply_text(&field_name, value) {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    Ok(form)
}

async fn read_document(mut field: Field<'_>) -> Result<UploadedFile, AppError> {
    let filename = field.file_name().unwrap_or("unnamed").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    if !is_document_type_allowed(&filename, &content_type) {
        debug!("Rejected document '{}' ({})", filename, content_type);
        return Err(AppError::Validation(DOCUMENT_TYPE_MESSAGE.to_string()));
    }

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        debug!("Failed to read file bytes: {}", e);
        AppError::BadRequest(format!("Failed to read file data: {}", e))
    })? {
        if data.len() + chunk.len() > MAX_DOCUMENT_SIZE {
            return Err(AppError::Validation(DOCUMENT_TOO_LARGE_MESSAGE.to_string()));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        filename,
        content_type,
        data,
    })
}

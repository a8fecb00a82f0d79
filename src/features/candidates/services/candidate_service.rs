//! Candidate Service - validate a submission, store its documents, persist the candidate

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::submission_rules::{self, check_age, check_document_count, resolve_addresses};
use super::upload_guard::UploadGuard;
use crate::core::error::{AppError, Result};
use crate::features::candidates::dtos::{
    document_extension, CandidateIdentityDto, CandidateResponseDto, SubmissionForm, UploadedFile,
};
use crate::features::candidates::error::SubmissionError;
use crate::features::candidates::models::{CreateCandidate, CreateDocument, DocumentType};
use crate::features::candidates::repositories::CandidateRepository;
use crate::modules::storage::DocumentStorage;

/// Service handling candidate submissions
pub struct CandidateService {
    repository: Arc<dyn CandidateRepository>,
    storage: Arc<dyn DocumentStorage>,
}

impl CandidateService {
    pub fn new(repository: Arc<dyn CandidateRepository>, storage: Arc<dyn DocumentStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Process one submission, judging age against today's UTC date
    pub async fn submit(
        &self,
        form: SubmissionForm,
    ) -> std::result::Result<CandidateResponseDto, SubmissionError> {
        self.submit_on(form, Utc::now().date_naive()).await
    }

    /// Process one submission as of `today`
    ///
    /// Either commits documents and candidate together, or removes every
    /// file this call wrote before returning the error.
    pub async fn submit_on(
        &self,
        form: SubmissionForm,
        today: NaiveDate,
    ) -> std::result::Result<CandidateResponseDto, SubmissionError> {
        let guard = UploadGuard::new(Arc::clone(&self.storage));

        match self.process(form, today, &guard).await {
            Ok(candidate) => {
                guard.commit();
                Ok(candidate)
            }
            Err(err) => {
                let written = guard.tracked_count();
                let failed = guard.release().await;
                if written > 0 {
                    warn!(
                        "Submission failed, removed {}/{} uploaded file(s): {}",
                        written - failed,
                        written,
                        err
                    );
                } else {
                    debug!("Submission rejected: {}", err);
                }
                Err(err)
            }
        }
    }

    async fn process(
        &self,
        form: SubmissionForm,
        today: NaiveDate,
        guard: &UploadGuard,
    ) -> std::result::Result<CandidateResponseDto, SubmissionError> {
        let identity = CandidateIdentityDto::from_form(&form);
        let SubmissionForm {
            dob,
            residential_address,
            permanent_address,
            same_as_residential,
            documents,
            ..
        } = form;

        let dob = check_age(dob.as_deref(), today)?;

        let (residential_address, permanent_address) =
            resolve_addresses(residential_address, permanent_address, same_as_residential)?;

        check_document_count(documents.len())?;

        identity
            .validate()
            .map_err(|e| SubmissionError::Validation(first_validation_message(&e)))?;

        let documents = self.store_documents(documents, guard).await?;

        let record = self
            .repository
            .create_with_documents(
                CreateCandidate {
                    first_name: identity.first_name,
                    last_name: identity.last_name,
                    email: identity.email,
                    dob,
                    residential_address,
                    permanent_address,
                },
                documents,
            )
            .await?;

        info!(
            "Application submitted: candidate_id={}, documents={}",
            record.candidate.id,
            record.documents.len()
        );

        Ok(record.into())
    }

    /// Write every document concurrently; all writes finish before this returns
    ///
    /// Each write is tracked by `guard` the moment it lands, so a sibling
    /// failure or a cancelled request still sees it. Results keep upload order.
    async fn store_documents(
        &self,
        files: Vec<UploadedFile>,
        guard: &UploadGuard,
    ) -> Result<Vec<CreateDocument>> {
        let writes = files.into_iter().map(|file| {
            let storage = Arc::clone(&self.storage);
            let tracker = guard.tracker();
            async move {
                let file_type = DocumentType::from_content_type(&file.content_type);
                let key = format!(
                    "documents/{}.{}",
                    Uuid::now_v7(),
                    document_extension(&file.filename, &file.content_type)
                );

                let file_path = storage.put(&key, file.data, &file.content_type).await?;
                tracker.track(file_path.clone());
                debug!(
                    "Stored document '{}' as {} via {}",
                    file.filename,
                    file_type,
                    storage.backend_name()
                );

                Ok::<_, AppError>(CreateDocument {
                    filename: file.filename,
                    file_type,
                    file_path,
                })
            }
        });

        // join_all yields results in input order
        join_all(writes).await.into_iter().collect()
    }

    /// Get a stored candidate by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<CandidateResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", id)))
    }
}

/// First failing rule, in the identity fields' declared order
fn first_validation_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();

    CandidateIdentityDto::FIELD_ORDER
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| submission_rules::INVALID_FIELDS_MESSAGE.to_string())
}

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::core::database::unique_violation_constraint;
use crate::core::error::{AppError, Result};
use crate::features::candidates::models::{
    Candidate, CandidateRecord, CreateCandidate, CreateDocument, Document,
};
use crate::features::candidates::services::submission_rules::DUPLICATE_EMAIL_MESSAGE;

/// Persistence collaborator for candidates and their documents
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Atomically store the documents, then the candidate referencing them in order
    async fn create_with_documents(
        &self,
        candidate: CreateCandidate,
        documents: Vec<CreateDocument>,
    ) -> Result<CandidateRecord>;

    /// Load a candidate with documents ordered as its reference list
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CandidateRecord>>;
}

/// Postgres-backed repository
pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CANDIDATE_EMAIL_CONSTRAINT: &str = "candidates_email_key";

fn map_candidate_insert_error(err: sqlx::Error) -> AppError {
    match unique_violation_constraint(&err) {
        Some(constraint) if constraint == CANDIDATE_EMAIL_CONSTRAINT => {
            AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
        }
        _ => {
            tracing::error!("Failed to insert candidate: {:?}", err);
            AppError::Database(err)
        }
    }
}

/// Arrange `documents` in the order given by `ids`, skipping dangling references
fn order_documents(ids: &[Uuid], documents: Vec<Document>) -> Vec<Document> {
    let mut by_id: HashMap<Uuid, Document> = documents.into_iter().map(|d| (d.id, d)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn create_with_documents(
        &self,
        candidate: CreateCandidate,
        documents: Vec<CreateDocument>,
    ) -> Result<CandidateRecord> {
        let mut tx = self.pool.begin().await?;

        let mut stored = Vec::with_capacity(documents.len());
        for doc in documents {
            let row = sqlx::query_as::<_, Document>(
                r#"
                INSERT INTO documents (filename, file_type, file_path)
                VALUES ($1, $2, $3)
                RETURNING id, filename, file_type, file_path, uploaded_at
                "#,
            )
            .bind(&doc.filename)
            .bind(doc.file_type)
            .bind(&doc.file_path)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        let document_ids: Vec<Uuid> = stored.iter().map(|d| d.id).collect();

        let row = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (
                first_name, last_name, email, dob,
                residential_street1, residential_street2,
                permanent_street1, permanent_street2,
                document_ids
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&candidate.first_name)
        .bind(&candidate.last_name)
        .bind(&candidate.email)
        .bind(candidate.dob)
        .bind(&candidate.residential_address.street1)
        .bind(&candidate.residential_address.street2)
        .bind(&candidate.permanent_address.street1)
        .bind(&candidate.permanent_address.street2)
        .bind(&document_ids)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_candidate_insert_error)?;

        tx.commit().await?;

        info!(
            "Candidate stored: id={}, documents={}",
            row.id,
            row.document_ids.len()
        );

        Ok(CandidateRecord {
            candidate: row,
            documents: stored,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CandidateRecord>> {
        let candidate = sqlx::query_as::<_, Candidate>(r#"SELECT * FROM candidates WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, filename, file_type, file_path, uploaded_at
            FROM documents
            WHERE id = ANY($1)
            "#,
        )
        .bind(&candidate.document_ids)
        .fetch_all(&self.pool)
        .await?;

        let documents = order_documents(&candidate.document_ids, documents);

        Ok(Some(CandidateRecord {
            candidate,
            documents,
        }))
    }
}

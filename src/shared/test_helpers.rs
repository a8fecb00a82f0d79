#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use chrono::Utc;
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::candidates::models::{
    Candidate, CandidateRecord, CreateCandidate, CreateDocument, Document,
};
#[cfg(test)]
use crate::features::candidates::repositories::CandidateRepository;
#[cfg(test)]
use crate::features::candidates::services::submission_rules::DUPLICATE_EMAIL_MESSAGE;
#[cfg(test)]
use crate::modules::storage::DocumentStorage;

/// Storage fake keeping document bytes in memory; the key doubles as the path
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    puts: Mutex<usize>,
    failing_content_type: Mutex<Option<String>>,
    stalling_content_type: Mutex<Option<String>>,
    fail_deletes: Mutex<bool>,
}

#[cfg(test)]
#[allow(dead_code)]
impl InMemoryStorage {
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    /// Number of successful writes, including ones later deleted
    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap()
    }

    /// Reject every write declared with `content_type`
    pub fn fail_puts_for(&self, content_type: &str) {
        *self.failing_content_type.lock().unwrap() = Some(content_type.to_string());
    }

    /// Make every write declared with `content_type` hang forever
    pub fn stall_puts_for(&self, content_type: &str) {
        *self.stalling_content_type.lock().unwrap() = Some(content_type.to_string());
    }

    pub fn fail_deletes(&self) {
        *self.fail_deletes.lock().unwrap() = true;
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentStorage for InMemoryStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        if self.failing_content_type.lock().unwrap().as_deref() == Some(content_type) {
            return Err(AppError::Storage(format!("Failed to write {}", key)));
        }

        let stall = self.stalling_content_type.lock().unwrap().as_deref() == Some(content_type);
        if stall {
            std::future::pending::<()>().await;
        }

        self.files.lock().unwrap().insert(key.to_string(), data);
        *self.puts.lock().unwrap() += 1;
        Ok(key.to_string())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(AppError::Storage(format!("Failed to delete {}", path)));
        }

        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::Storage(format!("No such file: {}", path)))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Repository fake enforcing email uniqueness like the database constraint
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryCandidateRepository {
    candidates: Mutex<Vec<Candidate>>,
    documents: Mutex<HashMap<Uuid, Document>>,
    next_failure: Mutex<Option<String>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl InMemoryCandidateRepository {
    pub fn candidate_count(&self) -> usize {
        self.candidates.lock().unwrap().len()
    }

    /// Make the next create fail with `message` and store nothing
    pub fn fail_next_create(&self, message: &str) {
        *self.next_failure.lock().unwrap() = Some(message.to_string());
    }
}

#[cfg(test)]
#[async_trait]
impl CandidateRepository for InMemoryCandidateRepository {
    async fn create_with_documents(
        &self,
        candidate: CreateCandidate,
        documents: Vec<CreateDocument>,
    ) -> Result<CandidateRecord> {
        if let Some(message) = self.next_failure.lock().unwrap().take() {
            return Err(AppError::Internal(message));
        }

        let mut candidates = self.candidates.lock().unwrap();
        if candidates.iter().any(|c| c.email == candidate.email) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let now = Utc::now();
        let stored: Vec<Document> = documents
            .into_iter()
            .map(|d| Document {
                id: Uuid::new_v4(),
                filename: d.filename,
                file_type: d.file_type,
                file_path: d.file_path,
                uploaded_at: now,
            })
            .collect();

        let row = Candidate {
            id: Uuid::new_v4(),
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
            dob: candidate.dob,
            residential_street1: candidate.residential_address.street1,
            residential_street2: candidate.residential_address.street2,
            permanent_street1: candidate.permanent_address.street1,
            permanent_street2: candidate.permanent_address.street2,
            document_ids: stored.iter().map(|d| d.id).collect(),
            created_at: now,
            updated_at: now,
        };

        let mut all_documents = self.documents.lock().unwrap();
        for document in &stored {
            all_documents.insert(document.id, document.clone());
        }
        candidates.push(row.clone());

        Ok(CandidateRecord {
            candidate: row,
            documents: stored,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CandidateRecord>> {
        let candidate = self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned();

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let all_documents = self.documents.lock().unwrap();
        let documents = candidate
            .document_ids
            .iter()
            .filter_map(|id| all_documents.get(id).cloned())
            .collect();

        Ok(Some(CandidateRecord {
            candidate,
            documents,
        }))
    }
}

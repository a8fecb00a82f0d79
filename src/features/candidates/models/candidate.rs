use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Address, Document};

/// Database model for a verification candidate
#[derive(Debug, Clone, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub residential_street1: String,
    pub residential_street2: String,
    pub permanent_street1: String,
    pub permanent_street2: String,
    /// Ordered references into `documents`, in upload order
    pub document_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn residential_address(&self) -> Address {
        Address {
            street1: self.residential_street1.clone(),
            street2: self.residential_street2.clone(),
        }
    }

    pub fn permanent_address(&self) -> Address {
        Address {
            street1: self.permanent_street1.clone(),
            street2: self.permanent_street2.clone(),
        }
    }
}

/// Validated data for creating a candidate
#[derive(Debug, Clone)]
pub struct CreateCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub residential_address: Address,
    pub permanent_address: Address,
}

/// A candidate together with its documents, ordered as `document_ids`
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub candidate: Candidate,
    pub documents: Vec<Document>,
}

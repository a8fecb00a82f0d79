mod address;
mod candidate;
mod document;

pub use address::Address;
pub use candidate::{Candidate, CandidateRecord, CreateCandidate};
pub use document::{CreateDocument, Document, DocumentType};

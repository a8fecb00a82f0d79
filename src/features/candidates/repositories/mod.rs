mod candidate_repository;

pub use candidate_repository::{CandidateRepository, PgCandidateRepository};

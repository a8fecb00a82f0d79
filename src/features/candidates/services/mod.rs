mod candidate_service;
pub mod submission_rules;
mod upload_guard;

pub use candidate_service::CandidateService;

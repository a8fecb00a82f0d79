//! Candidate verification feature.
//!
//! Accepts a candidate's personal details, two addresses and 2 to 5
//! identity documents in one multipart submission. Documents are written
//! to the configured storage backend and the candidate is stored with
//! ordered references to them. A failed submission leaves no files behind.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/candidates/submit` | No | Submit a verification application |
//! | GET | `/api/candidates/{id}` | No | Fetch a submitted candidate |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgCandidateRepository;
pub use services::CandidateService;

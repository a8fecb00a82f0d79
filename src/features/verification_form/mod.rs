//! Server-rendered verification form.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/` | No | Candidate verification form |

pub mod handlers;
pub mod page;
pub mod routes;

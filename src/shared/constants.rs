/// Minimum number of identity documents per submission
pub const MIN_DOCUMENTS: usize = 2;

/// Maximum number of identity documents per submission
pub const MAX_DOCUMENTS: usize = 5;

/// Maximum size of a single uploaded document (5MB)
pub const MAX_DOCUMENT_SIZE: usize = 5 * 1024 * 1024;

/// Candidates must be at least this old on the day they submit
pub const MINIMUM_AGE_YEARS: u32 = 18;

// =============================================================================
// ACCEPTED DOCUMENT TYPES
// =============================================================================

/// Accepted document MIME types
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Accepted document file extensions (lowercase, without dot)
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "pdf"];

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Document type enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "document_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Image,
    Pdf,
}

impl DocumentType {
    /// Anything declared as `image/*` is an image; everything else is treated as a PDF
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            DocumentType::Image
        } else {
            DocumentType::Pdf
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Image => write!(f, "image"),
            DocumentType::Pdf => write!(f, "pdf"),
        }
    }
}

/// Database model for an uploaded document
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub file_type: DocumentType,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Data for creating a new document record
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub filename: String,
    pub file_type: DocumentType,
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_type() {
        assert_eq!(DocumentType::from_content_type("image/png"), DocumentType::Image);
        assert_eq!(DocumentType::from_content_type("image/jpeg"), DocumentType::Image);
        assert_eq!(DocumentType::from_content_type("application/pdf"), DocumentType::Pdf);
        // Not an image prefix, so it falls through to pdf
        assert_eq!(DocumentType::from_content_type("text/image/png"), DocumentType::Pdf);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DocumentType::Image).unwrap(), "\"image\"");
        assert_eq!(DocumentType::Pdf.to_string(), "pdf");
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::candidates::models::{Address, CandidateRecord, Document, DocumentType};
use crate::shared::constants::{ALLOWED_EXTENSIONS, ALLOWED_MIME_TYPES};
use crate::shared::validation::EMAIL_REGEX;

// =============================================================================
// ADDRESS INPUT
// =============================================================================

/// Address as received, before street lines are checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressFields {
    #[serde(default, deserialize_with = "lenient_line")]
    pub street1: Option<String>,
    #[serde(default, deserialize_with = "lenient_line")]
    pub street2: Option<String>,
}

impl AddressFields {
    /// Returns the address only when both street lines are non-blank
    ///
    /// Lines are kept exactly as sent; trimming only decides blankness.
    pub fn complete(&self) -> Option<Address> {
        let line = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        Some(Address {
            street1: line(&self.street1)?,
            street2: line(&self.street2)?,
        })
    }
}

/// Accept a street line sent as any truthy JSON scalar
///
/// Numbers other than zero and `true` become their text form; `null`,
/// `false`, `0`, arrays and objects count as a missing line.
fn lenient_line<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

/// An address field exactly as the transport delivered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressInput {
    /// Sent as individual `field[street1]` / `field.street1` parts
    Structured(AddressFields),
    /// Sent as one text part holding JSON
    Encoded(String),
}

impl AddressInput {
    /// Decode once at the boundary. Text that is not a JSON address object
    /// counts as an address with no street lines.
    pub fn resolve(self) -> AddressFields {
        match self {
            AddressInput::Structured(fields) => fields,
            AddressInput::Encoded(text) => {
                serde_json::from_str::<AddressFields>(&text).unwrap_or_default()
            }
        }
    }
}

// =============================================================================
// SUBMISSION FORM
// =============================================================================

/// One uploaded document part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// All parts of one submission after the multipart body has been read
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub residential_address: Option<AddressInput>,
    pub permanent_address: Option<AddressInput>,
    pub same_as_residential: bool,
    /// Documents in upload order
    pub documents: Vec<UploadedFile>,
}

/// Which address a nested form field belongs to
enum AddressSlot {
    Residential,
    Permanent,
}

impl SubmissionForm {
    /// Record a text part. Returns `false` for unknown field names.
    pub fn apply_text(&mut self, name: &str, value: String) -> bool {
        match name {
            "firstName" => self.first_name = Some(value),
            "lastName" => self.last_name = Some(value),
            "email" => self.email = Some(value),
            "dob" => self.dob = Some(value),
            "residentialAddress" => self.residential_address = Some(AddressInput::Encoded(value)),
            "permanentAddress" => self.permanent_address = Some(AddressInput::Encoded(value)),
            "sameAsResidential" => self.same_as_residential = value.trim() == "true",
            _ => return self.apply_address_part(name, value),
        }
        true
    }

    /// Handle `residentialAddress[street1]` and `residentialAddress.street1` style parts
    fn apply_address_part(&mut self, name: &str, value: String) -> bool {
        let Some((slot, key)) = split_address_part(name) else {
            return false;
        };

        let target = match slot {
            AddressSlot::Residential => &mut self.residential_address,
            AddressSlot::Permanent => &mut self.permanent_address,
        };

        // A whole-object text part takes precedence over individual lines
        if matches!(target, Some(AddressInput::Encoded(_))) {
            return true;
        }

        let mut fields = match target.take() {
            Some(AddressInput::Structured(fields)) => fields,
            _ => AddressFields::default(),
        };
        match key {
            "street1" => fields.street1 = Some(value),
            "street2" => fields.street2 = Some(value),
            _ => {}
        }
        *target = Some(AddressInput::Structured(fields));
        true
    }
}

fn split_address_part(name: &str) -> Option<(AddressSlot, &str)> {
    let (prefix, rest) = if let Some(rest) = name.strip_prefix("residentialAddress") {
        (AddressSlot::Residential, rest)
    } else if let Some(rest) = name.strip_prefix("permanentAddress") {
        (AddressSlot::Permanent, rest)
    } else {
        return None;
    };

    let key = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .or_else(|| rest.strip_prefix('.'))?;

    Some((prefix, key))
}

/// Check a document against the accepted extensions and MIME types
pub fn is_document_type_allowed(filename: &str, content_type: &str) -> bool {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    ALLOWED_EXTENSIONS.contains(&extension.as_str())
        && ALLOWED_MIME_TYPES.contains(&content_type.to_lowercase().as_str())
}

/// Lowercase extension of an accepted document, falling back to its content type
pub fn document_extension(filename: &str, content_type: &str) -> &'static str {
    let from_name = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .and_then(|ext| ALLOWED_EXTENSIONS.iter().find(|allowed| **allowed == ext).copied());

    from_name.unwrap_or(match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "application/pdf" => "pdf",
        _ => "bin",
    })
}

/// Required identity fields, checked after the address and document rules
#[derive(Debug, Validate)]
pub struct CandidateIdentityDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Valid email is required"))]
    pub email: String,
}

impl CandidateIdentityDto {
    /// Field order used when reporting the first failing rule
    pub const FIELD_ORDER: [&'static str; 3] = ["first_name", "last_name", "email"];

    pub fn from_form(form: &SubmissionForm) -> Self {
        let clean = |v: &Option<String>| v.as_deref().unwrap_or("").trim().to_string();
        Self {
            first_name: clean(&form.first_name),
            last_name: clean(&form.last_name),
            email: clean(&form.email).to_lowercase(),
        }
    }
}

/// Submission request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitCandidateDto {
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Date of birth, `YYYY-MM-DD` or RFC 3339; surrounding quotes are ignored
    #[schema(example = "1990-04-12")]
    pub dob: String,
    /// JSON text such as `{"street1":"...","street2":"..."}`
    pub residential_address: String,
    /// Same shape as `residentialAddress`; ignored when `sameAsResidential` is "true"
    pub permanent_address: Option<String>,
    #[schema(example = "true")]
    pub same_as_residential: Option<String>,
    /// 2 to 5 JPEG/PNG/PDF files, 5MB each, all under the `documents` field
    pub documents: Vec<String>,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Response DTO for a stored document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponseDto {
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    pub file_type: DocumentType,
    /// Where the storage backend keeps the bytes
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponseDto {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            filename: d.filename,
            file_type: d.file_type,
            file_path: d.file_path,
            uploaded_at: d.uploaded_at,
        }
    }
}

/// Response DTO for a candidate with documents resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponseDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: NaiveDate,
    pub residential_address: Address,
    pub permanent_address: Address,
    /// Documents in upload order
    pub documents: Vec<DocumentResponseDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CandidateRecord> for CandidateResponseDto {
    fn from(record: CandidateRecord) -> Self {
        let residential_address = record.candidate.residential_address();
        let permanent_address = record.candidate.permanent_address();
        let c = record.candidate;

        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            dob: c.dob,
            residential_address,
            permanent_address,
            documents: record.documents.into_iter().map(Into::into).collect(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_address_resolves_json() {
        let input = AddressInput::Encoded(r#"{"street1":"1 Main St","street2":"Apt 2"}"#.into());
        let fields = input.resolve();
        assert_eq!(
            fields.complete(),
            Some(Address {
                street1: "1 Main St".to_string(),
                street2: "Apt 2".to_string(),
            })
        );
    }

    #[test]
    fn test_encoded_address_that_is_not_json_has_no_lines() {
        let fields = AddressInput::Encoded("1 Main St, Apt 2".into()).resolve();
        assert_eq!(fields, AddressFields::default());
        assert_eq!(fields.complete(), None);
    }

    #[test]
    fn test_address_extra_keys_are_ignored() {
        let input = AddressInput::Encoded(
            r#"{"street1":"1 Main St","street2":"Apt 2","city":"Springfield"}"#.into(),
        );
        assert!(input.resolve().complete().is_some());
    }

    #[test]
    fn test_padded_street_lines_kept_verbatim() {
        let input = AddressInput::Encoded(
            r#"{"street1":"  1 Main St ","street2":"Apt 2\t"}"#.into(),
        );
        assert_eq!(
            input.resolve().complete(),
            Some(Address {
                street1: "  1 Main St ".to_string(),
                street2: "Apt 2\t".to_string(),
            })
        );
    }

    #[test]
    fn test_numeric_street_lines_accepted() {
        let input = AddressInput::Encoded(r#"{"street1":12,"street2":true}"#.into());
        assert_eq!(
            input.resolve().complete(),
            Some(Address {
                street1: "12".to_string(),
                street2: "true".to_string(),
            })
        );
    }

    #[test]
    fn test_falsy_street_lines_are_missing() {
        for body in [
            r#"{"street1":0,"street2":"Apt 2"}"#,
            r#"{"street1":null,"street2":"Apt 2"}"#,
            r#"{"street1":false,"street2":"Apt 2"}"#,
            r#"{"street1":["1 Main St"],"street2":"Apt 2"}"#,
        ] {
            let fields = AddressInput::Encoded(body.into()).resolve();
            assert_eq!(fields.street2.as_deref(), Some("Apt 2"), "{}", body);
            assert_eq!(fields.complete(), None, "{}", body);
        }
    }

    #[test]
    fn test_blank_street_line_is_incomplete() {
        let fields = AddressFields {
            street1: Some("1 Main St".to_string()),
            street2: Some("   ".to_string()),
        };
        assert_eq!(fields.complete(), None);
    }

    #[test]
    fn test_form_collects_bracket_and_dot_address_parts() {
        let mut form = SubmissionForm::default();
        assert!(form.apply_text("residentialAddress[street1]", "1 Main St".into()));
        assert!(form.apply_text("residentialAddress.street2", "Apt 2".into()));
        assert!(!form.apply_text("residentialAddressstreet1", "x".into()));
        assert!(!form.apply_text("nickname", "JD".into()));

        let resolved = form.residential_address.unwrap().resolve().complete();
        assert_eq!(
            resolved,
            Some(Address {
                street1: "1 Main St".to_string(),
                street2: "Apt 2".to_string(),
            })
        );
    }

    #[test]
    fn test_encoded_address_wins_over_parts() {
        let mut form = SubmissionForm::default();
        form.apply_text(
            "permanentAddress",
            r#"{"street1":"A","street2":"B"}"#.into(),
        );
        form.apply_text("permanentAddress[street1]", "Z".into());

        let resolved = form.permanent_address.unwrap().resolve().complete().unwrap();
        assert_eq!(resolved.street1, "A");
    }

    #[test]
    fn test_same_as_residential_only_for_true() {
        let mut form = SubmissionForm::default();
        form.apply_text("sameAsResidential", "true".into());
        assert!(form.same_as_residential);
        form.apply_text("sameAsResidential", "false".into());
        assert!(!form.same_as_residential);
        form.apply_text("sameAsResidential", "on".into());
        assert!(!form.same_as_residential);
    }

    #[test]
    fn test_document_type_allowed() {
        assert!(is_document_type_allowed("passport.PDF", "application/pdf"));
        assert!(is_document_type_allowed("id.jpeg", "image/jpeg"));
        assert!(is_document_type_allowed("id.jpg", "image/jpeg"));
        assert!(is_document_type_allowed("scan.png", "image/png"));
        assert!(!is_document_type_allowed("scan.gif", "image/gif"));
        assert!(!is_document_type_allowed("evil.exe", "application/pdf"));
        assert!(!is_document_type_allowed("scan.pdf", "text/plain"));
        assert!(!is_document_type_allowed("noextension", "application/pdf"));
    }

    #[test]
    fn test_document_extension() {
        assert_eq!(document_extension("ID.JPG", "image/jpeg"), "jpg");
        assert_eq!(document_extension("scan", "application/pdf"), "pdf");
        assert_eq!(document_extension("scan", "image/png"), "png");
    }

    #[test]
    fn test_identity_dto_validation() {
        let valid = CandidateIdentityDto {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = CandidateIdentityDto {
            first_name: String::new(),
            last_name: "Doe".to_string(),
            email: "not-an-email".to_string(),
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("last_name"));
    }
}

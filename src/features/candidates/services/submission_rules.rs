//! Field rules applied to a submission before anything is persisted

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::features::candidates::dtos::AddressInput;
use crate::features::candidates::error::SubmissionError;
use crate::features::candidates::models::Address;
use crate::shared::constants::{MAX_DOCUMENTS, MINIMUM_AGE_YEARS, MIN_DOCUMENTS};

pub const UNDERAGE_MESSAGE: &str = "Must be at least 18 years old";
pub const INVALID_DOB_MESSAGE: &str = "Invalid date of birth";
pub const RESIDENTIAL_ADDRESS_MESSAGE: &str =
    "Residential address (street1 and street2) is required";
pub const PERMANENT_ADDRESS_MESSAGE: &str =
    "Permanent address (street1 and street2) is required when not same as residential";
pub const TOO_FEW_DOCUMENTS_MESSAGE: &str = "Minimum 2 documents required";
pub const TOO_MANY_DOCUMENTS_MESSAGE: &str = "Maximum 5 documents allowed";
pub const DOCUMENT_TYPE_MESSAGE: &str = "Only images (JPEG/JPG/PNG) and PDF files are allowed!";
pub const DOCUMENT_TOO_LARGE_MESSAGE: &str = "File too large. Maximum size is 5 MB";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A candidate with this email already exists";
pub const INVALID_FIELDS_MESSAGE: &str = "Invalid candidate details";

/// Strip one leading and one trailing double quote left by JSON-encoding transports
pub fn clean_dob(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.strip_suffix('"').unwrap_or(trimmed)
}

/// Parse `YYYY-MM-DD`, RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp
pub fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let cleaned = clean_dob(raw).trim();

    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(cleaned)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Full calendar years between `dob` and `today`
///
/// A birthday on Feb 29 is reached on Mar 1 in non-leap years.
pub fn age_in_years(dob: NaiveDate, today: NaiveDate) -> i32 {
    let had_birthday = (today.month(), today.day()) >= (dob.month(), dob.day());
    today.year() - dob.year() - if had_birthday { 0 } else { 1 }
}

/// Step 1: the date of birth parses and the candidate is at least 18 today
pub fn check_age(raw_dob: Option<&str>, today: NaiveDate) -> Result<NaiveDate, SubmissionError> {
    let dob = raw_dob
        .and_then(parse_dob)
        .ok_or_else(|| SubmissionError::validation(INVALID_DOB_MESSAGE))?;

    if age_in_years(dob, today) < MINIMUM_AGE_YEARS as i32 {
        return Err(SubmissionError::validation(UNDERAGE_MESSAGE));
    }

    Ok(dob)
}

/// Steps 2 and 3: decode both addresses and apply the mirror flag
///
/// With the mirror flag set, any supplied permanent address is discarded.
pub fn resolve_addresses(
    residential: Option<AddressInput>,
    permanent: Option<AddressInput>,
    same_as_residential: bool,
) -> Result<(Address, Address), SubmissionError> {
    let residential = residential
        .map(AddressInput::resolve)
        .and_then(|fields| fields.complete())
        .ok_or_else(|| SubmissionError::validation(RESIDENTIAL_ADDRESS_MESSAGE))?;

    if same_as_residential {
        let permanent = residential.clone();
        return Ok((residential, permanent));
    }

    let permanent = permanent
        .map(AddressInput::resolve)
        .and_then(|fields| fields.complete())
        .ok_or_else(|| SubmissionError::validation(PERMANENT_ADDRESS_MESSAGE))?;

    Ok((residential, permanent))
}

/// Step 4: between 2 and 5 documents are attached
pub fn check_document_count(count: usize) -> Result<(), SubmissionError> {
    if count < MIN_DOCUMENTS {
        return Err(SubmissionError::validation(TOO_FEW_DOCUMENTS_MESSAGE));
    }
    if count > MAX_DOCUMENTS {
        return Err(SubmissionError::validation(TOO_MANY_DOCUMENTS_MESSAGE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Months};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn encoded(street1: &str, street2: &str) -> Option<AddressInput> {
        Some(AddressInput::Encoded(
            serde_json::json!({ "street1": street1, "street2": street2 }).to_string(),
        ))
    }

    #[test]
    fn test_clean_dob_strips_wrapping_quotes() {
        assert_eq!(clean_dob("\"2000-01-01\""), "2000-01-01");
        assert_eq!(clean_dob("2000-01-01"), "2000-01-01");
        assert_eq!(clean_dob("\"2000-01-01"), "2000-01-01");
        assert_eq!(clean_dob(" \"2000-01-01\" "), "2000-01-01");
    }

    #[test]
    fn test_parse_dob_formats() {
        assert_eq!(parse_dob("2000-01-15"), Some(date(2000, 1, 15)));
        assert_eq!(parse_dob("\"2000-01-15T00:00:00.000Z\""), Some(date(2000, 1, 15)));
        assert_eq!(parse_dob("2000-01-15T10:30:00+02:00"), Some(date(2000, 1, 15)));
        assert_eq!(parse_dob("2000-01-15T10:30:00"), Some(date(2000, 1, 15)));
        assert_eq!(parse_dob("15/01/2000"), None);
        assert_eq!(parse_dob(""), None);
    }

    #[test]
    fn test_age_in_years_calendar_boundaries() {
        let today = date(2026, 10, 14);
        assert_eq!(age_in_years(date(2008, 10, 14), today), 18);
        assert_eq!(age_in_years(date(2008, 10, 15), today), 17);
        assert_eq!(age_in_years(date(1990, 1, 1), today), 36);
    }

    #[test]
    fn test_age_in_years_leap_day_birthday() {
        let dob = date(2008, 2, 29);
        assert_eq!(age_in_years(dob, date(2026, 2, 28)), 17);
        assert_eq!(age_in_years(dob, date(2026, 3, 1)), 18);
        assert_eq!(age_in_years(dob, date(2028, 2, 29)), 20);
    }

    #[test]
    fn test_check_age_exactly_eighteen_accepted() {
        let today = date(2026, 10, 14);
        let dob = today.checked_sub_months(Months::new(18 * 12)).unwrap();
        assert_eq!(check_age(Some(&dob.to_string()), today).unwrap(), dob);
    }

    #[test]
    fn test_check_age_one_day_short_rejected() {
        let today = date(2026, 10, 14);
        let dob = today
            .checked_sub_months(Months::new(18 * 12))
            .unwrap()
            .checked_add_days(Days::new(1))
            .unwrap();

        let err = check_age(Some(&dob.to_string()), today).unwrap_err();
        assert_eq!(err.to_string(), UNDERAGE_MESSAGE);
    }

    #[test]
    fn test_check_age_future_dob_rejected() {
        let today = date(2026, 10, 14);
        let dob = today.checked_add_months(Months::new(20 * 12)).unwrap();
        assert_eq!(age_in_years(dob, today), -20);

        let err = check_age(Some(&dob.to_string()), today).unwrap_err();
        assert_eq!(err.to_string(), UNDERAGE_MESSAGE);
        assert_eq!(
            check_age(Some("2026-10-15"), today).unwrap_err().to_string(),
            UNDERAGE_MESSAGE
        );
    }

    #[test]
    fn test_check_age_invalid_or_missing() {
        let today = date(2026, 10, 14);
        assert_eq!(
            check_age(Some("yesterday"), today).unwrap_err().to_string(),
            INVALID_DOB_MESSAGE
        );
        assert_eq!(
            check_age(None, today).unwrap_err().to_string(),
            INVALID_DOB_MESSAGE
        );
    }

    #[test]
    fn test_residential_missing_line_rejected_even_with_valid_permanent() {
        let err = resolve_addresses(encoded("1 Main St", ""), encoded("2 Oak Rd", "Unit 3"), false)
            .unwrap_err();
        assert_eq!(err.to_string(), RESIDENTIAL_ADDRESS_MESSAGE);

        let err = resolve_addresses(None, encoded("2 Oak Rd", "Unit 3"), true).unwrap_err();
        assert_eq!(err.to_string(), RESIDENTIAL_ADDRESS_MESSAGE);
    }

    #[test]
    fn test_mirror_flag_overwrites_supplied_permanent() {
        let (residential, permanent) =
            resolve_addresses(encoded("1 Main St", "Apt 2"), encoded("2 Oak Rd", "Unit 3"), true)
                .unwrap();
        assert_eq!(permanent, residential);
        assert_eq!(permanent.street1, "1 Main St");
    }

    #[test]
    fn test_permanent_required_without_mirror_flag() {
        let err = resolve_addresses(encoded("1 Main St", "Apt 2"), None, false).unwrap_err();
        assert_eq!(err.to_string(), PERMANENT_ADDRESS_MESSAGE);

        let err = resolve_addresses(
            encoded("1 Main St", "Apt 2"),
            Some(AddressInput::Encoded("not json".to_string())),
            false,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), PERMANENT_ADDRESS_MESSAGE);
    }

    #[test]
    fn test_independent_permanent_address_kept() {
        let (_, permanent) =
            resolve_addresses(encoded("1 Main St", "Apt 2"), encoded("2 Oak Rd", "Unit 3"), false)
                .unwrap();
        assert_eq!(permanent.street1, "2 Oak Rd");
        assert_eq!(permanent.street2, "Unit 3");
    }

    #[test]
    fn test_document_count_bounds() {
        assert_eq!(
            check_document_count(0).unwrap_err().to_string(),
            TOO_FEW_DOCUMENTS_MESSAGE
        );
        assert_eq!(
            check_document_count(1).unwrap_err().to_string(),
            TOO_FEW_DOCUMENTS_MESSAGE
        );
        assert!(check_document_count(2).is_ok());
        assert!(check_document_count(5).is_ok());
        assert_eq!(
            check_document_count(6).unwrap_err().to_string(),
            TOO_MANY_DOCUMENTS_MESSAGE
        );
    }
}

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Loose email shape check, identical to the one the form applies client-side
    /// - Valid: "jane@example.com", "a.b+c@mail.co.uk"
    /// - Invalid: "jane", "jane@", "jane@example", "ja ne@example.com"
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex_valid() {
        assert!(EMAIL_REGEX.is_match("jane@example.com"));
        assert!(EMAIL_REGEX.is_match("a.b+c@mail.co.uk"));
        assert!(EMAIL_REGEX.is_match("x@y.z"));
    }

    #[test]
    fn test_email_regex_invalid() {
        assert!(!EMAIL_REGEX.is_match("jane"));
        assert!(!EMAIL_REGEX.is_match("jane@"));
        assert!(!EMAIL_REGEX.is_match("jane@example")); // no dot in domain
        assert!(!EMAIL_REGEX.is_match("ja ne@example.com")); // space
        assert!(!EMAIL_REGEX.is_match("jane@@example.com"));
        assert!(!EMAIL_REGEX.is_match(""));
    }
}

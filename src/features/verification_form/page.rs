//! Renders the verification form from its Jinja template.

use chrono::{Months, NaiveDate};
use minijinja::{context, Environment};
use std::sync::OnceLock;
use thiserror::Error;

use crate::shared::constants::{
    ALLOWED_EXTENSIONS, MAX_DOCUMENTS, MAX_DOCUMENT_SIZE, MINIMUM_AGE_YEARS, MIN_DOCUMENTS,
};

const TEMPLATE_NAME: &str = "verification_form.html";
const TEMPLATE_SOURCE: &str = include_str!("../../../templates/verification_form.html.jinja");
const PAGE_TITLE: &str = "Candidate Verification";

static TEMPLATE_ENV: OnceLock<Result<Environment<'static>, minijinja::Error>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to load template: {0}")]
    Load(String),

    #[error("Failed to render template: {0}")]
    Render(#[from] minijinja::Error),
}

fn init_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
    tracing::debug!("Loaded template: {}", TEMPLATE_NAME);
    Ok(env)
}

/// Latest date of birth that is old enough on `today`
pub fn max_dob(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(MINIMUM_AGE_YEARS * 12))
        .unwrap_or(today)
}

/// Render the form with the document limits and a date picker capped for `today`
pub fn render_form(today: NaiveDate) -> Result<String, PageError> {
    let env = TEMPLATE_ENV
        .get_or_init(init_environment)
        .as_ref()
        .map_err(|e| PageError::Load(e.to_string()))?;

    let accept = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",");

    let html = env.get_template(TEMPLATE_NAME)?.render(context! {
        title => PAGE_TITLE,
        max_dob => max_dob(today).to_string(),
        min_documents => MIN_DOCUMENTS,
        max_documents => MAX_DOCUMENTS,
        max_document_mb => MAX_DOCUMENT_SIZE / 1024 / 1024,
        accept => accept,
    })?;

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_max_dob_is_eighteen_years_back() {
        assert_eq!(max_dob(today()), NaiveDate::from_ymd_opt(2008, 10, 14).unwrap());
        assert_eq!(
            max_dob(NaiveDate::from_ymd_opt(2028, 2, 29).unwrap()),
            NaiveDate::from_ymd_opt(2010, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_render_includes_limits_and_fields() {
        let html = render_form(today()).unwrap();

        assert!(html.contains(r#"max="2008-10-14""#));
        assert!(html.contains(r#"accept=".jpeg,.jpg,.png,.pdf""#));
        assert!(html.contains("const MIN_DOCUMENTS = 2;"));
        assert!(html.contains("const MAX_DOCUMENTS = 5;"));
        assert!(html.contains("up to 5 MB each"));
        assert!(html.contains(r#"name="firstName""#));
        assert!(html.contains("/api/candidates/submit"));
    }

    #[test]
    fn test_render_collects_documents_across_picks() {
        let html = render_form(today()).unwrap();

        assert!(html.contains(r#"<ul id="document-list"></ul>"#));
        assert!(html.contains(r#"<button type="submit" id="submit-button" disabled>"#));
        assert!(html.contains("[...selectedFiles, ...picked].slice(0, MAX_DOCUMENTS)"));
        assert!(html.contains("selectedFiles.length < MIN_DOCUMENTS"));
        assert!(html.contains(r#"selectedFiles.forEach((file) => body.append("documents", file))"#));
        assert!(!html.contains(r#"getElementById("documents").files"#));
    }
}

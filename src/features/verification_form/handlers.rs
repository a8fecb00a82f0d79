use axum::response::Html;
use chrono::Utc;

use crate::core::error::AppError;
use crate::features::verification_form::page::render_form;

/// Serve the candidate verification form
#[utoipa::path(
    get,
    path = "/",
    tag = "verification-form",
    responses(
        (status = 200, description = "HTML form", content_type = "text/html", body = String)
    )
)]
pub async fn verification_form() -> Result<Html<String>, AppError> {
    let html = render_form(Utc::now().date_naive())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use crate::features::verification_form::routes::routes;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_form_served_as_html() {
        let server = TestServer::new(routes()).unwrap();

        let response = server.get("/").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response
            .header("content-type")
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(response.text().contains(r#"id="documents""#));
    }
}

pub mod health;
pub mod index;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

/// Headroom on top of the file limit for multipart framing and form fields.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::scoring::test_support::{StubClient, StubReply};
    use crate::scoring::{HeuristicScorer, RemoteScorer, ResumeScorer};

    const BOUNDARY: &str = "ats-test-boundary";

    const JOHN_DOE: &str = "John Doe, john@doe.com, 555-123-4567, Experience: \
        Software engineer who increased test coverage by 40% across 3 services.";

    fn state_with(scorer: Arc<dyn ResumeScorer>, max_upload_bytes: usize) -> AppState {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.max_upload_bytes = max_upload_bytes;
        AppState { config, scorer }
    }

    fn app() -> Router {
        build_router(state_with(Arc::new(HeuristicScorer), 1024 * 1024))
    }

    fn upload_request(filename: &str, content: &[u8], jd: Option<&str>) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
        if let Some(jd) = jd {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"job_description\"\r\n\r\n{jd}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_upload_form() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("action=\"/analyze\""));
        assert!(html.contains("name=\"job_description\""));
    }

    #[tokio::test]
    async fn test_health_reports_strategy() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["scoring_strategy"], "heuristic");
        assert!(json["timestamp"].is_string());
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_txt_returns_json_analysis() {
        let response = app()
            .oneshot(upload_request("resume.txt", JOHN_DOE.as_bytes(), Some("Rust engineer")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert!(uuid::Uuid::parse_str(json["analysis_id"].as_str().unwrap()).is_ok());
        let score = json["ats_score"].as_u64().unwrap();
        assert!(score <= 100);
        assert_eq!(json["strategy"], "heuristic");
        assert_eq!(json["metrics"]["has_email"], true);
        assert_eq!(json["metrics"]["has_phone"], true);
        assert!(json["breakdown"]["contact"].as_u64().unwrap() >= 50);
        assert!(json["feedback"]["overall"].is_string());
        let strengths = json["strengths"].as_array().unwrap();
        assert!((4..=7).contains(&strengths.len()));
    }

    #[tokio::test]
    async fn test_short_text_is_insufficient_content() {
        let response = app()
            .oneshot(upload_request("resume.txt", b"John Doe, john@doe.com", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "INSUFFICIENT_CONTENT");
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_415() {
        let response = app()
            .oneshot(upload_request("resume.rtf", JOHN_DOE.as_bytes(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_corrupt_document() {
        let response = app()
            .oneshot(upload_request("resume.pdf", b"this is not really a pdf", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "CORRUPT_DOCUMENT");
    }

    #[tokio::test]
    async fn test_invalid_utf8_txt_is_encoding_error() {
        let response = app()
            .oneshot(upload_request("resume.txt", &[0xC3, 0x28, 0xFF, 0xFE], None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "ENCODING_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413() {
        let app = build_router(state_with(Arc::new(HeuristicScorer), 1024));
        let big = vec![b'a'; 4096];
        let response = app
            .oneshot(upload_request("resume.txt", &big, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_non_multipart_request_is_400() {
        let request = Request::post("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_browser_gets_html_result_page() {
        let mut request = upload_request("resume.txt", JOHN_DOE.as_bytes(), None);
        request.headers_mut().insert(
            header::ACCEPT,
            "text/html,application/xhtml+xml,*/*;q=0.8".parse().unwrap(),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/100"));
        assert!(html.contains("Strengths"));
    }

    #[tokio::test]
    async fn test_browser_gets_html_error_page() {
        let mut request = upload_request("resume.rtf", JOHN_DOE.as_bytes(), None);
        request
            .headers_mut()
            .insert(header::ACCEPT, "text/html".parse().unwrap());
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("415"));
    }

    #[tokio::test]
    async fn test_remote_failure_is_bad_gateway_with_detail() {
        let stub = StubClient::new(StubReply::Service(503, "model overloaded"));
        let app = build_router(state_with(Arc::new(RemoteScorer::new(stub)), 1024 * 1024));

        let response = app
            .oneshot(upload_request("resume.txt", JOHN_DOE.as_bytes(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "REMOTE_SERVICE_ERROR");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_remote_strategy_result_has_no_breakdown() {
        let stub = StubClient::new(StubReply::Text(r#"{"ats_score": 77}"#));
        let app = build_router(state_with(Arc::new(RemoteScorer::new(stub)), 1024 * 1024));

        let response = app
            .oneshot(upload_request("resume.txt", JOHN_DOE.as_bytes(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["ats_score"], 77);
        assert_eq!(json["strategy"], "remote");
        assert!(json.get("breakdown").is_none());
    }
}

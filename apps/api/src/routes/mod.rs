pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening
        .route("/api/v1/screen", post(handlers::handle_screen_upload))
        .route("/api/v1/screen/text", post(handlers::handle_screen_text))
        // History (requires DATABASE_URL)
        .route("/api/v1/history", get(handlers::handle_history))
        .route("/api/v1/screenings/:id", get(handlers::handle_get_screening))
        .route("/api/v1/candidates", get(handlers::handle_candidates))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::documents::extract::DocumentExtractor;
    use crate::screening::normalizer::NormalizerOptions;
    use crate::screening::scorer::TfidfMatchScorer;
    use crate::screening::taxonomy::SkillTaxonomy;

    const BOUNDARY: &str = "screener-test-boundary";

    fn test_state(config: Config) -> AppState {
        let taxonomy = Arc::new(SkillTaxonomy::builtin().unwrap());
        AppState {
            db: None,
            config,
            scorer: Arc::new(TfidfMatchScorer::new(taxonomy, NormalizerOptions::default())),
            extractor: Arc::new(DocumentExtractor),
        }
    }

    fn app() -> Router {
        build_router(test_state(Config::default()))
    }

    fn multipart_body(resume: Option<(&str, &str)>, jd_text: Option<&str>) -> String {
        let mut body = String::new();
        if let Some((filename, content)) = resume {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; \
                 filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n"
            ));
        }
        if let Some(jd) = jd_text {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"jd_text\"\r\n\r\n{jd}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn multipart_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/screen")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["persistence"], false);
    }

    #[tokio::test]
    async fn test_screen_text_returns_scores_and_contact() {
        let payload = json!({
            "resume_text": "Jane Doe\njane@example.com\nPython, Django, PostgreSQL, AWS, Docker, Git",
            "jd_text": "Python, Django or Flask, PostgreSQL, AWS, Docker, RESTful API design"
        });
        let response = app()
            .oneshot(json_request("/api/v1/screen/text", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let final_score = json["final_score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&final_score));
        assert!(json["missing_skills"]
            .as_array()
            .unwrap()
            .contains(&json!("RESTful API design")));
        assert_eq!(json["waived_skills"], json!(["Flask"]));
        assert_eq!(json["rating"], "Good Match");
        assert_eq!(json["candidate_info"]["name"], "Jane Doe");
        assert_eq!(json["candidate_info"]["email"], "jane@example.com");
        assert!(json["screening_id"].is_null());
        assert_eq!(json["scorer_backend"], "tfidf");
    }

    #[tokio::test]
    async fn test_screen_text_rejects_blank_jd() {
        let payload = json!({ "resume_text": "Python developer", "jd_text": "   " });
        let response = app()
            .oneshot(json_request("/api/v1/screen/text", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_screen_upload_txt() {
        let body = multipart_body(
            Some(("resume.txt", "John Smith\nRust, Docker, Kubernetes and PostgreSQL")),
            Some("Looking for Rust and Kubernetes experience"),
        );
        let response = app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["skill_match_score"], 1.0);
        assert_eq!(json["candidate_info"]["name"], "John Smith");
    }

    #[tokio::test]
    async fn test_screen_upload_requires_resume() {
        let body = multipart_body(None, Some("Rust engineer"));
        let response = app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_screen_upload_requires_jd() {
        let body = multipart_body(Some(("resume.txt", "Rust developer")), None);
        let response = app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_screen_upload_rejects_docx() {
        let body = multipart_body(Some(("resume.docx", "binary")), Some("Rust engineer"));
        let response = app().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_screen_upload_over_limit_is_413() {
        let config = Config {
            max_upload_bytes: 256,
            ..Config::default()
        };
        let resume = "Rust ".repeat(200);
        let body = multipart_body(Some(("resume.txt", &resume)), Some("Rust engineer"));
        let response = build_router(test_state(config))
            .oneshot(multipart_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_history_routes_need_persistence() {
        for uri in [
            "/api/v1/history",
            "/api/v1/history?limit=5",
            "/api/v1/candidates",
            "/api/v1/screenings/6f1c1f5e-2b7e-4c57-9a53-6c4f0d3a9b11",
        ] {
            let response = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_history_rejects_non_positive_limit() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/history?limit=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! API Routes
//!
//! - `POST /analyze` - upload a file, get a report and chart
//! - `POST /chat` - ask about the report stored in the session
//! - `GET /health` - health check
//! - `/` and `/static/*` - front-end page and assets

pub mod analyze;
pub mod chat;
pub mod health;
pub mod static_files;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let max_upload_bytes = state.config.upload.max_bytes;
    let allowed_origins = state.config.server.cors_allowed_origins.clone();
    let static_dir = state.config.server.static_dir.clone();

    let api_router = Router::new()
        .merge(analyze::router())
        .merge(chat::router())
        .merge(health::router())
        .with_state(state);

    let router = Router::new()
        .merge(api_router)
        .merge(static_files::router(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &allowed_origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::{LLMAdapter, LLM};
    use crate::session::InMemorySessionStore;
    use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const BOUNDARY: &str = "report-test-boundary";

    /// Numbers its replies so each report can be told apart
    #[derive(Default)]
    struct StubModel {
        requests: Mutex<Vec<LLMRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl LLMAdapter for Arc<StubModel> {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            if self.fail {
                return Err(AppError::LLMApi("quota exceeded".to_string()));
            }
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            Ok(LLMResponse {
                content: format!("response {}", requests.len()),
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    fn app_with(model: Arc<StubModel>) -> Router {
        app_with_config(model, Config::default())
    }

    fn app_with_config(model: Arc<StubModel>, config: Config) -> Router {
        let state = AppState::new(
            config,
            LLM::with_adapter(Box::new(model), "stub"),
            Arc::new(InMemorySessionStore::new(3600)),
        );
        create_router(state)
    }

    fn multipart_body(file: Option<(&str, &[u8])>, lang: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some((filename, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(lang) = lang {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"lang\"\r\n\r\n{lang}\r\n").as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(file: Option<(&str, &[u8])>, lang: Option<&str>, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(multipart_body(file, lang))).unwrap()
    }

    fn chat_request(query: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
            .body(Body::from(serde_json::json!({ "query": query }).to_string()))
            .unwrap()
    }

    /// `name=value` part of the response's Set-Cookie header
    fn session_cookie_of(response: &axum::response::Response) -> String {
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn last_system_prompt(model: &StubModel) -> String {
        let requests = model.requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.messages[0].role, "system");
        last.messages[0].content.clone()
    }

    #[tokio::test]
    async fn test_analyze_returns_report_chart_and_cookie() {
        let model = Arc::new(StubModel::default());
        let app = app_with(model.clone());

        let csv = b"region,score\nnorth,1\nsouth,1\nnorth,2\neast,2\nwest,3\nnorth,3\nsouth,4\neast,4\nwest,5\nnorth,5\n";
        let response = app
            .oneshot(analyze_request(Some(("scores.csv", csv)), Some("English"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie_of(&response).starts_with("report_session="));

        let body = json_body(response).await;
        assert_eq!(body["report"], "response 1");
        assert_eq!(body["chart"]["column"], "score");
        assert_eq!(body["chart"]["values"], serde_json::json!([2, 2, 2, 2, 2]));
        assert_eq!(body["chart"]["labels"].as_array().unwrap().len(), 5);

        let requests = model.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert!(request.messages[0].content.contains("Language: English."));
        assert!(request.messages[0].content.contains("Input Data: DATA_TYPE: Numeric\nStats Summary:\n"));
    }

    #[tokio::test]
    async fn test_lang_defaults_to_arabic_and_chart_is_null_for_text() {
        let model = Arc::new(StubModel::default());
        let app = app_with(model.clone());

        let response = app
            .oneshot(analyze_request(Some(("notes.txt", b"hello")), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["chart"].is_null());

        let requests = model.requests.lock().unwrap();
        let prompt = &requests[0].messages[0].content;
        assert!(prompt.contains("Language: Arabic."));
        assert!(prompt.ends_with("Input Data: Unsupported Format"));
    }

    #[tokio::test]
    async fn test_unparseable_file_still_gets_a_report() {
        let model = Arc::new(StubModel::default());
        let app = app_with(model.clone());

        let response = app
            .oneshot(analyze_request(Some(("broken.xlsx", b"not a workbook")), Some("English"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["report"], "response 1");
        assert!(body["chart"].is_null());

        let requests = model.requests.lock().unwrap();
        assert!(requests[0].messages[0].content.contains("Input Data: Error: "));
    }

    #[tokio::test]
    async fn test_analyze_without_file_is_bad_request() {
        let app = app_with(Arc::new(StubModel::default()));
        let response = app.oneshot(analyze_request(None, Some("English"), None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("No file uploaded"));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_payload_too_large() {
        let model = Arc::new(StubModel::default());
        let mut config = Config::default();
        config.upload.max_bytes = 1024;
        let app = app_with_config(model.clone(), config);

        let data = vec![b'a'; 4096];
        let response = app
            .oneshot(analyze_request(Some(("big.csv", &data)), Some("English"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Upload too large"));
        assert!(model.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_json_error() {
        let app = app_with(Arc::new(StubModel::default()));
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"file\": \"report.csv\"}"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json"));
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_unissued_session_cookie_is_replaced() {
        let model = Arc::new(StubModel::default());
        let app = app_with(model.clone());

        let forged = format!("report_session={}", crate::session::SessionId::new());
        let response = app
            .clone()
            .oneshot(analyze_request(Some(("a.txt", b"x")), Some("English"), Some(&forged)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let issued = session_cookie_of(&response);
        assert_ne!(issued, forged);

        let response = app.clone().oneshot(chat_request("hello", Some(&forged))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let response = app.oneshot(chat_request("hello", Some(&issued))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_model_failure_is_bad_gateway() {
        let model = Arc::new(StubModel {
            fail: true,
            ..StubModel::default()
        });
        let app = app_with(model);
        let response = app
            .oneshot(analyze_request(Some(("notes.txt", b"x")), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_chat_uses_the_callers_report_only() {
        let model = Arc::new(StubModel::default());
        let app = app_with(model.clone());

        let csv = b"value\n1\n2\n3\n";
        let first = app
            .clone()
            .oneshot(analyze_request(Some(("numbers.csv", csv)), Some("English"), None))
            .await
            .unwrap();
        let cookie_a = session_cookie_of(&first);

        let second = app
            .clone()
            .oneshot(analyze_request(Some(("notes.txt", b"x")), Some("French"), None))
            .await
            .unwrap();
        let cookie_b = session_cookie_of(&second);
        assert_ne!(cookie_a, cookie_b);

        let response = app
            .clone()
            .oneshot(chat_request("What is the average?", Some(&cookie_a)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["answer"], "response 3");

        let prompt = last_system_prompt(&model);
        assert!(prompt.contains("Report: response 1\n"));
        assert!(prompt.contains("Data: DATA_TYPE: Numeric\nStats Summary:\n"));
        assert!(prompt.contains("Language: English."));
        assert!(!prompt.contains("response 2"));

        let response = app
            .oneshot(chat_request("Summarize", Some(&cookie_b)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let prompt = last_system_prompt(&model);
        assert!(prompt.contains("Report: response 2\n"));
        assert!(prompt.contains("Data: Unsupported Format\n"));
        assert!(prompt.contains("Language: French."));

        let requests = model.requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.temperature, None);
        assert_eq!(last.messages[1].content, "Summarize");
    }

    #[tokio::test]
    async fn test_reanalyze_overwrites_session() {
        let model = Arc::new(StubModel::default());
        let app = app_with(model.clone());

        let first = app
            .clone()
            .oneshot(analyze_request(Some(("a.txt", b"x")), Some("English"), None))
            .await
            .unwrap();
        let cookie = session_cookie_of(&first);

        let second = app
            .clone()
            .oneshot(analyze_request(Some(("b.png", b"x")), Some("German"), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(session_cookie_of(&second), cookie);

        app.oneshot(chat_request("What is shown?", Some(&cookie))).await.unwrap();
        let prompt = last_system_prompt(&model);
        assert!(prompt.contains("Report: response 2\n"));
        assert!(prompt.contains("Data: DATA_TYPE: Image\n"));
        assert!(prompt.contains("Language: German."));
    }

    #[tokio::test]
    async fn test_chat_without_session_is_conflict() {
        let model = Arc::new(StubModel::default());
        let app = app_with(model.clone());

        let response = app.clone().oneshot(chat_request("hello", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(json_body(response).await["error"].is_string());

        let unknown = format!("report_session={}", crate::session::SessionId::new());
        let response = app.oneshot(chat_request("hello", Some(&unknown))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(model.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_or_malformed_body() {
        let app = app_with(Arc::new(StubModel::default()));

        let response = app.clone().oneshot(chat_request("", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"question\": 1}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(StubModel::default()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "stub");
        assert_eq!(body["model"], "llama-3.3-70b-versatile");
    }

    #[tokio::test]
    async fn test_index_page() {
        let app = app_with(Arc::new(StubModel::default()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}

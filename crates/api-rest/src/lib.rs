//! # API REST
//!
//! REST API implementation for Med-AI.
//!
//! Handles:
//! - HTTP endpoints with axum (`/chat`, `/api/chat`, `/health`)
//! - Static assets and the root document for the web client
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (form decoding, JSON serialisation, CORS)
//!
//! Advice itself comes from `medai-core`; handlers never turn a provider or translation
//! failure into an HTTP error.

#![warn(rust_2018_idioms)]

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::Json,
    routing::{get, post},
    Form, Router,
};
use std::collections::HashMap;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ChatReq, ChatRes, HealthRes, HealthService};
use medai_core::{parse_history, AdviceService, ChatInput};

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub advice_service: AdviceService,
}

#[derive(OpenApi)]
#[openapi(paths(health, chat), components(schemas(HealthRes, ChatReq, ChatRes)))]
pub struct ApiDoc;

/// Build the REST router.
///
/// Unmatched paths are served from `static_dir`, which also provides `index.html` for `/`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/api/chat", post(chat))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the service and whether advice is grounded.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.advice_service.is_grounded()))
}

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body(content = ChatReq, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Advice and its translation", body = ChatRes),
        (status = 422, description = "Missing symptoms field")
    )
)]
/// Symptom chat endpoint
///
/// Also mounted at `/chat`. Accepts url-encoded or multipart form fields. The reply is
/// always a best-effort answer: provider outages fall back to templates and translation
/// failures return the English advice with a notice.
///
/// # Errors
/// Returns `422 Unprocessable Entity` if:
/// - the `symptoms` field is missing.
#[axum::debug_handler]
async fn chat(State(state): State<AppState>, ChatForm(req): ChatForm) -> Json<ChatRes> {
    let input = ChatInput {
        symptoms: req.symptoms,
        duration: Some(req.duration).filter(|d| !d.trim().is_empty()),
        language: req.language,
        history: parse_history(&req.history),
    };

    let result = state.advice_service.respond(&input).await;

    Json(ChatRes {
        reply: result.advice,
        reply_translated: result.translated,
    })
}

/// Chat form fields decoded from either url-encoded or multipart bodies.
///
/// Browsers posting a `FormData` object send multipart; scripted clients usually send
/// url-encoded forms.
pub struct ChatForm(pub ChatReq);

#[async_trait]
impl<S> FromRequest<S> for ChatForm
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(form) = Form::<ChatReq>::from_request(req, state)
                .await
                .map_err(|e| (e.status(), e.body_text()))?;
            return Ok(ChatForm(form));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| (e.status(), e.body_text()))?;
        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| (e.status(), e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| (e.status(), e.body_text()))?;
            fields.insert(name, value);
        }

        let symptoms = fields.remove("symptoms").ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing field `symptoms`".to_string(),
            )
        })?;

        Ok(ChatForm(ChatReq {
            symptoms,
            duration: fields.remove("duration").unwrap_or_default(),
            language: fields.remove("language").unwrap_or_else(|| "en".into()),
            history: fields.remove("history").unwrap_or_default(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http;
    use http_body_util::BodyExt;
    use medai_core::providers::{ChatProvider, ChatRequest};
    use medai_core::translate::Translator;
    use medai_core::{AssistantError, AssistantResult, KnowledgeBase, LanguageMode, ResolverConfig};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const FEVER: &str = "I see you have a fever. Monitor your temperature regularly and stay hydrated. If it persists beyond 3-4 days or exceeds 103°F (39.4°C), seek medical attention promptly.";

    #[derive(Default)]
    struct DownProvider {
        histories: Mutex<Vec<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl ChatProvider for DownProvider {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn send_chat(&self, request: &ChatRequest<'_>) -> AssistantResult<String> {
            self.histories.lock().unwrap().push(
                request
                    .history
                    .iter()
                    .map(|t| (t.role.as_str().to_string(), t.content.clone()))
                    .collect(),
            );
            Err(AssistantError::ProviderUnreachable("connection refused".into()))
        }
    }

    struct BrokenTranslator;

    #[async_trait]
    impl Translator for BrokenTranslator {
        async fn translate(
            &self,
            _text: &str,
            _source: &str,
            _target: &str,
        ) -> AssistantResult<String> {
            Err(AssistantError::TranslationFailed("offline".into()))
        }
    }

    fn app(provider: Arc<DownProvider>, static_dir: &Path) -> Router {
        let advice_service = AdviceService::new(
            provider,
            Arc::new(BrokenTranslator),
            Some(KnowledgeBase::from_text("DISEASE: Common Cold")),
            ResolverConfig::default(),
            LanguageMode::Translate,
        );
        router(AppState { advice_service }, static_dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_falls_back_when_provider_is_down() {
        let dir = TempDir::new().unwrap();
        let response = app(Arc::new(DownProvider::default()), dir.path())
            .oneshot(form_request(
                "/chat",
                "symptoms=continuous+sneezing+and+high+fever&language=en",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["reply"], FEVER);
        assert_eq!(json["reply_translated"], FEVER);
    }

    #[tokio::test]
    async fn test_translation_failure_appends_notice() {
        let dir = TempDir::new().unwrap();
        let response = app(Arc::new(DownProvider::default()), dir.path())
            .oneshot(form_request("/api/chat", "symptoms=fever&language=hi"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["reply"], FEVER);
        assert_eq!(
            json["reply_translated"],
            format!("{FEVER} (Translation unavailable)")
        );
    }

    #[tokio::test]
    async fn test_multipart_form_with_history() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(DownProvider::default());
        let body = concat!(
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"symptoms\"\r\n\r\n",
            "headache\r\n",
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"history\"\r\n\r\n",
            "[{\"role\":\"user\",\"content\":\"hi\"},{\"role\":\"model\",\"content\":\"hello\"}]\r\n",
            "--XBOUNDARY--\r\n",
        );
        let request = http::Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let response = app(provider.clone(), dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let histories = provider.histories.lock().unwrap().clone();
        assert_eq!(
            histories[0],
            vec![
                ("user".to_string(), "hi".to_string()),
                ("assistant".to_string(), "hello".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_history_is_ignored() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(DownProvider::default());

        let response = app(provider.clone(), dir.path())
            .oneshot(form_request("/chat", "symptoms=cough&history=%5Bnot+json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(provider.histories.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn test_missing_symptoms_is_rejected() {
        let dir = TempDir::new().unwrap();
        let response = app(Arc::new(DownProvider::default()), dir.path())
            .oneshot(form_request("/chat", "language=en"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_health_reports_grounding() {
        let dir = TempDir::new().unwrap();
        let response = app(Arc::new(DownProvider::default()), dir.path())
            .oneshot(
                http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["message"], "Med-AI is alive");
    }

    #[tokio::test]
    async fn test_health_reports_missing_knowledge_base() {
        let dir = TempDir::new().unwrap();
        let advice_service = AdviceService::new(
            Arc::new(DownProvider::default()),
            Arc::new(BrokenTranslator),
            None,
            ResolverConfig::default(),
            LanguageMode::Translate,
        );

        let response = router(AppState { advice_service }, dir.path())
            .oneshot(
                http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["message"], "Med-AI is alive (no knowledge base loaded)");
    }

    #[tokio::test]
    async fn test_root_serves_index_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Med-AI</h1>").unwrap();

        let response = app(Arc::new(DownProvider::default()), dir.path())
            .oneshot(http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>Med-AI</h1>");
    }
}

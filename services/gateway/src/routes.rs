//! HTTP surface of the gateway.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::history::HistoryStore;
use crate::openai::OpenAiClient;
use crate::pdf::{self, INVALID_PDF_MESSAGE};
use podcast_core::prompts::{build_instructions, DEFAULT_VOICE};
use podcast_types::PodcastConfig;

/// Voices the speech endpoint accepts; anything else falls back to the
/// default rather than failing the request.
const KNOWN_VOICES: [&str; 6] = ["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

pub struct AppState {
    pub openai: OpenAiClient,
    pub history: HistoryStore,
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/session", post(create_session))
        .route("/api/generate", post(generate))
        .route("/api/tts", post(tts))
        .route("/api/extract-pdf", post(extract_pdf))
        .route("/api/save", post(save))
        .route("/api/history", get(history))
        .with_state(state)
}

pub enum ApiError {
    Unauthorized,
    BadRequest(String),
    Upstream(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Upstream(e)
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> Self {
        ApiError::Upstream(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Upstream(e) => {
                error!("request failed: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

fn user_id(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::Unauthorized)
}

#[derive(Deserialize)]
struct SessionRequest {
    config: PodcastConfig,
}

async fn create_session(
    State(state): State<SharedState>,
    Json(request): Json<SessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let instructions = build_instructions(&request.config);
    let session = state
        .openai
        .create_realtime_session(&instructions, DEFAULT_VOICE)
        .await?;
    Ok(Json(session))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    prompt: String,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    1000
}

async fn generate(
    State(state): State<SharedState>,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = state
        .openai
        .generate_text(&request.prompt, request.max_tokens)
        .await?;
    Ok(Json(serde_json::json!({ "text": text })))
}

#[derive(Deserialize)]
struct TtsRequest {
    text: String,
    voice: String,
}

async fn tts(
    State(state): State<SharedState>,
    Json(request): Json<TtsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let voice = if KNOWN_VOICES.contains(&request.voice.as_str()) {
        request.voice.as_str()
    } else {
        DEFAULT_VOICE
    };
    let audio = state.openai.synthesize(&request.text, voice).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}

async fn extract_pdf(mut multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest(INVALID_PDF_MESSAGE.to_string()))?
    {
        if field.name() == Some("file") {
            upload = Some(
                field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest(INVALID_PDF_MESSAGE.to_string()))?,
            );
            break;
        }
    }
    let bytes = upload.ok_or_else(|| ApiError::BadRequest(INVALID_PDF_MESSAGE.to_string()))?;
    let extracted = pdf::extract_text(&bytes)
        .map_err(|_| ApiError::BadRequest(INVALID_PDF_MESSAGE.to_string()))?;
    Ok(Json(serde_json::json!({
        "text": extracted.text,
        "meta": {
            "pages": extracted.pages,
            "info": { "version": extracted.version },
        },
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest {
    topic: String,
    audio_url: Option<String>,
}

#[derive(Serialize)]
struct SaveResponse {
    ok: bool,
    id: i64,
}

async fn save(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<SaveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = user_id(&headers)?;
    let id = state
        .history
        .append(user, &request.topic, request.audio_url.as_deref())?;
    Ok(Json(SaveResponse { ok: true, id }))
}

async fn history(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let user = user_id(&headers)?;
    let rows = state.history.list(user)?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use axum::body::Body;
    use axum::http::Request;
    use secrecy::SecretString;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        let config = GatewayConfig {
            api_key: SecretString::from("test-key"),
            bind_addr: "127.0.0.1:0".to_string(),
            openai_base_url: "http://127.0.0.1:9".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            tts_model: "tts-1".to_string(),
            realtime_model: "gpt-4o-realtime-preview-2024-12-17".to_string(),
            history_db: ":memory:".to_string(),
        };
        Arc::new(AppState {
            openai: OpenAiClient::new(&config),
            history: HistoryStore::open(":memory:").unwrap(),
        })
    }

    #[tokio::test]
    async fn save_without_identity_is_unauthorized() {
        let response = router(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/save")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"topic":"경제 뉴스"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn save_appends_a_row_for_the_caller() {
        let state = test_state();
        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/save")
                    .header("content-type", "application/json")
                    .header("x-user-id", "user-1")
                    .body(Body::from(r#"{"topic":"경제 뉴스"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rows = state.history.list("user-1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].topic, "경제 뉴스");
    }

    #[tokio::test]
    async fn history_without_identity_is_unauthorized() {
        let response = router(test_state())
            .oneshot(
                Request::builder()
                    .uri("/api/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

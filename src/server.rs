use crate::client::WorkersAiClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::logging::{LogLevel, SharedLogger};
use crate::models::model_list;
use crate::translate::openai_types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::translate::request::chat_to_responses;
use crate::translate::response::responses_to_chat;
use crate::translate::streaming::{ChunkEmitter, Frame};

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub client: WorkersAiClient,
    pub logger: SharedLogger,
}

impl AppState {
    pub fn new(config: GatewayConfig, logger: SharedLogger) -> Result<Self> {
        let client = WorkersAiClient::new(&config)?;
        Ok(Self {
            config,
            client,
            logger,
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/v1/chat/completions",
            post(handle_chat_completions).fallback(handle_method_not_allowed),
        )
        .route(
            "/v1/models",
            get(handle_models).fallback(handle_method_not_allowed),
        )
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Exact match against `Bearer <client_key>`; open when no key is configured.
pub fn authorize(config: &GatewayConfig, headers: &HeaderMap) -> Result<()> {
    let Some(key) = config.client_key() else {
        return Ok(());
    };

    let presented = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    match presented {
        Some(value) if value.strip_prefix("Bearer ") == Some(key) => Ok(()),
        _ => Err(GatewayError::Auth),
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    authorize(&state.config, &headers)?;

    let request_id = uuid::Uuid::new_v4().to_string();
    state
        .logger
        .payload(LogLevel::Info, "client", &request_id, String::from_utf8_lossy(&body));

    let req: ChatCompletionRequest = serde_json::from_slice(&body).map_err(|e| {
        state
            .logger
            .error("server", format!("Failed to parse request {request_id}: {e}"));
        GatewayError::client_input(e.to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        requested_model = %req.model,
        messages = req.messages.len(),
        streaming = req.stream,
        "chat completion request"
    );

    let backend_req = chat_to_responses(&req, &state.config.model);

    let reply = match state.client.respond(&backend_req).await {
        Ok(reply) => reply,
        Err(e) => {
            match e.raw_body() {
                Some(raw) => state
                    .logger
                    .payload(LogLevel::Error, "backend", &request_id, raw),
                None => state
                    .logger
                    .error("backend", format!("Request {request_id} failed: {e}")),
            }
            return Err(e);
        }
    };

    state
        .logger
        .payload(LogLevel::Info, "backend", &request_id, reply.raw.as_str());

    let resp = responses_to_chat(&reply.result);

    tracing::info!(
        request_id = %request_id,
        prompt_tokens = resp.usage.prompt_tokens,
        completion_tokens = resp.usage.completion_tokens,
        "chat completion done"
    );

    if req.stream {
        Ok(stream_response(&resp))
    } else {
        Ok(Json(resp).into_response())
    }
}

fn stream_response(resp: &ChatCompletionResponse) -> Response {
    let events = paced(ChunkEmitter::new(resp)).map(|frame| {
        let event = match frame.data() {
            Ok(data) => Event::default().data(data),
            Err(e) => {
                tracing::error!("Failed to serialize chunk: {e}");
                Event::default().data(r#"{"error":"serialization failed"}"#)
            }
        };
        Ok::<_, Infallible>(event)
    });

    Sse::new(events).into_response()
}

/// Hand frames to the transport one at a time.
///
/// Yielding between frames lets the connection flush each event on its own
/// instead of coalescing the whole sequence into one write. If the client goes
/// away the body, and with it the emitter, is dropped before the next frame.
fn paced(frames: ChunkEmitter) -> impl Stream<Item = Frame> + Send + 'static {
    stream::iter(frames).then(|frame| async move {
        tokio::task::yield_now().await;
        frame
    })
}

async fn handle_models(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    authorize(&state.config, &headers)?;
    Ok(Json(model_list(&state.config)))
}

async fn handle_method_not_allowed(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response> {
    authorize(&state.config, &headers)?;
    Err(GatewayError::Method)
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config_with_key(key: Option<&str>) -> GatewayConfig {
        GatewayConfig {
            client_key: key.map(String::from),
            ..GatewayConfig::default()
        }
    }

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_no_key_configured_always_passes() {
        let config = config_with_key(None);
        assert!(authorize(&config, &HeaderMap::new()).is_ok());
        assert!(authorize(&config, &headers_with("Bearer anything")).is_ok());
    }

    #[test]
    fn test_key_must_match_exactly() {
        let config = config_with_key(Some("secret"));
        assert!(authorize(&config, &headers_with("Bearer secret")).is_ok());
        assert!(matches!(
            authorize(&config, &HeaderMap::new()),
            Err(GatewayError::Auth)
        ));
        assert!(authorize(&config, &headers_with("Bearer secret2")).is_err());
        assert!(authorize(&config, &headers_with("bearer secret")).is_err());
        assert!(authorize(&config, &headers_with("secret")).is_err());
    }
}

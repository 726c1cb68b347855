use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tariff_ai::workflows::billing::{DialogError, SessionKey};

use crate::infra::{AppState, ChatService};

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessageRequest {
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessageResponse {
    pub(crate) reply: String,
}

pub(crate) fn chat_router(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/api/v1/chat/messages", post(chat_message_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(service)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn chat_message_endpoint(
    State(service): State<Arc<ChatService>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(payload): Json<ChatMessageRequest>,
) -> Response {
    let session = payload
        .session_id
        .filter(|token| !token.trim().is_empty())
        .map(SessionKey::from)
        .unwrap_or_else(|| SessionKey::from_peer(peer));

    match service.resolve(&session, &payload.text).await {
        Ok(reply) => (StatusCode::OK, Json(ChatMessageResponse { reply })).into_response(),
        Err(DialogError::EmptyInput) => {
            let body = json!({ "error": "message text must not be empty" });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tariff_ai::config::TariffConfig;
    use tariff_ai::workflows::assistant::{AssistantClient, DisabledAssistant};
    use tariff_ai::workflows::billing::{DialogRouter, InMemorySessionStore};

    fn service() -> Arc<ChatService> {
        let store = Arc::new(InMemorySessionStore::new(Duration::from_secs(60), 16));
        let assistant: Arc<dyn AssistantClient> = Arc::new(DisabledAssistant);
        Arc::new(DialogRouter::new(
            store,
            assistant,
            TariffConfig {
                require_year: false,
                default_year: 2025,
            },
        ))
    }

    fn peer() -> ConnectInfo<SocketAddr> {
        ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40_000)))
    }

    #[tokio::test]
    async fn chat_endpoint_returns_a_reply() {
        let request = ChatMessageRequest {
            text: "12 m3 comercial 80".to_string(),
            session_id: Some("route-test".to_string()),
        };

        let response = chat_message_endpoint(State(service()), peer(), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_with_422() {
        let request = ChatMessageRequest {
            text: "   ".to_string(),
            session_id: None,
        };

        let response = chat_message_endpoint(State(service()), peer(), Json(request)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn out_of_scope_text_gets_the_canned_reply_when_disabled() {
        let request = ChatMessageRequest {
            text: "what are your business hours".to_string(),
            session_id: Some("route-test-2".to_string()),
        };

        let response = chat_message_endpoint(State(service()), peer(), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

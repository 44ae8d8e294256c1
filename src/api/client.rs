//! HTTP transport client for the worker endpoints.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiError, ChatRequest, ChatResponse, EchoRequest};
use crate::core::constants::{CHAT_ENDPOINT, ECHO_ENDPOINT, HELLO_ENDPOINT};
use crate::core::message::Message;
use crate::utils::url::{construct_api_url, normalize_base_url};

/// Client for the worker API, usually pointed at the local proxy gateway.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one chat turn. Whitespace-only input is a no-op: `Ok(None)` is
    /// returned without touching the network and the transcript stays as it
    /// was. `history` is the transcript snapshot taken before the new user
    /// message was appended.
    pub async fn send_chat(
        &self,
        message: &str,
        history: Vec<Message>,
    ) -> Result<Option<ChatResponse>, ApiError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let request = ChatRequest {
            message: trimmed.to_string(),
            history,
        };
        let response = self
            .http
            .post(construct_api_url(&self.base_url, CHAT_ENDPOINT))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_json(response).await.map(Some)
    }

    pub async fn hello(&self) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(construct_api_url(&self.base_url, HELLO_ENDPOINT))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_json(response).await
    }

    pub async fn echo(&self, message: &str, count: i64) -> Result<Value, ApiError> {
        let request = EchoRequest {
            message: message.to_string(),
            count,
        };
        let response = self
            .http
            .post(construct_api_url(&self.base_url, ECHO_ENDPOINT))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_json(response).await
    }
}

/// Status check, then body parse. Failing to read the body at all is a
/// transport problem; a body that reads but does not parse is a malformed
/// response.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    /// Serves a stub worker on an ephemeral port, returning its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Port 9 is discard; nothing listens there. Any attempted request fails,
    /// so a clean `Ok(None)` proves no network call was made.
    #[tokio::test]
    async fn whitespace_only_input_never_touches_the_network() {
        let client = ApiClient::new("http://127.0.0.1:9");
        for input in ["", "   ", " \t\n "] {
            let result = client.send_chat(input, Vec::new()).await.unwrap();
            assert!(result.is_none(), "input {input:?} should be a no-op");
        }
    }

    #[tokio::test]
    async fn send_chat_round_trips_reply_and_tools() {
        let router = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["message"], "hi");
                assert!(body["history"].is_array());
                Json(json!({"reply": "Bonjour", "toolsUsed": {"search": 1}}))
            }),
        );
        let client = ApiClient::new(&serve(router).await);

        let response = client
            .send_chat("  hi  ", vec![Message::greeting()])
            .await
            .unwrap()
            .expect("non-empty input sends");
        assert_eq!(response.reply, "Bonjour");
        assert!(response.tools_used.is_some());
    }

    #[tokio::test]
    async fn non_success_statuses_surface_as_http_errors() {
        let router = Router::new().route(
            "/api/chat",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = ApiClient::new(&serve(router).await);

        let err = client.send_chat("hi", Vec::new()).await.unwrap_err();
        match err {
            ApiError::Http { status } => assert_eq!(status, 500),
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_bodies_surface_as_malformed_responses() {
        let router = Router::new().route("/api/chat", post(|| async { "not json" }));
        let client = ApiClient::new(&serve(router).await);

        let err = client.send_chat("hi", Vec::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_backends_surface_as_network_errors() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.send_chat("hi", Vec::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn hello_and_echo_return_the_backend_json() {
        let router = Router::new()
            .route(
                "/api/hello",
                get(|| async { Json(json!({"message": "Hello from the worker"})) }),
            )
            .route(
                "/api/echo",
                post(|Json(body): Json<Value>| async move { Json(json!({"echo": body})) }),
            );
        let client = ApiClient::new(&serve(router).await);

        let hello = client.hello().await.unwrap();
        assert_eq!(hello["message"], "Hello from the worker");

        let echo = client.echo("Hello from Parley!", 3).await.unwrap();
        assert_eq!(echo["echo"]["message"], "Hello from Parley!");
        assert_eq!(echo["echo"]["count"], 3);
    }
}

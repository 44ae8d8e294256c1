//! Proxy gateway: a pure host-rewriting relay in front of the AI worker.
//!
//! Every inbound request is forwarded unmodified to an installed
//! [`WorkerBinding`] when one is present. Without a binding, the inbound URL
//! has only its hostname replaced by the configured worker hostname and the
//! request is relayed over the shared HTTP client; the upstream status,
//! headers, and body pass back through verbatim. Payload semantics are never
//! touched, and there is no retry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, request::Parts, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use reqwest::{Client, Url};

use crate::core::constants::DEFAULT_WORKER_URL;
use crate::utils::url::{rewrite_hostname, worker_hostname};

/// In-process stand-in for a platform service binding. When installed, the
/// gateway hands it every request instead of going over the network.
#[async_trait]
pub trait WorkerBinding: Send + Sync {
    async fn fetch(&self, request: Request) -> Result<Response, GatewayError>;
}

#[derive(Debug)]
pub enum GatewayError {
    /// The inbound URL or the configured worker hostname did not parse.
    InvalidUrl(String),
    /// The binding or the upstream relay failed.
    Upstream(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::InvalidUrl(detail) => write!(f, "invalid relay URL: {detail}"),
            GatewayError::Upstream(detail) => write!(f, "upstream error: {detail}"),
        }
    }
}

impl std::error::Error for GatewayError {}

#[derive(Clone)]
pub struct GatewayState {
    binding: Option<Arc<dyn WorkerBinding>>,
    worker_hostname: String,
    http: Client,
}

impl GatewayState {
    /// Builds relay state for the given worker URL (or bare hostname). An
    /// unparseable value falls back to the built-in default worker.
    pub fn new(worker_url: &str) -> Self {
        let worker_hostname = worker_hostname(worker_url).unwrap_or_else(|| {
            worker_hostname(DEFAULT_WORKER_URL).expect("default worker URL has a hostname")
        });
        Self {
            binding: None,
            worker_hostname,
            http: Client::new(),
        }
    }

    pub fn with_binding(mut self, binding: Arc<dyn WorkerBinding>) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn worker_hostname(&self) -> &str {
        &self.worker_hostname
    }
}

/// The relay accepts any method under any path, so everything routes through
/// the fallback handler.
pub fn router(state: GatewayState) -> Router {
    Router::new().fallback(forward).with_state(state)
}

/// Serve the relay until the process exits.
pub async fn run(listen_addr: &str, state: GatewayState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("Proxy gateway listening on {}", listener.local_addr()?);
    tracing::info!(
        "Relaying unbound requests to worker hostname {}",
        state.worker_hostname
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn forward(State(state): State<GatewayState>, request: Request) -> Response {
    match relay(&state, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "relay failed");
            (
                StatusCode::BAD_GATEWAY,
                format!("upstream relay failed: {err}"),
            )
                .into_response()
        }
    }
}

async fn relay(state: &GatewayState, request: Request) -> Result<Response, GatewayError> {
    if let Some(binding) = &state.binding {
        tracing::debug!("forwarding through installed worker binding");
        return binding.fetch(request).await;
    }

    let (parts, body) = request.into_parts();
    let inbound = inbound_url(&parts)?;
    let target = rewrite_hostname(&inbound, &state.worker_hostname)
        .map_err(GatewayError::InvalidUrl)?;
    let body = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    tracing::debug!(method = %parts.method, target = %target, "relaying to worker");

    let mut outbound = state.http.request(parts.method, target);
    for (name, value) in parts.headers.iter() {
        if is_end_to_end(name) {
            outbound = outbound.header(name, value);
        }
    }

    let upstream = outbound
        .body(body)
        .send()
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    let status = upstream.status();
    let headers = upstream.headers().clone();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    let mut response = Response::builder().status(status);
    for (name, value) in headers.iter() {
        if is_end_to_end(name) {
            response = response.header(name, value);
        }
    }
    response
        .body(Body::from(bytes))
        .map_err(|e| GatewayError::Upstream(e.to_string()))
}

/// Absolute form of the inbound request URL. Proxied requests normally arrive
/// in origin form, so the authority comes from the `Host` header.
fn inbound_url(parts: &Parts) -> Result<Url, GatewayError> {
    if parts.uri.scheme().is_some() {
        return Url::parse(&parts.uri.to_string())
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()));
    }

    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("127.0.0.1");
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Url::parse(&format!("http://{host}{path_and_query}"))
        .map_err(|e| GatewayError::InvalidUrl(e.to_string()))
}

/// Hop-by-hop headers stay on their own connection; `Host` and
/// `Content-Length` are recomputed for the rewritten target.
fn is_end_to_end(name: &HeaderName) -> bool {
    !matches!(
        name.as_str(),
        "host"
            | "content-length"
            | "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use axum::Json;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StaticBinding;

    #[async_trait]
    impl WorkerBinding for StaticBinding {
        async fn fetch(&self, _request: Request) -> Result<Response, GatewayError> {
            Response::builder()
                .status(StatusCode::CREATED)
                .header("x-worker", "bound")
                .body(Body::from("from binding"))
                .map_err(|e| GatewayError::Upstream(e.to_string()))
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Stub worker that reports what it received, bound to an ephemeral port.
    async fn serve_stub_worker() -> u16 {
        let app = Router::new().fallback(|request: Request| async move {
            let (parts, body) = request.into_parts();
            let body = to_bytes(body, usize::MAX).await.unwrap();
            Json(json!({
                "method": parts.method.as_str(),
                "path": parts.uri.path(),
                "query": parts.uri.query(),
                "body": String::from_utf8_lossy(&body),
            }))
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        port
    }

    #[tokio::test]
    async fn binding_takes_precedence_and_passes_through_untouched() {
        let state = GatewayState::new(DEFAULT_WORKER_URL).with_binding(Arc::new(StaticBinding));
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/hello")
            .body(Body::empty())
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-worker"], "bound");
        assert_eq!(body_string(response).await, "from binding");
    }

    /// The stub listens on 127.0.0.1 and the state rewrites to `localhost`,
    /// so the rewrite is what makes the relay reach it. Method, path, query,
    /// and body must arrive unchanged.
    #[tokio::test]
    async fn fallback_relays_with_only_the_hostname_rewritten() {
        let port = serve_stub_worker().await;
        let state = GatewayState::new("localhost");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/foo/bar?x=1")
            .header(header::HOST, format!("127.0.0.1:{port}"))
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("ping"))
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(seen["method"], "POST");
        assert_eq!(seen["path"], "/foo/bar");
        assert_eq!(seen["query"], "x=1");
        assert_eq!(seen["body"], "ping");
    }

    #[tokio::test]
    async fn unreachable_worker_surfaces_as_bad_gateway() {
        // Port 9 is discard; the relay target never answers.
        let state = GatewayState::new("localhost");
        let request = Request::builder()
            .uri("/api/hello")
            .header(header::HOST, "127.0.0.1:9")
            .body(Body::empty())
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn garbage_worker_urls_fall_back_to_the_default_hostname() {
        let state = GatewayState::new("not a url at all");
        assert_eq!(state.worker_hostname(), "ai-worker.example.workers.dev");
    }
}

//! Wire payloads and error taxonomy for the worker API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::core::constants::MISSING_REPLY_PLACEHOLDER;
use crate::core::message::Message;

pub mod client;

pub use client::ApiClient;

/// Outbound chat envelope: the new message plus a transcript snapshot taken
/// at send time.
#[derive(Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Message>,
}

/// Inbound chat envelope. A response without a `reply` field is still a
/// response; it renders as a fixed placeholder rather than failing the turn.
#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default = "missing_reply")]
    pub reply: String,
    #[serde(rename = "toolsUsed", default)]
    pub tools_used: Option<Value>,
}

fn missing_reply() -> String {
    MISSING_REPLY_PLACEHOLDER.to_string()
}

#[derive(Serialize)]
pub struct EchoRequest {
    pub message: String,
    pub count: i64,
}

/// Failures the transport client can report. The chat flow maps every kind to
/// the same local fallback reply; the demo flows print the message text. The
/// kind is kept distinct for diagnostics either way.
#[derive(Debug)]
pub enum ApiError {
    /// Non-success HTTP status from the backend or the proxy.
    Http { status: u16 },
    /// Response body did not parse as the expected JSON shape.
    MalformedResponse(String),
    /// The request never completed.
    Network(String),
}

impl ApiError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Http { .. } => "http",
            ApiError::MalformedResponse(_) => "malformed_response",
            ApiError::Network(_) => "network",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status } => write!(f, "HTTP error! status: {status}"),
            ApiError::MalformedResponse(detail) => {
                write!(f, "Malformed response from backend: {detail}")
            }
            ApiError::Network(detail) => write!(f, "Network error: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

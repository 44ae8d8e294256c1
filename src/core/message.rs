use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::constants::{fallback_reply_text, GREETING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// One transcript entry. Immutable once appended to a conversation; display
/// order is insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Structured tool-usage annotation passed through from the backend.
    #[serde(rename = "toolsUsed", default, skip_serializing_if = "Option::is_none")]
    pub tools_used: Option<Value>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tools_used: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>, tools_used: Option<Value>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tools_used,
        }
    }

    /// The seeded assistant greeting every conversation starts with.
    pub fn greeting() -> Self {
        Self::new(Role::Assistant, GREETING)
    }

    /// Deterministic local stand-in for a reply when a chat turn fails. The
    /// original user text is embedded verbatim.
    pub fn fallback(text: &str) -> Self {
        Self::new(Role::Assistant, fallback_reply_text(text))
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }

    pub fn has_tool_usage(&self) -> bool {
        self.tools_used.is_some()
    }
}

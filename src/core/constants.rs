//! Fixed strings and defaults shared across the application.

/// Worker endpoint used by the gateway's host-rewriting fallback when no
/// worker URL has been configured.
pub const DEFAULT_WORKER_URL: &str = "https://ai-worker.example.workers.dev";

/// Address the proxy gateway listens on unless configured otherwise.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8788";

pub const CHAT_ENDPOINT: &str = "api/chat";
pub const HELLO_ENDPOINT: &str = "api/hello";
pub const ECHO_ENDPOINT: &str = "api/echo";

/// Assistant greeting every conversation starts with.
pub const GREETING: &str = "你好！我是 AI 助手，很高兴见到你。有什么想聊的吗？";

/// Shown in place of a reply when the backend response carries none.
pub const MISSING_REPLY_PLACEHOLDER: &str = "（后端没有返回内容）";

/// Default message body for the echo demo command.
pub const DEFAULT_ECHO_MESSAGE: &str = "Hello from Parley!";

/// Builds the canned assistant reply used when a chat turn fails. The user's
/// text is embedded verbatim so the transcript stays coherent offline.
pub fn fallback_reply_text(text: &str) -> String {
    format!("我收到了你的消息：“{text}”。AI 服务暂时不可用，这是一条本地模拟回复。")
}

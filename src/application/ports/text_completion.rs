//! Text Completion Port - 对话补全模型抽象
//!
//! 定义 LLM 对话补全的抽象接口，具体实现在 infrastructure/adapters 层
//!
//! 不做缓存、不做重试：重试策略属于了解语义上下文的调用方

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 补全错误
#[derive(Debug, Error)]
pub enum CompletionError {
    /// 网络错误或非 2xx 响应
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// 响应缺少补全文本字段
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// 补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    /// 多轮消息，按顺序整体发送
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens,
        }
    }
}

/// Text Completion Port
///
/// 返回 assistant 的原始文本
#[async_trait]
pub trait TextCompletionPort: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::system("hi")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hi");
        let json = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}

//! HTTP Completion Client - 调用方舟（Ark）对话补全接口
//!
//! 实现 TextCompletionPort trait
//!
//! 外部 API:
//! POST https://ark.cn-beijing.volces.com/api/v3/chat/completions
//! Request: {"model", "messages", "thinking": {"type": "enabled"}, "stream": false,
//!           "max_tokens", "response_format": {"type": "text"}}
//! Response: choices[0].message.content

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{
    ChatMessage, CompletionError, CompletionRequest, TextCompletionPort,
};

/// `{"type": "..."}` 形式的选项
#[derive(Debug, Serialize)]
struct TypeTag {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// 补全请求体
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    thinking: TypeTag,
    stream: bool,
    max_tokens: u32,
    response_format: TypeTag,
}

/// HTTP 补全客户端配置
#[derive(Debug, Clone)]
pub struct HttpCompletionClientConfig {
    pub api_url: String,
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpCompletionClientConfig {
    fn default() -> Self {
        Self {
            api_url: "https://ark.cn-beijing.volces.com/api/v3/chat/completions".to_string(),
            api_key: String::new(),
            timeout_secs: 300,
        }
    }
}

impl HttpCompletionClientConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

pub struct HttpCompletionClient {
    client: Client,
    config: HttpCompletionClientConfig,
}

impl HttpCompletionClient {
    pub fn new(config: HttpCompletionClientConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Upstream(e.to_string()))?;

        Ok(Self { client, config })
    }
}

/// 从补全响应中取出 assistant 文本
pub(crate) fn extract_content(body: &Value) -> Result<String, CompletionError> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            CompletionError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}

#[async_trait]
impl TextCompletionPort for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            thinking: TypeTag { kind: "enabled" },
            stream: false,
            max_tokens: request.max_tokens,
            response_format: TypeTag { kind: "text" },
        };

        tracing::debug!(
            url = %self.config.api_url,
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Upstream(format!("Request timed out: {}", e))
                } else if e.is_connect() {
                    CompletionError::Upstream(format!("Cannot connect to completion service: {}", e))
                } else {
                    CompletionError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Upstream(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;
        let content = extract_content(&json)?;

        tracing::info!(
            model = %request.model,
            answer_chars = content.chars().count(),
            "Chat completion finished"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_default() {
        let config = HttpCompletionClientConfig::default();
        assert!(config.api_url.ends_with("/api/v3/chat/completions"));
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpCompletionClientConfig::new("http://llm.local/v1", "sk-test").with_timeout(30);
        assert_eq!(config.api_url, "http://llm.local/v1");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = ChatCompletionBody {
            model: "m",
            messages: &messages,
            thinking: TypeTag { kind: "enabled" },
            stream: false,
            max_tokens: 2048,
            response_format: TypeTag { kind: "text" },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["thinking"]["type"], "enabled");
        assert_eq!(json["response_format"]["type"], "text");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn test_extract_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "你好"}}]});
        assert_eq!(extract_content(&body).unwrap(), "你好");

        let err = extract_content(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
        let err = extract_content(&json!({"error": {"message": "quota"}})).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }
}

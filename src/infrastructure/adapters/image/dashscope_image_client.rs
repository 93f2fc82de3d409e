//! DashScope Image Client - 调用 DashScope 文生图异步任务接口
//!
//! 实现 ImageGenerationPort trait
//!
//! 外部 API:
//! POST {create_url}  (Header: X-DashScope-Async: enable)
//! Request: {"model", "input": {"prompt"}, "parameters": {"size", "n"}}
//! Response: {"output": {"task_id"}}
//!
//! GET {task_url}/{task_id}
//! Response: {"output": {"task_status", "results": [{"url"}]}}
//!
//! 内容审核拒绝表现为 HTTP 400 且响应体包含 `DataInspectionFailed`

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{
    ImageGenerationError, ImageGenerationPort, ImageTask, ImageTaskStatus,
};

const MODERATION_MARKER: &str = "DataInspectionFailed";
const ERROR_BODY_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct CreateTaskBody<'a> {
    model: &'a str,
    input: CreateTaskInput<'a>,
    parameters: CreateTaskParameters<'a>,
}

#[derive(Debug, Serialize)]
struct CreateTaskInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateTaskParameters<'a> {
    size: &'a str,
    n: u32,
}

/// DashScope 客户端配置
#[derive(Debug, Clone)]
pub struct DashScopeImageClientConfig {
    pub api_key: String,
    pub create_url: String,
    pub task_url: String,
    pub model: String,
    /// 形如 `1024*1024`
    pub size: String,
    pub n: u32,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for DashScopeImageClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            create_url:
                "https://dashscope.aliyuncs.com/api/v1/services/aigc/text2image/image-synthesis"
                    .to_string(),
            task_url: "https://dashscope.aliyuncs.com/api/v1/tasks".to_string(),
            model: "wan2.2-t2i-plus".to_string(),
            size: "1024*1024".to_string(),
            n: 1,
            request_timeout_secs: 180,
        }
    }
}

pub struct DashScopeImageClient {
    client: Client,
    config: DashScopeImageClientConfig,
}

impl DashScopeImageClient {
    pub fn new(config: DashScopeImageClientConfig) -> Result<Self, ImageGenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ImageGenerationError::Upstream(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn task_status_url(&self, task_id: &str) -> String {
        format!("{}/{}", self.config.task_url.trim_end_matches('/'), task_id)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect()
}

fn network_error(e: reqwest::Error) -> ImageGenerationError {
    if e.is_timeout() {
        ImageGenerationError::Upstream(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        ImageGenerationError::Upstream(format!("Cannot connect to image service: {}", e))
    } else {
        ImageGenerationError::Upstream(e.to_string())
    }
}

/// 解析创建任务的响应
///
/// 审核拒绝优先于其它错误判断，拒绝原因取响应 JSON 的 `message`，否则取原文
pub(crate) fn classify_submit_response(
    status: StatusCode,
    body: &str,
) -> Result<String, ImageGenerationError> {
    if status == StatusCode::BAD_REQUEST && body.contains(MODERATION_MARKER) {
        let rejection_reason = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| preview(body));
        return Err(ImageGenerationError::ModerationRejected { rejection_reason });
    }

    if !status.is_success() {
        return Err(ImageGenerationError::Upstream(format!(
            "HTTP {}: {}",
            status,
            preview(body)
        )));
    }

    let json: Value = serde_json::from_str(body)
        .map_err(|e| ImageGenerationError::MalformedResponse(e.to_string()))?;
    json.pointer("/output/task_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ImageGenerationError::MalformedResponse("missing output.task_id".to_string()))
}

/// 解析任务查询响应
pub(crate) fn parse_task_body(task_id: &str, body: &Value) -> ImageTask {
    let output = body.get("output");
    let field = |name: &str| {
        output
            .and_then(|o| o.get(name))
            .or_else(|| body.get(name))
            .and_then(Value::as_str)
    };

    let status = field("task_status")
        .map(ImageTaskStatus::parse)
        .unwrap_or(ImageTaskStatus::Unknown);

    let mut task = ImageTask::new(task_id, status);
    task.result_urls = output
        .and_then(|o| o.get("results"))
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r.get("url").and_then(Value::as_str))
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    task.message = field("message").map(str::to_string);
    task
}

#[async_trait]
impl ImageGenerationPort for DashScopeImageClient {
    async fn submit(&self, prompt: &str) -> Result<String, ImageGenerationError> {
        let body = CreateTaskBody {
            model: &self.config.model,
            input: CreateTaskInput { prompt },
            parameters: CreateTaskParameters {
                size: &self.config.size,
                n: self.config.n,
            },
        };

        tracing::debug!(
            url = %self.config.create_url,
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "Submitting image task"
        );

        let response = self
            .client
            .post(&self.config.create_url)
            .bearer_auth(&self.config.api_key)
            .header("X-DashScope-Async", "enable")
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let text = response.text().await.map_err(network_error)?;
        let task_id = classify_submit_response(status, &text)?;

        tracing::info!(task_id = %task_id, "Image task submitted");
        Ok(task_id)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<ImageTask, ImageGenerationError> {
        let response = self
            .client
            .get(&self.task_status_url(task_id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImageGenerationError::Upstream(format!(
                "HTTP {}: {}",
                status,
                preview(&error_text)
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ImageGenerationError::MalformedResponse(e.to_string()))?;
        let task = parse_task_body(task_id, &json);

        tracing::debug!(task_id = %task_id, status = task.status.as_str(), "Image task polled");
        Ok(task)
    }
}

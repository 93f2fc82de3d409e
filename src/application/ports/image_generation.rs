//! Image Generation Port - 文生图异步任务抽象
//!
//! 提交任务 → 查询任务状态；轮询循环见 application::services::ImageGenerator

use async_trait::async_trait;
use thiserror::Error;

/// 出图错误
#[derive(Debug, Error)]
pub enum ImageGenerationError {
    /// 内容审核拒绝，唯一会触发改写重试的错误
    #[error("Prompt rejected by moderation: {rejection_reason}")]
    ModerationRejected { rejection_reason: String },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Image task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },

    #[error("Image task {task_id} did not finish within {timeout_secs}s")]
    TaskTimeout { task_id: String, timeout_secs: u64 },
}

impl ImageGenerationError {
    pub fn is_moderation_rejection(&self) -> bool {
        matches!(self, Self::ModerationRejected { .. })
    }
}

/// 远端任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    /// 未识别的状态，继续轮询
    Unknown,
}

impl ImageTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageTaskStatus::Pending => "PENDING",
            ImageTaskStatus::Running => "RUNNING",
            ImageTaskStatus::Succeeded => "SUCCEEDED",
            ImageTaskStatus::Failed => "FAILED",
            ImageTaskStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "PENDING" => ImageTaskStatus::Pending,
            "RUNNING" => ImageTaskStatus::Running,
            "SUCCEEDED" => ImageTaskStatus::Succeeded,
            "FAILED" | "CANCELED" => ImageTaskStatus::Failed,
            _ => ImageTaskStatus::Unknown,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ImageTaskStatus::Succeeded | ImageTaskStatus::Failed)
    }
}

/// 出图任务快照（仅在内存中存在，终态后丢弃）
#[derive(Debug, Clone)]
pub struct ImageTask {
    pub task_id: String,
    pub status: ImageTaskStatus,
    pub result_urls: Vec<String>,
    /// 失败时服务端给出的说明
    pub message: Option<String>,
}

impl ImageTask {
    pub fn new(task_id: impl Into<String>, status: ImageTaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            result_urls: Vec::new(),
            message: None,
        }
    }
}

/// Image Generation Port
#[async_trait]
pub trait ImageGenerationPort: Send + Sync {
    /// 创建出图任务，返回 task_id
    async fn submit(&self, prompt: &str) -> Result<String, ImageGenerationError>;

    /// 读取任务当前状态
    async fn fetch_task(&self, task_id: &str) -> Result<ImageTask, ImageGenerationError>;
}

//! Image Generator - 出图任务提交与轮询

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::application::ports::{ImageGenerationError, ImageGenerationPort, ImageTaskStatus};

/// 轮询配置
#[derive(Debug, Clone)]
pub struct ImageGeneratorConfig {
    /// 两次查询之间的间隔
    pub poll_interval: Duration,
    /// 单个任务的墙钟超时
    pub poll_timeout: Duration,
}

impl Default for ImageGeneratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(300),
        }
    }
}

/// 出图客户端：提交异步任务并轮询到终态
pub struct ImageGenerator {
    port: Arc<dyn ImageGenerationPort>,
    config: ImageGeneratorConfig,
}

impl ImageGenerator {
    pub fn new(port: Arc<dyn ImageGenerationPort>, config: ImageGeneratorConfig) -> Self {
        Self { port, config }
    }

    /// 提交出图任务
    pub async fn submit(&self, prompt: &str) -> Result<String, ImageGenerationError> {
        let task_id = self.port.submit(prompt).await?;
        tracing::debug!(task_id = %task_id, prompt_len = prompt.chars().count(), "Image task submitted");
        Ok(task_id)
    }

    /// 轮询任务直到终态或超时
    ///
    /// 查询失败（如任务暂时查不到）视为瞬时错误，在截止时间前继续重试
    pub async fn poll(
        &self,
        task_id: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, ImageGenerationError> {
        let deadline = Instant::now() + timeout;
        let timed_out = || ImageGenerationError::TaskTimeout {
            task_id: task_id.to_string(),
            timeout_secs: timeout.as_secs(),
        };

        loop {
            // 单次查询同样受截止时间约束，挂起的请求不能拖过墙钟超时
            let fetched = tokio::time::timeout_at(deadline, self.port.fetch_task(task_id))
                .await
                .map_err(|_| timed_out())?;

            match fetched {
                Ok(task) => match task.status {
                    ImageTaskStatus::Succeeded => {
                        if task.result_urls.is_empty() {
                            tracing::warn!(task_id = %task_id, "Image task succeeded without result urls");
                        }
                        return Ok(task.result_urls);
                    }
                    ImageTaskStatus::Failed => {
                        return Err(ImageGenerationError::TaskFailed {
                            task_id: task_id.to_string(),
                            message: task
                                .message
                                .unwrap_or_else(|| "task reported FAILED".to_string()),
                        });
                    }
                    ImageTaskStatus::Pending | ImageTaskStatus::Running => {
                        tracing::debug!(task_id = %task_id, status = task.status.as_str(), "Image task in progress");
                    }
                    ImageTaskStatus::Unknown => {
                        tracing::warn!(task_id = %task_id, "Image task reported unknown status, polling on");
                    }
                },
                Err(e) => {
                    tracing::warn!(task_id = %task_id, error = %e, "Image task query failed, retrying");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(timed_out());
            }
            tokio::time::sleep(self.config.poll_interval.min(deadline - now)).await;
        }
    }

    /// 提交并按默认超时轮询
    pub async fn generate(&self, prompt: &str) -> Result<Vec<String>, ImageGenerationError> {
        let task_id = self.submit(prompt).await?;
        self.poll(&task_id, self.config.poll_timeout).await
    }
}

//! Moderation Retry Controller - 单场景出图与审核拒绝后的改写重试
//!
//! 状态机：
//! 构建 Prompt → 提交 → [审核拒绝] → LLM 安全改写 → 提交改写后的 Prompt 一次 → 轮询
//!
//! 改写重试只做一次，第二次失败（包括再次被拒）即记为失败哨兵；
//! 改写本身失败时沿用原 Prompt 完成这一次重试

use std::sync::Arc;

use super::image_generator::ImageGenerator;
use crate::application::ports::{
    ChatMessage, CompletionError, CompletionRequest, ImageGenerationError, TextCompletionPort,
};
use crate::domain::{build_prompt, Scene, SceneImage, VisualSpec};

const REWRITE_MAX_TOKENS: u32 = 1024;

const REWRITE_SYSTEM_PROMPT: &str =
    "你是一个负责任的安全改写助手，擅长将可能违规的文本改写为健康安全的描述。";

/// 单个场景的生成结果
#[derive(Debug, Clone)]
pub struct GeneratedPanel {
    /// 首次提交的 Prompt
    pub prompt: String,
    pub image: SceneImage,
}

pub struct ModerationRetryController {
    completion: Arc<dyn TextCompletionPort>,
    images: ImageGenerator,
    rewrite_model: String,
}

impl ModerationRetryController {
    pub fn new(
        completion: Arc<dyn TextCompletionPort>,
        images: ImageGenerator,
        rewrite_model: impl Into<String>,
    ) -> Self {
        Self {
            completion,
            images,
            rewrite_model: rewrite_model.into(),
        }
    }

    /// 为场景出图；任何失败都转换为空字符串哨兵，不向上传播
    pub async fn generate_with_retry(
        &self,
        index: usize,
        scene: &Scene,
        spec: &VisualSpec,
    ) -> GeneratedPanel {
        let prompt = build_prompt(scene, spec);

        let image = match self.attempt(index, &prompt).await {
            Ok(urls) => {
                tracing::info!(scene_index = index, scene_id = %scene.id, urls = ?urls, "Scene image generated");
                SceneImage::from_urls(urls)
            }
            Err(e) => {
                tracing::error!(scene_index = index, scene_id = %scene.id, error = %e, "Scene image failed");
                SceneImage::failed()
            }
        };

        GeneratedPanel { prompt, image }
    }

    async fn attempt(&self, index: usize, prompt: &str) -> Result<Vec<String>, ImageGenerationError> {
        match self.images.generate(prompt).await {
            Ok(urls) => Ok(urls),
            Err(ImageGenerationError::ModerationRejected { rejection_reason }) => {
                tracing::warn!(
                    scene_index = index,
                    reason = %rejection_reason,
                    "Prompt rejected by moderation, rewriting once"
                );
                let retry_prompt = match self.rewrite(prompt).await {
                    Ok(safe_prompt) => safe_prompt,
                    Err(e) => {
                        tracing::warn!(scene_index = index, error = %e, "Safe rewrite failed, retrying with original prompt");
                        prompt.to_string()
                    }
                };
                self.images.generate(&retry_prompt).await
            }
            Err(e) => Err(e),
        }
    }

    /// 让 LLM 把被拒绝的 Prompt 改写为安全版本
    async fn rewrite(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest::new(
            self.rewrite_model.clone(),
            vec![
                ChatMessage::system(REWRITE_SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "请将以下场景描述改写为安全、积极、健康的画面提示，\
                     去除血腥、暴力、裸露、宗教或政治内容，只保留叙事性画面与情感氛围：\n\n{}",
                    prompt
                )),
            ],
            REWRITE_MAX_TOKENS,
        );

        let rewritten = self.completion.complete(request).await?;
        let rewritten = rewritten.trim();
        if rewritten.is_empty() {
            return Err(CompletionError::MalformedResponse(
                "safe rewrite returned empty text".to_string(),
            ));
        }
        Ok(rewritten.to_string())
    }
}

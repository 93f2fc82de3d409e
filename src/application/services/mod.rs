//! Application Services - 分镜生成流水线
//!
//! 数据自上而下流动：
//! 原文 → 场景 → 视觉规范 → 单场景 Prompt → 单场景出图 → 汇总结果
//!
//! 各服务不持有跨请求状态，唯一的等待点是出图任务轮询

mod image_generator;
mod moderation_retry;
mod scene_extractor;
mod storyboard;
mod visual_synthesizer;

pub use image_generator::{ImageGenerator, ImageGeneratorConfig};
pub use moderation_retry::{GeneratedPanel, ModerationRetryController};
pub use scene_extractor::SceneExtractor;
pub use storyboard::StoryboardGenerator;
pub use visual_synthesizer::{VisualSpecInput, VisualSpecSynthesizer};

/// 各环节使用的补全模型
#[derive(Debug, Clone)]
pub struct PromptModels {
    /// 场景拆分
    pub scene: String,
    /// 角色设定分析
    pub role: String,
    /// 画风分析
    pub style: String,
    /// 设定合并
    pub merge: String,
    /// 审核拒绝后的安全改写
    pub rewrite: String,
    /// 原始文本润色
    pub polish: String,
}

impl Default for PromptModels {
    fn default() -> Self {
        Self {
            scene: "doubao-seed-1-6-thinking-250715".to_string(),
            role: "doubao-seed-1-6-thinking-250715".to_string(),
            style: "doubao-1-5-thinking-pro-250415".to_string(),
            merge: "doubao-seed-1-6-thinking-250715".to_string(),
            rewrite: "doubao-seed-1-6-thinking-250715".to_string(),
            polish: "doubao-1-5-thinking-pro-250415".to_string(),
        }
    }
}

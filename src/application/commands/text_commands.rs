//! Text Commands

use crate::domain::VisualSpec;

/// 把用户原始文本整理为小说并识别场景
#[derive(Debug, Clone)]
pub struct GenerateNovel {
    pub text: String,
}

/// 从小说正文识别分镜场景
#[derive(Debug, Clone)]
pub struct ExtractScenes {
    pub novel_text: String,
    pub visual_spec: Option<VisualSpec>,
    /// 期望的分镜数量，为空由模型决定
    pub num_shots: Option<u32>,
}

impl ExtractScenes {
    pub fn from_text(novel_text: impl Into<String>) -> Self {
        Self {
            novel_text: novel_text.into(),
            visual_spec: None,
            num_shots: None,
        }
    }
}

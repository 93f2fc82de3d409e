//! Storyboard Commands

use crate::domain::{Scene, VisualSpec};

/// 分析角色与画风，生成视觉规范
#[derive(Debug, Clone, Default)]
pub struct AnalyzeVisual {
    pub novel_text: String,
    pub role_text: String,
    pub style_text: String,
    pub role_images: Vec<String>,
    pub style_images: Vec<String>,
}

/// 为场景列表逐个出图
#[derive(Debug, Clone)]
pub struct GenerateStoryboard {
    pub novel_text: String,
    pub scenes: Vec<Scene>,
    pub visual_spec: VisualSpec,
}

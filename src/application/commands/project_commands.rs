//! Project Commands

use uuid::Uuid;

use crate::domain::{Scene, SceneImage, VisualSpec};

/// 保存项目
///
/// 未给出的字段保持原值；`id` 不属于调用者时新建项目
#[derive(Debug, Clone, Default)]
pub struct SaveProject {
    pub owner_id: String,
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub novel_text: Option<String>,
    pub scenes: Option<Vec<Scene>>,
    pub visual_spec: Option<VisualSpec>,
    pub images: Option<Vec<SceneImage>>,
}

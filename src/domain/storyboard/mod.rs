//! Storyboard Context - 分镜限界上下文
//!
//! 职责:
//! - 场景实体（规范化后不可变）
//! - 视觉规范值对象（整批只读共享）
//! - 分镜生成结果（与输入场景按位置对齐）

mod entities;
mod value_objects;

pub use entities::{Scene, EMPTY_DESCRIPTION, UNTITLED_SCENE_PREFIX};
pub use value_objects::{SceneImage, StoryboardResult, VisualSpec};

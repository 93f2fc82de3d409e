//! Domain Layer - 领域层
//!
//! 分镜限界上下文:
//! - Scene: 从小说中拆出的单个叙事片段
//! - VisualSpec: 整批分镜共享的视觉规范
//! - 纯函数: 场景解析、分镜 Prompt 构建、JSON 存储编码

pub mod storyboard;

mod json_blob;
mod prompt_builder;
mod scene_parser;

pub use json_blob::{safe_json_dumps, safe_json_loads};
pub use prompt_builder::{build_prompt, redact, BANNED_TERMS, REDACTION_GLYPH, STYLE_ANCHOR};
pub use scene_parser::{normalize_scenes, parse_scenes};
pub use storyboard::{Scene, SceneImage, StoryboardResult, VisualSpec};

//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：小说整理、场景识别、视觉分析、分镜出图、项目保存

mod project_commands;
mod storyboard_commands;
mod text_commands;

pub mod handlers;

pub use project_commands::*;
pub use storyboard_commands::*;
pub use text_commands::*;

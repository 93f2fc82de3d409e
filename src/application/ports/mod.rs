//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod image_generation;
mod repositories;
mod text_completion;

pub use image_generation::{ImageGenerationError, ImageGenerationPort, ImageTask, ImageTaskStatus};
pub use repositories::{ProjectRecord, ProjectRepositoryPort, RepositoryError};
pub use text_completion::{
    ChatMessage, ChatRole, CompletionError, CompletionRequest, TextCompletionPort,
};

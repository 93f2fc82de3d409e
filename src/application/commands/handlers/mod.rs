//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod project_handlers;
mod storyboard_handlers;
mod text_handlers;

pub use project_handlers::*;
pub use storyboard_handlers::*;
pub use text_handlers::*;

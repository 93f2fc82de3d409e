//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：项目读取

mod project_queries;

pub mod handlers;

pub use project_queries::*;

//! HTTP Layer - RESTful API
//!
//! 所有响应使用 `{errno, error, data}` 统一格式

pub mod dto;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use identity::CallerIdentity;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::{AppState, PipelineSettings};

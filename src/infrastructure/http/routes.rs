//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                          GET   健康检查
//! - /api/text/generate_novel           POST  原始文本整理为小说并识别场景
//! - /api/text/scene_recognition        POST  小说场景识别
//! - /api/scene/recognize               POST  结合视觉规范的场景识别
//! - /api/visual/analyze                POST  合成视觉规范
//! - /api/image/generate_storyboard     POST  逐场景出图
//! - /api/project/save                  POST  保存项目
//! - /api/project/get/:id               GET   获取完整项目
//! - /api/project/list                  GET   列出项目

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/text", text_routes())
        .route("/scene/recognize", post(handlers::recognize_scenes))
        .route("/visual/analyze", post(handlers::analyze_visual))
        .route("/image/generate_storyboard", post(handlers::generate_storyboard))
        .nest("/project", project_routes())
}

/// Text 路由
fn text_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate_novel", post(handlers::generate_novel))
        .route("/scene_recognition", post(handlers::scene_recognition))
}

/// Project 路由
fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/save", post(handlers::save_project))
        .route("/get/:project_id", get(handlers::get_project))
        .route("/list", get(handlers::list_projects))
}

//! Visual HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::AnalyzeVisual;
use crate::domain::VisualSpec;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 参考图以路径/URL 形式传入，上传由前置服务完成
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeVisualRequest {
    pub novel_text: String,
    pub role_text: String,
    pub style_text: String,
    pub role_images: Vec<String>,
    pub style_images: Vec<String>,
}

/// 合成角色与画风视觉规范
pub async fn analyze_visual(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeVisualRequest>,
) -> Result<Json<ApiResponse<VisualSpec>>, ApiError> {
    let spec = state
        .analyze_visual_handler
        .handle(AnalyzeVisual {
            novel_text: req.novel_text,
            role_text: req.role_text,
            style_text: req.style_text,
            role_images: req.role_images,
            style_images: req.style_images,
        })
        .await?;

    Ok(Json(ApiResponse::success(spec)))
}

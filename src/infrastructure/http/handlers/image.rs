//! Image HTTP Handlers - 分镜出图

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::GenerateStoryboard;
use crate::domain::{normalize_scenes, StoryboardResult, VisualSpec};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

/// 场景按原样接收，再经过与 LLM 输出相同的规范化
#[derive(Debug, Deserialize)]
pub struct GenerateStoryboardRequest {
    #[serde(default)]
    pub novel_text: String,
    #[serde(default)]
    pub scenes: Vec<Value>,
    #[serde(default)]
    pub visual_spec: VisualSpec,
}

/// 逐场景出图
///
/// 单个场景失败只体现在对应位置的空字符串上，请求本身总是成功
pub async fn generate_storyboard(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateStoryboardRequest>,
) -> Json<ApiResponse<StoryboardResult>> {
    let scenes = normalize_scenes(req.scenes);

    let result = state
        .generate_storyboard_handler
        .handle(GenerateStoryboard {
            novel_text: req.novel_text,
            scenes,
            visual_spec: req.visual_spec,
        })
        .await;

    Json(ApiResponse::success(result))
}

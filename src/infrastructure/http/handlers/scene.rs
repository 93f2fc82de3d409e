//! Scene HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use super::text::ScenesResponse;
use crate::application::ExtractScenes;
use crate::domain::VisualSpec;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecognizeScenesRequest {
    #[serde(default)]
    pub novel_text: String,
    #[serde(default)]
    pub visual_spec: Option<VisualSpec>,
    #[serde(default)]
    pub num_shots: Option<u32>,
}

/// 结合视觉规范做场景识别，可指定分镜数量
pub async fn recognize_scenes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecognizeScenesRequest>,
) -> Result<Json<ApiResponse<ScenesResponse>>, ApiError> {
    let scenes = state
        .extract_scenes_handler
        .handle(ExtractScenes {
            novel_text: req.novel_text,
            visual_spec: req.visual_spec,
            num_shots: req.num_shots.filter(|n| *n > 0),
        })
        .await?;

    Ok(Json(ApiResponse::success(ScenesResponse { scenes })))
}

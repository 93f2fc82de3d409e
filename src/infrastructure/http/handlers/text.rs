//! Text HTTP Handlers - 小说整理与场景识别

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{ExtractScenes, GenerateNovel};
use crate::domain::Scene;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct NovelResponse {
    pub novel_text: String,
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Serialize)]
pub struct ScenesResponse {
    pub scenes: Vec<Scene>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 把用户原始文本整理成小说，并识别场景
pub async fn generate_novel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let response = state
        .generate_novel_handler
        .handle(GenerateNovel { text: req.text })
        .await?;

    Ok(Json(ApiResponse::success(NovelResponse {
        novel_text: response.novel_text,
        scenes: response.scenes,
    })))
}

/// 直接对已有小说文本做场景识别
pub async fn scene_recognition(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ApiResponse<ScenesResponse>>, ApiError> {
    let scenes = state
        .extract_scenes_handler
        .handle(ExtractScenes::from_text(req.text))
        .await?;

    Ok(Json(ApiResponse::success(ScenesResponse { scenes })))
}

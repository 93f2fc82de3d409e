//! Project HTTP Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{GetProject, ListProjects, ProjectDetail, ProjectSummary, SaveProject};
use crate::domain::{normalize_scenes, Scene, SceneImage, VisualSpec};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::identity::CallerIdentity;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveProjectRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub novel_text: Option<String>,
    pub scenes: Option<Vec<Value>>,
    pub visual_spec: Option<VisualSpec>,
    pub images: Option<Vec<SceneImage>>,
}

#[derive(Debug, Serialize)]
pub struct SaveProjectResponse {
    pub project_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub novel_text: String,
    pub scenes: Vec<Scene>,
    pub visual_spec: VisualSpec,
    pub images: Vec<SceneImage>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectDetail> for ProjectResponse {
    fn from(detail: ProjectDetail) -> Self {
        Self {
            id: detail.id,
            name: detail.name,
            novel_text: detail.novel_text,
            scenes: detail.scenes,
            visual_spec: detail.visual_spec,
            images: detail.images,
            created_at: detail.created_at.to_rfc3339(),
            updated_at: detail.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListItem {
    pub id: Uuid,
    pub name: String,
    /// `YYYY-MM-DD HH:MM`
    pub updated_at: String,
    pub preview_text: String,
    pub image_cover: Option<String>,
}

impl From<ProjectSummary> for ProjectListItem {
    fn from(summary: ProjectSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            updated_at: summary.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            preview_text: summary.preview_text,
            image_cover: summary.image_cover,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectListItem>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 保存项目（新建或更新调用者自己的项目）
pub async fn save_project(
    State(state): State<Arc<AppState>>,
    CallerIdentity(owner_id): CallerIdentity,
    Json(req): Json<SaveProjectRequest>,
) -> Result<Json<ApiResponse<SaveProjectResponse>>, ApiError> {
    let saved = state
        .save_project_handler
        .handle(SaveProject {
            owner_id,
            id: req.id,
            name: req.name,
            novel_text: req.novel_text,
            scenes: req.scenes.map(normalize_scenes),
            visual_spec: req.visual_spec,
            images: req.images,
        })
        .await?;

    Ok(Json(ApiResponse::success(SaveProjectResponse {
        project_id: saved.project_id,
    })))
}

/// 获取完整项目
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    CallerIdentity(owner_id): CallerIdentity,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let detail = state
        .get_project_handler
        .handle(GetProject {
            owner_id,
            project_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ProjectResponse::from(detail))))
}

/// 列出调用者的项目
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    CallerIdentity(owner_id): CallerIdentity,
) -> Result<Json<ApiResponse<ProjectListResponse>>, ApiError> {
    let projects = state
        .list_projects_handler
        .handle(ListProjects { owner_id })
        .await?;

    Ok(Json(ApiResponse::success(ProjectListResponse {
        projects: projects.into_iter().map(ProjectListItem::from).collect(),
    })))
}

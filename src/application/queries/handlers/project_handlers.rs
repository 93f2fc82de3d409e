//! Project Query Handlers

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{ProjectRecord, ProjectRepositoryPort};
use crate::application::queries::{GetProject, ListProjects};
use crate::domain::{safe_json_loads, Scene, SceneImage, VisualSpec};

const PREVIEW_CHARS: usize = 100;

// ============================================================================
// Response DTOs
// ============================================================================

/// 项目详情，JSON 字段解码失败时取空值
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub name: String,
    pub novel_text: String,
    pub scenes: Vec<Scene>,
    pub visual_spec: VisualSpec,
    pub images: Vec<SceneImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRecord> for ProjectDetail {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            scenes: safe_json_loads(&record.scenes_json).unwrap_or_default(),
            visual_spec: safe_json_loads(&record.visual_spec_json).unwrap_or_default(),
            images: safe_json_loads(&record.images_json).unwrap_or_default(),
            name: record.name,
            novel_text: record.novel_text,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// 项目列表卡片
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    /// 正文前 100 个字符
    pub preview_text: String,
    /// 第一张成功的图片
    pub image_cover: Option<String>,
}

impl From<ProjectRecord> for ProjectSummary {
    fn from(record: ProjectRecord) -> Self {
        let images: Vec<SceneImage> = safe_json_loads(&record.images_json).unwrap_or_default();
        Self {
            id: record.id,
            preview_text: record.novel_text.chars().take(PREVIEW_CHARS).collect(),
            image_cover: images
                .iter()
                .find_map(|image| image.first_url())
                .map(str::to_string),
            name: record.name,
            updated_at: record.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetProject Handler
pub struct GetProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl GetProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: GetProject) -> Result<ProjectDetail, ApplicationError> {
        let project = self
            .project_repo
            .find_for_owner(query.project_id, &query.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", query.project_id))?;

        Ok(ProjectDetail::from(project))
    }
}

/// ListProjects Handler
pub struct ListProjectsHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl ListProjectsHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: ListProjects) -> Result<Vec<ProjectSummary>, ApplicationError> {
        let projects = self.project_repo.list_by_owner(&query.owner_id).await?;
        Ok(projects.into_iter().map(ProjectSummary::from).collect())
    }
}

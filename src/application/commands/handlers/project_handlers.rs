//! Project Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::SaveProject;
use crate::application::error::ApplicationError;
use crate::application::ports::{ProjectRecord, ProjectRepositoryPort};
use crate::domain::safe_json_dumps;

pub const DEFAULT_PROJECT_NAME: &str = "未命名项目";

/// 保存结果
#[derive(Debug, Clone)]
pub struct SaveProjectResponse {
    pub project_id: Uuid,
    /// true 表示新建
    pub created: bool,
}

/// SaveProject Handler
pub struct SaveProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl SaveProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, command: SaveProject) -> Result<SaveProjectResponse, ApplicationError> {
        let now = Utc::now();

        let existing = match command.id {
            Some(id) => {
                self.project_repo
                    .find_for_owner(id, &command.owner_id)
                    .await?
            }
            None => None,
        };
        let created = existing.is_none();

        let mut project = match existing {
            Some(project) => project,
            None => {
                if let Some(id) = command.id {
                    // 不存在或不属于调用者
                    tracing::warn!(
                        requested_id = %id,
                        owner = %command.owner_id,
                        "Project not owned by caller, creating a new one"
                    );
                }
                ProjectRecord {
                    id: Uuid::new_v4(),
                    owner_id: command.owner_id.clone(),
                    name: DEFAULT_PROJECT_NAME.to_string(),
                    novel_text: String::new(),
                    scenes_json: String::new(),
                    visual_spec_json: String::new(),
                    images_json: String::new(),
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        if let Some(name) = command.name.filter(|n| !n.trim().is_empty()) {
            project.name = name;
        }
        if let Some(novel_text) = command.novel_text {
            project.novel_text = novel_text;
        }
        if let Some(scenes) = &command.scenes {
            project.scenes_json = safe_json_dumps(scenes)?;
        }
        if let Some(visual_spec) = &command.visual_spec {
            project.visual_spec_json = safe_json_dumps(visual_spec)?;
        }
        if let Some(images) = &command.images {
            project.images_json = safe_json_dumps(images)?;
        }
        project.updated_at = now;

        self.project_repo.save(&project).await?;

        tracing::info!(
            project_id = %project.id,
            owner = %project.owner_id,
            created = created,
            "Project saved"
        );

        Ok(SaveProjectResponse {
            project_id: project.id,
            created,
        })
    }
}

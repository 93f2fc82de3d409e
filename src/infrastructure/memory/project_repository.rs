//! In-Memory Project Repository Implementation

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{ProjectRecord, ProjectRepositoryPort, RepositoryError};

/// 内存项目仓库
pub struct InMemoryProjectRepository {
    projects: DashMap<Uuid, ProjectRecord>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self {
            projects: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepositoryPort for InMemoryProjectRepository {
    async fn save(&self, project: &ProjectRecord) -> Result<(), RepositoryError> {
        // 归属检查与写入在同一个分片锁内完成
        match self.projects.entry(project.id) {
            Entry::Occupied(mut entry) => {
                if entry.get().owner_id != project.owner_id {
                    return Err(RepositoryError::StorageError(format!(
                        "Project {} belongs to another owner",
                        project.id
                    )));
                }
                entry.insert(project.clone());
            }
            Entry::Vacant(entry) => {
                entry.insert(project.clone());
            }
        }
        tracing::debug!(project_id = %project.id, owner = %project.owner_id, "Project stored");
        Ok(())
    }

    async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<ProjectRecord>, RepositoryError> {
        Ok(self
            .projects
            .get(&id)
            .filter(|p| p.owner_id == owner_id)
            .map(|p| p.clone()))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let mut projects: Vec<ProjectRecord> = self
            .projects
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }
}

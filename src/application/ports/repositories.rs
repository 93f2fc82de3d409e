//! Repository Ports - 出站端口
//!
//! 项目存储的抽象接口，项目中的场景/视觉规范/图片均为 JSON 字符串

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// 分镜项目（用于持久化）
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub id: Uuid,
    /// 所属用户，由认证层提供
    pub owner_id: String,
    pub name: String,
    pub novel_text: String,
    pub scenes_json: String,
    pub visual_spec_json: String,
    pub images_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project Repository Port
///
/// 所有读操作都按 owner 限定范围
#[async_trait]
pub trait ProjectRepositoryPort: Send + Sync {
    /// 保存项目（按 id 覆盖）
    async fn save(&self, project: &ProjectRecord) -> Result<(), RepositoryError>;

    /// 查找属于 owner 的项目
    async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<ProjectRecord>, RepositoryError>;

    /// 列出 owner 的所有项目，按更新时间倒序
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ProjectRecord>, RepositoryError>;
}

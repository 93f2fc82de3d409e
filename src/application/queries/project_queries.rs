//! Project Queries

use uuid::Uuid;

/// 获取调用者的完整项目
#[derive(Debug, Clone)]
pub struct GetProject {
    pub owner_id: String,
    pub project_id: Uuid,
}

/// 列出调用者的所有项目
#[derive(Debug, Clone)]
pub struct ListProjects {
    pub owner_id: String,
}

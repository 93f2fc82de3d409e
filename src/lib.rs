//! Storyboard - 小说转分镜图服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Storyboard Context: Scene、VisualSpec、SceneImage
//! - 纯函数: 场景解析、分镜 Prompt 构建（含敏感词替换）、JSON 存储编码
//!
//! 应用层 (application/):
//! - Ports: TextCompletion、ImageGeneration、ProjectRepository
//! - Services: 视觉规范合成、场景识别、出图轮询、审核改写重试、分镜编排
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 方舟补全客户端、DashScope 出图客户端及测试替身
//! - Memory: 项目存储内存实现
//! - HTTP: RESTful API

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

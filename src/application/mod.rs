//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextCompletion、ImageGeneration、Repository）
//! - services: 视觉规范合成、场景识别、出图轮询、审核重试、分镜编排
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod services;

// Re-exports
pub use commands::{
    AnalyzeVisual,
    ExtractScenes,
    GenerateNovel,
    GenerateStoryboard,
    SaveProject,
    // Handlers
    handlers::{
        AnalyzeVisualHandler, ExtractScenesHandler, GenerateNovelHandler,
        GenerateNovelResponse, GenerateStoryboardHandler, SaveProjectHandler,
        SaveProjectResponse, DEFAULT_PROJECT_NAME,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Text completion
    ChatMessage,
    ChatRole,
    CompletionError,
    CompletionRequest,
    TextCompletionPort,
    // Image generation
    ImageGenerationError,
    ImageGenerationPort,
    ImageTask,
    ImageTaskStatus,
    // Repositories
    ProjectRecord,
    ProjectRepositoryPort,
    RepositoryError,
};

pub use queries::{
    GetProject,
    ListProjects,
    // Handlers
    handlers::{GetProjectHandler, ListProjectsHandler, ProjectDetail, ProjectSummary},
};

pub use services::{
    GeneratedPanel, ImageGenerator, ImageGeneratorConfig, ModerationRetryController,
    PromptModels, SceneExtractor, StoryboardGenerator, VisualSpecInput,
    VisualSpecSynthesizer,
};

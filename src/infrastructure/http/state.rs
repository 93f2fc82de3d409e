//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AnalyzeVisualHandler, ExtractScenesHandler, GenerateNovelHandler, GenerateStoryboardHandler,
    SaveProjectHandler,
    // Query handlers
    GetProjectHandler, ListProjectsHandler,
    // Services
    ImageGenerator, ImageGeneratorConfig, ModerationRetryController, PromptModels,
    SceneExtractor, StoryboardGenerator, VisualSpecSynthesizer,
    // Ports
    ImageGenerationPort, ProjectRepositoryPort, TextCompletionPort,
};

/// 流水线参数
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub models: PromptModels,
    pub image: ImageGeneratorConfig,
    pub max_concurrent_scenes: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            models: PromptModels::default(),
            image: ImageGeneratorConfig::default(),
            max_concurrent_scenes: 1,
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub generate_novel_handler: GenerateNovelHandler,
    pub extract_scenes_handler: ExtractScenesHandler,
    pub analyze_visual_handler: AnalyzeVisualHandler,
    pub generate_storyboard_handler: GenerateStoryboardHandler,
    pub save_project_handler: SaveProjectHandler,

    // ========== Query Handlers ==========
    pub get_project_handler: GetProjectHandler,
    pub list_projects_handler: ListProjectsHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        completion: Arc<dyn TextCompletionPort>,
        images: Arc<dyn ImageGenerationPort>,
        project_repo: Arc<dyn ProjectRepositoryPort>,
        settings: PipelineSettings,
    ) -> Self {
        let extractor = Arc::new(SceneExtractor::new(
            completion.clone(),
            settings.models.clone(),
        ));
        let synthesizer = Arc::new(VisualSpecSynthesizer::new(
            completion.clone(),
            settings.models.clone(),
        ));
        let controller = Arc::new(ModerationRetryController::new(
            completion,
            ImageGenerator::new(images, settings.image),
            settings.models.rewrite,
        ));
        let storyboard = Arc::new(StoryboardGenerator::new(
            controller,
            settings.max_concurrent_scenes,
        ));

        Self {
            // Command handlers
            generate_novel_handler: GenerateNovelHandler::new(extractor.clone()),
            extract_scenes_handler: ExtractScenesHandler::new(extractor),
            analyze_visual_handler: AnalyzeVisualHandler::new(synthesizer),
            generate_storyboard_handler: GenerateStoryboardHandler::new(storyboard),
            save_project_handler: SaveProjectHandler::new(project_repo.clone()),

            // Query handlers
            get_project_handler: GetProjectHandler::new(project_repo.clone()),
            list_projects_handler: ListProjectsHandler::new(project_repo),
        }
    }
}

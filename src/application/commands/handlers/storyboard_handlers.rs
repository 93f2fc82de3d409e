//! Storyboard Command Handlers

use std::sync::Arc;

use crate::application::commands::{AnalyzeVisual, GenerateStoryboard};
use crate::application::error::ApplicationError;
use crate::application::services::{StoryboardGenerator, VisualSpecInput, VisualSpecSynthesizer};
use crate::domain::{StoryboardResult, VisualSpec};

// ============================================================================
// AnalyzeVisual
// ============================================================================

/// AnalyzeVisual Handler
pub struct AnalyzeVisualHandler {
    synthesizer: Arc<VisualSpecSynthesizer>,
}

impl AnalyzeVisualHandler {
    pub fn new(synthesizer: Arc<VisualSpecSynthesizer>) -> Self {
        Self { synthesizer }
    }

    pub async fn handle(&self, command: AnalyzeVisual) -> Result<VisualSpec, ApplicationError> {
        let input = VisualSpecInput {
            novel_text: command.novel_text,
            role_hint: command.role_text,
            style_hint: command.style_text,
            role_images: command.role_images,
            style_images: command.style_images,
        };

        Ok(self.synthesizer.synthesize(&input).await?)
    }
}

// ============================================================================
// GenerateStoryboard
// ============================================================================

/// GenerateStoryboard Handler
///
/// 单场景失败已在结果中以空字符串标记，整批请求本身不会失败
pub struct GenerateStoryboardHandler {
    generator: Arc<StoryboardGenerator>,
}

impl GenerateStoryboardHandler {
    pub fn new(generator: Arc<StoryboardGenerator>) -> Self {
        Self { generator }
    }

    pub async fn handle(&self, command: GenerateStoryboard) -> StoryboardResult {
        self.generator
            .run(&command.novel_text, &command.scenes, &command.visual_spec)
            .await
    }
}

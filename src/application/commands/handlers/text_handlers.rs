//! Text Command Handlers

use std::sync::Arc;

use crate::application::commands::{ExtractScenes, GenerateNovel};
use crate::application::error::ApplicationError;
use crate::application::services::SceneExtractor;
use crate::domain::Scene;

// ============================================================================
// ExtractScenes
// ============================================================================

/// ExtractScenes Handler
pub struct ExtractScenesHandler {
    extractor: Arc<SceneExtractor>,
}

impl ExtractScenesHandler {
    pub fn new(extractor: Arc<SceneExtractor>) -> Self {
        Self { extractor }
    }

    pub async fn handle(&self, command: ExtractScenes) -> Result<Vec<Scene>, ApplicationError> {
        if command.novel_text.trim().is_empty() {
            return Err(ApplicationError::validation("Empty novel_text"));
        }

        let scenes = self
            .extractor
            .extract(
                &command.novel_text,
                command.visual_spec.as_ref(),
                command.num_shots,
            )
            .await?;

        Ok(scenes)
    }
}

// ============================================================================
// GenerateNovel
// ============================================================================

/// 整理后的小说与其场景
#[derive(Debug, Clone)]
pub struct GenerateNovelResponse {
    pub novel_text: String,
    pub scenes: Vec<Scene>,
}

/// GenerateNovel Handler - 润色后立即做场景识别
pub struct GenerateNovelHandler {
    extractor: Arc<SceneExtractor>,
}

impl GenerateNovelHandler {
    pub fn new(extractor: Arc<SceneExtractor>) -> Self {
        Self { extractor }
    }

    pub async fn handle(
        &self,
        command: GenerateNovel,
    ) -> Result<GenerateNovelResponse, ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::validation("Empty text"));
        }

        let novel_text = self.extractor.polish(&command.text).await?;
        let scenes = self.extractor.extract(&novel_text, None, None).await?;

        tracing::info!(
            raw_chars = command.text.chars().count(),
            novel_chars = novel_text.chars().count(),
            scenes = scenes.len(),
            "Novel generated"
        );

        Ok(GenerateNovelResponse { novel_text, scenes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::PromptModels;
    use crate::infrastructure::adapters::FakeCompletionClient;

    fn extractor(client: Arc<FakeCompletionClient>) -> Arc<SceneExtractor> {
        Arc::new(SceneExtractor::new(client, PromptModels::default()))
    }

    #[tokio::test]
    async fn test_blank_text_rejected_without_llm_call() {
        let client = Arc::new(FakeCompletionClient::fixed("[]"));
        let handler = ExtractScenesHandler::new(extractor(client.clone()));

        let err = handler.handle(ExtractScenes::from_text("  \n")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let handler = GenerateNovelHandler::new(extractor(client.clone()));
        let err = handler
            .handle(GenerateNovel { text: String::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_novel_polishes_then_extracts() {
        let client = Arc::new(FakeCompletionClient::new(|request| {
            if request.model == PromptModels::default().polish {
                Ok("雨夜，林舟推开了客栈的门。".to_string())
            } else {
                Ok(r#"[{"id":"1","title":"客栈","description":"林舟推门而入"}]"#.to_string())
            }
        }));
        let handler = GenerateNovelHandler::new(extractor(client.clone()));

        let response = handler
            .handle(GenerateNovel { text: "林舟 雨夜 客栈".to_string() })
            .await
            .unwrap();

        assert_eq!(response.novel_text, "雨夜，林舟推开了客栈的门。");
        assert_eq!(response.scenes.len(), 1);
        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].messages[1].content.contains("雨夜，林舟推开了客栈的门。"));
    }

    #[tokio::test]
    async fn test_completion_error_maps_to_external_service() {
        let client = Arc::new(FakeCompletionClient::new(|_| {
            Err(crate::application::ports::CompletionError::Upstream("HTTP 500".to_string()))
        }));
        let handler = ExtractScenesHandler::new(extractor(client));

        let err = handler.handle(ExtractScenes::from_text("小说")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
    }
}

//! Scene Extractor - 小说润色与场景拆分

use std::sync::Arc;

use super::PromptModels;
use crate::application::ports::{
    ChatMessage, CompletionError, CompletionRequest, TextCompletionPort,
};
use crate::domain::{parse_scenes, Scene, VisualSpec};

const SCENE_MAX_TOKENS: u32 = 8192;
const POLISH_MAX_TOKENS: u32 = 8192;

const SCENE_SYSTEM_PROMPT: &str = "你是分镜场景拆解助手。请把长篇小说内容拆成一个个‘分镜场景片段’，\
每个片段描述发生的时间/地点/主要人物/关键动作画面。\
请用JSON数组输出，每个元素形如：\
{ \"id\": \"1\", \"title\": \"场景标题\", \"description\": \"画面描述\" }";

const POLISH_SYSTEM_PROMPT: &str = "你是小说润色和补全助手。\
把用户提供的文本整理成一段连贯的小说内容，纠正口语、补充缺失代词、\
保持叙事风格，勿跳脱原设定。输出成连贯中文小说正文。";

pub struct SceneExtractor {
    completion: Arc<dyn TextCompletionPort>,
    models: PromptModels,
}

impl SceneExtractor {
    pub fn new(completion: Arc<dyn TextCompletionPort>, models: PromptModels) -> Self {
        Self { completion, models }
    }

    /// 把小说拆分为分镜场景
    ///
    /// 给出视觉规范时一并作为上下文；`num_shots` 为空时由模型自行决定数量
    pub async fn extract(
        &self,
        novel_text: &str,
        visual_spec: Option<&VisualSpec>,
        num_shots: Option<u32>,
    ) -> Result<Vec<Scene>, CompletionError> {
        let mut user = match num_shots {
            Some(n) => format!("请将全书划分为 {} 个分镜。\n\n", n),
            None => "请根据情节自行决定分镜数量。\n\n".to_string(),
        };
        if let Some(spec) = visual_spec {
            user.push_str(&format!(
                "【角色描述】\n{}\n\n【画风描述】\n{}\n\n",
                spec.role_features, spec.art_style
            ));
        }
        user.push_str(&format!(
            "【小说正文】\n{}\n\n请直接给我JSON数组，不要多余解释。",
            novel_text
        ));

        let request = CompletionRequest::new(
            self.models.scene.clone(),
            vec![ChatMessage::system(SCENE_SYSTEM_PROMPT), ChatMessage::user(user)],
            SCENE_MAX_TOKENS,
        );
        let raw = self.completion.complete(request).await?;
        let scenes = parse_scenes(&raw);

        tracing::info!(
            scenes = scenes.len(),
            requested = ?num_shots,
            raw_chars = raw.chars().count(),
            "Scenes extracted"
        );
        if scenes.is_empty() {
            tracing::warn!("Scene extraction produced no scenes");
        }

        Ok(scenes)
    }

    /// 把用户原始文本润色为正式小说正文
    pub async fn polish(&self, raw_text: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest::new(
            self.models.polish.clone(),
            vec![
                ChatMessage::system(POLISH_SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "用户原始文本：\n{}\n\n请整理成正式小说文本：",
                    raw_text
                )),
            ],
            POLISH_MAX_TOKENS,
        );
        let novel_text = self.completion.complete(request).await?;
        Ok(novel_text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FakeCompletionClient;

    #[tokio::test]
    async fn test_extract_parses_json_answer() {
        let client = Arc::new(FakeCompletionClient::fixed(
            r#"[{"id":"1","title":"Dawn","description":"..."},{"id":"2","title":"Duel","description":"..."}]"#,
        ));
        let extractor = SceneExtractor::new(client.clone(), PromptModels::default());

        let scenes = extractor.extract("novel", None, None).await.unwrap();

        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[1].title, "Duel");
        let request = &client.requests()[0];
        assert_eq!(request.model, PromptModels::default().scene);
        assert!(request.messages[1].content.contains("请根据情节自行决定分镜数量"));
        assert!(!request.messages[1].content.contains("【角色描述】"));
    }

    #[tokio::test]
    async fn test_extract_with_spec_and_shot_count() {
        let client = Arc::new(FakeCompletionClient::fixed("1. 开场\n城门打开"));
        let extractor = SceneExtractor::new(client.clone(), PromptModels::default());
        let spec = VisualSpec::merge("白发剑客", "水墨", &[], &[]);

        let scenes = extractor.extract("novel", Some(&spec), Some(6)).await.unwrap();

        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].title, "开场");
        let user = &client.requests()[0].messages[1].content;
        assert!(user.contains("请将全书划分为 6 个分镜"));
        assert!(user.contains("白发剑客"));
        assert!(user.contains("水墨"));
    }

    #[tokio::test]
    async fn test_extract_propagates_completion_error() {
        let client = Arc::new(FakeCompletionClient::new(|_| {
            Err(CompletionError::MalformedResponse("no choices".to_string()))
        }));
        let extractor = SceneExtractor::new(client, PromptModels::default());

        let err = extractor.extract("novel", None, None).await.unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_polish_uses_polish_model() {
        let client = Arc::new(FakeCompletionClient::fixed("\n正式的小说正文。\n"));
        let extractor = SceneExtractor::new(client.clone(), PromptModels::default());

        let text = extractor.polish("随便写的几句话").await.unwrap();

        assert_eq!(text, "正式的小说正文。");
        let request = &client.requests()[0];
        assert_eq!(request.model, PromptModels::default().polish);
        assert!(request.messages[1].content.contains("随便写的几句话"));
    }
}

//! Visual Spec Synthesizer - 视觉规范合成
//!
//! 角色与画风各走三次补全：
//! 1. 基于小说全文分析
//! 2. 基于用户补充描述分析
//! 3. 由模型合并两份结果并消除矛盾（直接拼接常出现瞳色不一致之类的冲突）
//!
//! 任一调用失败整体失败，不返回残缺的视觉规范

use std::sync::Arc;

use super::PromptModels;
use crate::application::ports::{
    ChatMessage, CompletionError, CompletionRequest, TextCompletionPort,
};
use crate::domain::VisualSpec;

const ANALYSIS_MAX_TOKENS: u32 = 2048;

/// 合成输入
#[derive(Debug, Clone, Default)]
pub struct VisualSpecInput {
    pub novel_text: String,
    pub role_hint: String,
    pub style_hint: String,
    pub role_images: Vec<String>,
    pub style_images: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Aspect {
    Role,
    Style,
}

impl Aspect {
    fn name(&self) -> &'static str {
        match self {
            Aspect::Role => "role",
            Aspect::Style => "style",
        }
    }

    fn analyst_prompt(&self) -> &'static str {
        match self {
            Aspect::Role => {
                "你是视觉设定分析助手。\
                 你需要总结主要角色的外貌、性格、服饰、年龄、体态、标志性特征。\
                 请输出一段清晰可执行的美术指导文本，面向画师/图像模型。"
            }
            Aspect::Style => {
                "你是画面/画风分析助手。\
                 请输出统一的画风规范，需要涵盖：画风类型(如厚涂/日漫/写实/国漫等)、色调、镜头语言、质感。\
                 请用一段连续文字说明，面向AI出图模型。"
            }
        }
    }

    fn from_text(&self, novel_text: &str) -> Vec<ChatMessage> {
        let ask = match self {
            Aspect::Role => "请根据小说内容给出主要角色的统一视觉设定：",
            Aspect::Style => "请根据小说整体氛围给出统一的画面风格设定，不要只列点，而是完整陈述：",
        };
        vec![
            ChatMessage::system(self.analyst_prompt()),
            ChatMessage::user(format!("【小说全文片段】:\n{}\n\n{}", novel_text, ask)),
        ]
    }

    fn from_hint(&self, hint: &str) -> Vec<ChatMessage> {
        let (label, ask) = match self {
            Aspect::Role => (
                "【用户额外角色设定补充】",
                "请把用户的描述整理成统一的角色视觉设定：",
            ),
            Aspect::Style => (
                "【用户希望的画风/镜头气质补充】",
                "请把用户的描述整理成统一的画面风格设定：",
            ),
        };
        vec![
            ChatMessage::system(self.analyst_prompt()),
            ChatMessage::user(format!("{}:\n{}\n\n{}", label, hint, ask)),
        ]
    }

    fn merge(&self, from_text: &str, from_hint: &str) -> Vec<ChatMessage> {
        let subject = match self {
            Aspect::Role => "角色设定",
            Aspect::Style => "画面风格设定",
        };
        vec![
            ChatMessage::system(format!(
                "你是美术设定整合助手。你会收到两份独立生成的{subject}，\
                 请合并为一个前后一致的版本：相互矛盾的描述只保留一种，冲突时优先采用用户补充的内容，\
                 不要重复啰嗦，输出一段连续文字。"
            )),
            ChatMessage::user(format!(
                "【基于小说全文的{subject}】:\n{from_text}\n\n\
                 【基于用户补充的{subject}】:\n{from_hint}\n\n\
                 请给出整合后的统一{subject}："
            )),
        ]
    }
}

pub struct VisualSpecSynthesizer {
    completion: Arc<dyn TextCompletionPort>,
    models: PromptModels,
}

impl VisualSpecSynthesizer {
    pub fn new(completion: Arc<dyn TextCompletionPort>, models: PromptModels) -> Self {
        Self { completion, models }
    }

    /// 合成视觉规范
    pub async fn synthesize(&self, input: &VisualSpecInput) -> Result<VisualSpec, CompletionError> {
        let (role_features, art_style) = tokio::try_join!(
            self.synthesize_aspect(Aspect::Role, &input.novel_text, &input.role_hint),
            self.synthesize_aspect(Aspect::Style, &input.novel_text, &input.style_hint),
        )?;

        let spec = VisualSpec::merge(
            role_features,
            art_style,
            &input.role_images,
            &input.style_images,
        );

        tracing::info!(
            role_chars = spec.role_features.chars().count(),
            style_chars = spec.art_style.chars().count(),
            reference_images = spec.reference_images.len(),
            "Visual spec synthesized"
        );

        Ok(spec)
    }

    async fn synthesize_aspect(
        &self,
        aspect: Aspect,
        novel_text: &str,
        hint: &str,
    ) -> Result<String, CompletionError> {
        let model = match aspect {
            Aspect::Role => &self.models.role,
            Aspect::Style => &self.models.style,
        };

        let (from_text, from_hint) = tokio::try_join!(
            self.ask(model, aspect.from_text(novel_text)),
            self.ask(model, aspect.from_hint(hint)),
        )?;
        tracing::debug!(aspect = aspect.name(), "Merging independent analyses");

        self.ask(&self.models.merge, aspect.merge(&from_text, &from_hint))
            .await
    }

    async fn ask(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
        let request = CompletionRequest::new(model, messages, ANALYSIS_MAX_TOKENS);
        let answer = self.completion.complete(request).await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FakeCompletionClient;

    fn input() -> VisualSpecInput {
        VisualSpecInput {
            novel_text: "少年林舟背着长剑走进雨夜。".to_string(),
            role_hint: "林舟是蓝色眼睛".to_string(),
            style_hint: "水墨风".to_string(),
            role_images: vec!["uploads/visual/role.png".to_string()],
            style_images: vec![String::new()],
        }
    }

    /// 按请求内容返回可辨识的回答
    fn scripted() -> FakeCompletionClient {
        FakeCompletionClient::new(|request| {
            let user = &request.messages[1].content;
            let answer = if user.contains("请给出整合后的统一角色设定") {
                "MERGED ROLE"
            } else if user.contains("请给出整合后的统一画面风格设定") {
                "MERGED STYLE"
            } else if user.contains("【用户额外角色设定补充】") {
                "ROLE FROM HINT"
            } else if user.contains("【用户希望的画风") {
                "STYLE FROM HINT"
            } else if request.messages[0].content.contains("视觉设定分析助手") {
                "ROLE FROM TEXT"
            } else {
                "STYLE FROM TEXT"
            };
            Ok(format!("  {}\n", answer))
        })
    }

    #[tokio::test]
    async fn test_three_calls_per_aspect_and_merge() {
        let client = Arc::new(scripted());
        let synthesizer = VisualSpecSynthesizer::new(client.clone(), PromptModels::default());

        let spec = synthesizer.synthesize(&input()).await.unwrap();

        assert_eq!(spec.role_features, "MERGED ROLE");
        assert_eq!(spec.art_style, "MERGED STYLE");
        assert_eq!(spec.reference_images, vec!["uploads/visual/role.png"]);
        assert_eq!(client.call_count(), 6);

        let requests = client.requests();
        let role_merge = requests
            .iter()
            .find(|r| r.messages[1].content.contains("请给出整合后的统一角色设定"))
            .unwrap();
        assert!(role_merge.messages[1].content.contains("ROLE FROM TEXT"));
        assert!(role_merge.messages[1].content.contains("ROLE FROM HINT"));
        assert_eq!(role_merge.model, PromptModels::default().merge);
        assert!(requests.iter().all(|r| r.max_tokens == ANALYSIS_MAX_TOKENS));
    }

    #[tokio::test]
    async fn test_any_failure_aborts_synthesis() {
        let client = Arc::new(FakeCompletionClient::new(|request| {
            if request.messages[1].content.contains("【用户希望的画风") {
                Err(CompletionError::Upstream("HTTP 502".to_string()))
            } else {
                Ok("ok".to_string())
            }
        }));
        let synthesizer = VisualSpecSynthesizer::new(client, PromptModels::default());

        let err = synthesizer.synthesize(&input()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_novel_text_reaches_analysis() {
        let client = Arc::new(scripted());
        let synthesizer = VisualSpecSynthesizer::new(client.clone(), PromptModels::default());
        synthesizer.synthesize(&input()).await.unwrap();

        let with_novel = client
            .requests()
            .iter()
            .filter(|r| r.messages[1].content.contains("少年林舟背着长剑走进雨夜"))
            .count();
        assert_eq!(with_novel, 2);
    }
}

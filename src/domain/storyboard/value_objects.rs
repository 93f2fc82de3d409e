//! Storyboard Context - Value Objects

use serde::{Deserialize, Serialize};

/// 视觉规范 - 整批分镜共享的角色与画风一致性约束
///
/// 一次生成过程中只构建一次，所有场景 Prompt 引用同一份只读快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualSpec {
    /// 角色特征总结
    #[serde(default)]
    pub role_features: String,
    /// 画风特征总结
    #[serde(default)]
    pub art_style: String,
    /// 参考图 URL 或路径
    #[serde(default)]
    pub reference_images: Vec<String>,
    /// 预留，可为空
    #[serde(default)]
    pub prompt_tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl VisualSpec {
    /// 合并角色/画风描述与参考图，过滤空路径
    pub fn merge(
        role_features: impl Into<String>,
        art_style: impl Into<String>,
        role_images: &[String],
        style_images: &[String],
    ) -> Self {
        let reference_images = role_images
            .iter()
            .chain(style_images.iter())
            .map(|path| path.trim())
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            role_features: role_features.into(),
            art_style: art_style.into(),
            reference_images,
            prompt_tags: Vec::new(),
            notes: String::new(),
        }
    }
}

/// 单个场景的出图结果
///
/// 序列化时：单图为字符串，多图为数组，空字符串表示该场景生成失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneImage {
    Single(String),
    Multiple(Vec<String>),
}

impl SceneImage {
    /// 失败哨兵（空字符串）
    pub fn failed() -> Self {
        Self::Single(String::new())
    }

    pub fn from_urls(mut urls: Vec<String>) -> Self {
        urls.retain(|url| !url.is_empty());
        match urls.len() {
            0 => Self::failed(),
            1 => Self::Single(urls.remove(0)),
            _ => Self::Multiple(urls),
        }
    }

    pub fn is_failed(&self) -> bool {
        match self {
            Self::Single(url) => url.is_empty(),
            Self::Multiple(urls) => urls.is_empty(),
        }
    }

    pub fn urls(&self) -> Vec<&str> {
        match self {
            Self::Single(url) if url.is_empty() => Vec::new(),
            Self::Single(url) => vec![url.as_str()],
            Self::Multiple(urls) => urls.iter().map(String::as_str).collect(),
        }
    }

    pub fn first_url(&self) -> Option<&str> {
        self.urls().into_iter().next()
    }
}

impl Default for SceneImage {
    fn default() -> Self {
        Self::failed()
    }
}

/// 分镜生成结果
///
/// `images[i]` 与 `prompts[i]` 均对应输入的第 i 个场景
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryboardResult {
    pub images: Vec<SceneImage>,
    pub prompts: Vec<String>,
}

impl StoryboardResult {
    pub fn failed_count(&self) -> usize {
        self.images.iter().filter(|image| image.is_failed()).count()
    }
}

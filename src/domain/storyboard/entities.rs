//! Storyboard Context - Entities

use serde::{Deserialize, Serialize};

/// 无标题场景的占位前缀，完整占位为 `场景{n}`
pub const UNTITLED_SCENE_PREFIX: &str = "场景";

/// 无描述场景的占位文本
pub const EMPTY_DESCRIPTION: &str = "暂无描述";

/// 分镜场景 - 一个叙事节拍，对应一张分镜画面
///
/// 不变量:
/// - title 与 description 在规范化后永不为空
/// - id 缺失时取 1 起始的位置序号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl Scene {
    /// 创建规范化的场景
    ///
    /// `position` 为 1 起始的位置，用于生成默认 id 与占位标题
    pub fn new(
        position: usize,
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let id = id.into().trim().to_string();
        let title = title.into().trim().to_string();
        let description = description.into().trim().to_string();

        Self {
            id: if id.is_empty() { position.to_string() } else { id },
            title: if title.is_empty() {
                format!("{}{}", UNTITLED_SCENE_PREFIX, position)
            } else {
                title
            },
            description: if description.is_empty() {
                EMPTY_DESCRIPTION.to_string()
            } else {
                description
            },
            characters: None,
            setting: None,
            time: None,
            mood: None,
        }
    }

    pub fn with_characters(mut self, characters: Vec<String>) -> Self {
        self.characters = Some(characters);
        self
    }

    pub fn with_setting(mut self, setting: Option<String>) -> Self {
        self.setting = setting;
        self
    }

    pub fn with_time(mut self, time: Option<String>) -> Self {
        self.time = time;
        self
    }

    pub fn with_mood(mut self, mood: Option<String>) -> Self {
        self.mood = mood;
        self
    }
}

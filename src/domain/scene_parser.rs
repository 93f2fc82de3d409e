//! 场景解析器
//!
//! 把 LLM 的场景拆分结果规范化为有序的 Scene 序列
//!
//! 解析策略（按优先级）：
//! 1. 严格 JSON：数组，或带 `scenes` 数组的对象
//! 2. 编号文本：按 `1.` / `2、` 开头的行切块，首行为标题，其余为描述
//!
//! 解析永不失败：LLM 输出格式没有契约保证，最坏情况返回空序列

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::storyboard::Scene;

/// 新编号条目的行首：可选空白 + 数字 + 分隔标点
fn numbered_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\s*[.、．]").expect("numbered line regex"))
}

fn numbering_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\s*[.、．]\s*").expect("numbering prefix regex"))
}

/// 形如 `场景标题：` 的字段标签
fn field_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:场景标题|场景描述|标题|描述|title|description)\s*[:：]\s*")
            .expect("field label regex")
    })
}

/// 解析 LLM 输出为场景序列
pub fn parse_scenes(raw: &str) -> Vec<Scene> {
    let body = strip_code_fence(raw);

    if let Some(items) = json_scene_items(body) {
        return normalize_scenes(items);
    }

    parse_numbered_blocks(body)
}

/// 规范化 JSON 场景数组
///
/// 也用于 HTTP 请求中由调用方提交的场景列表
pub fn normalize_scenes(items: Vec<Value>) -> Vec<Scene> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| normalize_scene(i + 1, item))
        .collect()
}

/// 去掉 ```json ... ``` 包裹
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记（```json）
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

fn json_scene_items(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(items),
        Value::Object(mut obj) => match obj.remove("scenes") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn normalize_scene(position: usize, item: Value) -> Scene {
    let obj = match item {
        Value::Object(obj) => obj,
        // 非对象元素整体作为描述
        other => return Scene::new(position, "", "", value_text(&other)),
    };

    let id = ["id", "scene_id"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(scalar_id)
        .unwrap_or_default();
    let title = first_text(&obj, &["title", "场景标题"]).unwrap_or_default();
    let description = first_text(&obj, &["description", "场景描述"]).unwrap_or_default();

    let mut scene = Scene::new(position, id, title, description)
        .with_setting(first_text(&obj, &["setting"]))
        .with_time(first_text(&obj, &["time"]))
        .with_mood(first_text(&obj, &["mood"]));

    if let Some(Value::Array(characters)) = obj.get("characters") {
        let characters = characters
            .iter()
            .map(value_text)
            .filter(|name| !name.is_empty())
            .collect();
        scene = scene.with_characters(characters);
    }

    scene
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 第一个非空字段的文本
fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .map(value_text)
        .find(|text| !text.is_empty())
}

/// 字段值转文本；嵌套对象/数组序列化为 JSON 而不是丢弃
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn parse_numbered_blocks(text: &str) -> Vec<Scene> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        if blocks.is_empty() || numbered_line().is_match(line) {
            blocks.push(Vec::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    let mut scenes = Vec::new();
    for block in blocks {
        let joined = block.join("\n");
        let body = numbering_prefix().replace(joined.trim(), "");
        if body.trim().is_empty() {
            continue;
        }

        let mut lines = body.lines().map(strip_label);
        let title = lines.next().unwrap_or_default();
        let description = lines.collect::<Vec<_>>().join("\n");

        let position = scenes.len() + 1;
        scenes.push(Scene::new(position, "", title, description.trim()));
    }

    scenes
}

fn strip_label(line: &str) -> String {
    field_label().replace(line.trim(), "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storyboard::EMPTY_DESCRIPTION;

    #[test]
    fn test_json_array_assigns_positional_ids() {
        let raw = r#"[
            {"title": "Dawn", "description": "The gate opens."},
            {"id": "x", "title": "Duel", "description": "Blades cross."},
            {"description": "Night falls."}
        ]"#;
        let scenes = parse_scenes(raw);

        assert_eq!(scenes.len(), 3);
        assert_eq!(scenes[0].id, "1");
        assert_eq!(scenes[1].id, "x");
        assert_eq!(scenes[2].id, "3");
        assert_eq!(scenes[2].title, "场景3");
    }

    #[test]
    fn test_json_numeric_and_alternate_keys() {
        let raw = r#"[{"scene_id": 4, "场景标题": "雨夜", "场景描述": "街灯下的少年"}]"#;
        let scenes = parse_scenes(raw);

        assert_eq!(scenes[0].id, "4");
        assert_eq!(scenes[0].title, "雨夜");
        assert_eq!(scenes[0].description, "街灯下的少年");
    }

    #[test]
    fn test_nested_description_is_serialized() {
        let raw = r#"[{"title": "市集", "description": {"地点": "长安", "人物": ["阿离"]}}]"#;
        let scenes = parse_scenes(raw);

        let parsed: Value = serde_json::from_str(&scenes[0].description).unwrap();
        assert_eq!(parsed["地点"], "长安");
        assert_eq!(parsed["人物"][0], "阿离");
    }

    #[test]
    fn test_missing_description_gets_placeholder() {
        let scenes = parse_scenes(r#"[{"title": "空白"}]"#);
        assert_eq!(scenes[0].description, EMPTY_DESCRIPTION);
    }

    #[test]
    fn test_object_with_scenes_array_and_optional_fields() {
        let raw = r#"{"scenes": [{"scene_id": 1, "title": "初遇", "description": "桥上相遇",
            "characters": ["林舟", "沈月"], "setting": "石桥", "time": "黄昏", "mood": "温柔"}]}"#;
        let scenes = parse_scenes(raw);

        assert_eq!(scenes.len(), 1);
        assert_eq!(
            scenes[0].characters.as_deref(),
            Some(&["林舟".to_string(), "沈月".to_string()][..])
        );
        assert_eq!(scenes[0].setting.as_deref(), Some("石桥"));
        assert_eq!(scenes[0].time.as_deref(), Some("黄昏"));
        assert_eq!(scenes[0].mood.as_deref(), Some("温柔"));
    }

    #[test]
    fn test_code_fenced_json() {
        let raw = "```json\n[{\"title\": \"A\", \"description\": \"B\"}]\n```";
        let scenes = parse_scenes(raw);
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].title, "A");
    }

    #[test]
    fn test_numbered_text_fallback() {
        let raw = "1. 城门破晓\n守卫推开沉重的城门\n晨雾弥漫\n2、 决斗\n两人在广场对峙";
        let scenes = parse_scenes(raw);

        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].id, "1");
        assert_eq!(scenes[0].title, "城门破晓");
        assert_eq!(scenes[0].description, "守卫推开沉重的城门\n晨雾弥漫");
        assert_eq!(scenes[1].id, "2");
        assert_eq!(scenes[1].title, "决斗");
        assert_eq!(scenes[1].description, "两人在广场对峙");
    }

    #[test]
    fn test_numbered_text_strips_field_labels() {
        let raw = "1. 场景标题：雨夜\n场景描述：街灯下的少年\n2. 场景标题: 黎明\n场景描述: 鸡鸣";
        let scenes = parse_scenes(raw);

        assert_eq!(scenes[0].title, "雨夜");
        assert_eq!(scenes[0].description, "街灯下的少年");
        assert_eq!(scenes[1].title, "黎明");
        assert_eq!(scenes[1].description, "鸡鸣");
    }

    #[test]
    fn test_out_of_order_numbers_keep_text_order() {
        let raw = "3. 第三\n描述三\n1. 第一\n描述一\n3. 又一个第三\n描述";
        let scenes = parse_scenes(raw);

        let titles: Vec<_> = scenes.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["第三", "第一", "又一个第三"]);
        let ids: Vec<_> = scenes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_unstructured_text_becomes_single_scene() {
        let scenes = parse_scenes("只是一段没有编号的回答\n第二行");
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].title, "只是一段没有编号的回答");
        assert_eq!(scenes[0].description, "第二行");
    }

    #[test]
    fn test_empty_input_yields_no_scenes() {
        assert!(parse_scenes("").is_empty());
        assert!(parse_scenes("   \n  ").is_empty());
    }

    #[test]
    fn test_json_non_array_falls_back_to_text() {
        let scenes = parse_scenes(r#"{"title": "不是数组"}"#);
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].title, r#"{"title": "不是数组"}"#);
    }

    #[test]
    fn test_same_length_for_json_arrays() {
        for n in 0..8 {
            let items: Vec<Value> = (0..n)
                .map(|i| serde_json::json!({"description": format!("d{}", i)}))
                .collect();
            let raw = serde_json::to_string(&items).unwrap();
            let scenes = parse_scenes(&raw);
            assert_eq!(scenes.len(), n);
            for (i, scene) in scenes.iter().enumerate() {
                assert_eq!(scene.id, (i + 1).to_string());
            }
        }
    }
}

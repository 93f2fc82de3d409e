//! 分镜 Prompt 构建
//!
//! 纯函数，无 I/O：场景 + 视觉规范 + 统一风格锚 → 出图 Prompt

use super::storyboard::{Scene, VisualSpec};

/// 敏感词替换符
pub const REDACTION_GLYPH: &str = "＊";

/// 基础敏感词表，降低触发内容审核的概率（不保证不被拒绝）
pub const BANNED_TERMS: &[&str] = &[
    "血", "枪", "死亡", "裸", "杀", "暴力", "尸", "宗教", "战争", "性", "吻", "毒", "酒", "吸烟",
    "恐怖", "爆炸", "暗杀",
];

/// 统一风格锚
///
/// 每个场景独立调用出图模型，缺少该约束时各分镜画风会逐张漂移
pub const STYLE_ANCHOR: &str = "画风统一要求：保持相同的镜头语言、色调、光影与人物造型风格。\
所有分镜画面应属于同一作品世界观，不要在写实、动画、插画之间切换。\
建议维持为：电影感写实风格，带有柔和光影、自然色调。";

const FRAMING_CLAUSE: &str = "请生成单帧关键画面，中景/半身或全景由你判断最能叙事的构图，\
要求清晰、细节丰富、主体完整，不要裁掉主要角色的头部或脸。";

/// 替换敏感词
pub fn redact(text: &str) -> String {
    BANNED_TERMS
        .iter()
        .fold(text.to_string(), |acc, term| acc.replace(term, REDACTION_GLYPH))
}

/// 构建单个场景的出图 Prompt
///
/// 不截断描述，长度限制由出图服务负责
pub fn build_prompt(scene: &Scene, spec: &VisualSpec) -> String {
    let title = redact(&scene.title);
    let description = redact(&scene.description);
    let role_features = redact(&spec.role_features);
    let art_style = redact(&spec.art_style);

    format!(
        "分镜标题：{title}\n\
         分镜内容描述：{description}\n\n\
         角色设定（必须遵守）：{role_features}\n\n\
         画面风格（必须遵守）：{art_style}\n\n\
         {STYLE_ANCHOR}\n\n\
         {FRAMING_CLAUSE}"
    )
}

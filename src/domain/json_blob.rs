//! JSON 存储编码
//!
//! 项目中的场景、视觉规范、图片列表以 JSON 字符串形式保存

use serde::de::DeserializeOwned;
use serde::Serialize;

/// 序列化为 JSON 字符串（保留非 ASCII 字符原样）
pub fn safe_json_dumps<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// 解析 JSON 字符串，空串或格式错误返回 None
pub fn safe_json_loads<T: DeserializeOwned>(text: &str) -> Option<T> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding malformed JSON blob");
            None
        }
    }
}

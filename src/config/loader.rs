//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `STORYBOARD_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `STORYBOARD_SERVER__PORT=8080`
/// - `STORYBOARD_LLM__API_KEY=...`
/// - `STORYBOARD_IMAGE__API_KEY=...`
/// - `STORYBOARD_PIPELINE__MAX_CONCURRENT_SCENES=4`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default(
            "llm.api_url",
            "https://ark.cn-beijing.volces.com/api/v3/chat/completions",
        )?
        .set_default("llm.api_key", "")?
        .set_default("llm.timeout_secs", 300)?
        .set_default("image.api_key", "")?
        .set_default(
            "image.create_url",
            "https://dashscope.aliyuncs.com/api/v1/services/aigc/text2image/image-synthesis",
        )?
        .set_default("image.task_url", "https://dashscope.aliyuncs.com/api/v1/tasks")?
        .set_default("image.model", "wan2.2-t2i-plus")?
        .set_default("image.size", "1024*1024")?
        .set_default("image.n", 1)?
        .set_default("image.request_timeout_secs", 180)?
        .set_default("image.poll_interval_secs", 5)?
        .set_default("image.poll_timeout_secs", 300)?
        .set_default("pipeline.max_concurrent_scenes", 1)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: STORYBOARD_IMAGE__POLL_TIMEOUT_SECS=600
    builder = builder.add_source(
        Environment::with_prefix("STORYBOARD")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let invalid = |msg: &str| -> Result<(), ConfigError> {
        Err(ConfigError::ValidationError(msg.to_string()))
    };

    if config.server.port == 0 {
        return invalid("Server port cannot be 0");
    }

    if config.llm.api_url.trim().is_empty() {
        return invalid("LLM api_url cannot be empty");
    }

    if config.image.create_url.trim().is_empty() || config.image.task_url.trim().is_empty() {
        return invalid("Image create_url and task_url cannot be empty");
    }

    if config.image.poll_interval_secs == 0 {
        return invalid("Image poll interval cannot be 0");
    }

    if config.image.poll_timeout_secs < config.image.poll_interval_secs {
        return invalid("Image poll timeout must not be shorter than the poll interval");
    }

    if config.image.n == 0 {
        return invalid("Image count per task must be at least 1");
    }

    if config.pipeline.max_concurrent_scenes == 0 {
        return invalid("max_concurrent_scenes must be at least 1");
    }

    Ok(())
}

/// 密钥只显示前 4 位
fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "<unset>".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    let models = config.llm.models.prompt_models();

    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("LLM URL: {}", config.llm.api_url);
    tracing::info!("LLM API Key: {}", mask_secret(&config.llm.api_key));
    tracing::info!("LLM Timeout: {}s", config.llm.timeout_secs);
    tracing::info!("Models: {:?}", models);
    tracing::info!("Image Create URL: {}", config.image.create_url);
    tracing::info!("Image Task URL: {}", config.image.task_url);
    tracing::info!("Image API Key: {}", mask_secret(&config.image.api_key));
    tracing::info!(
        "Image Model: {} ({}, n={})",
        config.image.model,
        config.image.size,
        config.image.n
    );
    tracing::info!(
        "Image Polling: every {}s, timeout {}s",
        config.image.poll_interval_secs,
        config.image.poll_timeout_secs
    );
    tracing::info!(
        "Max Concurrent Scenes: {}",
        config.pipeline.max_concurrent_scenes
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_urls() {
        let mut config = AppConfig::default();
        config.llm.api_url = String::new();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.image.task_url = " ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_polling() {
        let mut config = AppConfig::default();
        config.image.poll_interval_secs = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.image.poll_interval_secs = 10;
        config.image.poll_timeout_secs = 5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_counts() {
        let mut config = AppConfig::default();
        config.image.n = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.pipeline.max_concurrent_scenes = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "<unset>");
        assert_eq!(mask_secret("sk-abcdef"), "sk-a****");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[llm]
api_key = "ark-key"

[llm.models]
rewrite = "custom-rewrite"

[image]
poll_interval_secs = 2
poll_timeout_secs = 20

[pipeline]
max_concurrent_scenes = 3
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.api_key, "ark-key");
        assert_eq!(config.llm.models.prompt_models().rewrite, "custom-rewrite");
        assert_eq!(config.image.poll_timeout_secs, 20);
        assert_eq!(config.image.model, "wan2.2-t2i-plus");
        assert_eq!(config.pipeline.max_concurrent_scenes, 3);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[image]\npoll_interval_secs = 0").unwrap();

        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}

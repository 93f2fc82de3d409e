//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::services::{ImageGeneratorConfig, PromptModels};
use crate::infrastructure::adapters::{DashScopeImageClientConfig, HttpCompletionClientConfig};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 对话补全模型配置
    #[serde(default)]
    pub llm: LlmConfig,

    /// 文生图服务配置
    #[serde(default)]
    pub image: ImageConfig,

    /// 分镜流水线配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 对话补全配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// 各环节使用的模型
    #[serde(default)]
    pub models: ModelsConfig,
}

fn default_llm_api_url() -> String {
    "https://ark.cn-beijing.volces.com/api/v3/chat/completions".to_string()
}

fn default_llm_timeout() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_llm_api_url(),
            api_key: String::new(),
            timeout_secs: default_llm_timeout(),
            models: ModelsConfig::default(),
        }
    }
}

impl LlmConfig {
    pub fn client_config(&self) -> HttpCompletionClientConfig {
        HttpCompletionClientConfig::new(&self.api_url, &self.api_key).with_timeout(self.timeout_secs)
    }
}

/// 模型名配置，未配置的环节使用内置默认模型
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsConfig {
    pub scene: Option<String>,
    pub role: Option<String>,
    pub style: Option<String>,
    pub merge: Option<String>,
    pub rewrite: Option<String>,
    pub polish: Option<String>,
}

impl ModelsConfig {
    pub fn prompt_models(&self) -> PromptModels {
        let defaults = PromptModels::default();
        let pick = |configured: &Option<String>, fallback: String| {
            configured
                .as_ref()
                .filter(|m| !m.trim().is_empty())
                .cloned()
                .unwrap_or(fallback)
        };

        PromptModels {
            scene: pick(&self.scene, defaults.scene),
            role: pick(&self.role, defaults.role),
            style: pick(&self.style, defaults.style),
            merge: pick(&self.merge, defaults.merge),
            rewrite: pick(&self.rewrite, defaults.rewrite),
            polish: pick(&self.polish, defaults.polish),
        }
    }
}

/// 文生图配置
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_create_url")]
    pub create_url: String,

    #[serde(default = "default_task_url")]
    pub task_url: String,

    #[serde(default = "default_image_model")]
    pub model: String,

    /// 形如 `1024*1024`
    #[serde(default = "default_image_size")]
    pub size: String,

    /// 每个任务生成的图片数
    #[serde(default = "default_image_n")]
    pub n: u32,

    /// 单次 HTTP 请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// 轮询间隔（秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// 单个任务的轮询超时（秒）
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

fn default_create_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text2image/image-synthesis".to_string()
}

fn default_task_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/tasks".to_string()
}

fn default_image_model() -> String {
    "wan2.2-t2i-plus".to_string()
}

fn default_image_size() -> String {
    "1024*1024".to_string()
}

fn default_image_n() -> u32 {
    1
}

fn default_request_timeout() -> u64 {
    180
}

fn default_poll_interval() -> u64 {
    5
}

fn default_poll_timeout() -> u64 {
    300
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            create_url: default_create_url(),
            task_url: default_task_url(),
            model: default_image_model(),
            size: default_image_size(),
            n: default_image_n(),
            request_timeout_secs: default_request_timeout(),
            poll_interval_secs: default_poll_interval(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

impl ImageConfig {
    pub fn client_config(&self) -> DashScopeImageClientConfig {
        DashScopeImageClientConfig {
            api_key: self.api_key.clone(),
            create_url: self.create_url.clone(),
            task_url: self.task_url.clone(),
            model: self.model.clone(),
            size: self.size.clone(),
            n: self.n,
            request_timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn generator_config(&self) -> ImageGeneratorConfig {
        ImageGeneratorConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            poll_timeout: Duration::from_secs(self.poll_timeout_secs),
        }
    }
}

/// 分镜流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 同时生成的场景数，1 为严格串行
    #[serde(default = "default_max_concurrent_scenes")]
    pub max_concurrent_scenes: usize,
}

fn default_max_concurrent_scenes() -> usize {
    1
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_scenes: default_max_concurrent_scenes(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

//! Storyboard - 小说转分镜图服务

use std::sync::Arc;

use storyboard::config::{load_config, print_config, AppConfig};
use storyboard::infrastructure::adapters::{DashScopeImageClient, HttpCompletionClient};
use storyboard::infrastructure::http::{AppState, HttpServer, PipelineSettings, ServerConfig};
use storyboard::infrastructure::memory::InMemoryProjectRepository;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},storyboard={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Storyboard - 小说转分镜图服务");
    print_config(&config);

    if config.llm.api_key.is_empty() || config.image.api_key.is_empty() {
        tracing::warn!("LLM or image API key is not configured, upstream calls will be rejected");
    }

    // 外部服务适配器
    let completion = Arc::new(HttpCompletionClient::new(config.llm.client_config())?);
    let images = Arc::new(DashScopeImageClient::new(config.image.client_config())?);

    // 项目存储
    let project_repo = InMemoryProjectRepository::new().arc();

    let settings = PipelineSettings {
        models: config.llm.models.prompt_models(),
        image: config.image.generator_config(),
        max_concurrent_scenes: config.pipeline.max_concurrent_scenes,
    };
    let state = AppState::new(completion, images, project_repo, settings);

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

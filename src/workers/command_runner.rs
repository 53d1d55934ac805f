use std::sync::Arc;

use crate::config::config_manager::ConfigManager;
use crate::config::constants::GEMINI_API_KEY_ENV;
use crate::enums::commands::Commands;
use crate::errors::AnalyzerResult;
use crate::services::ai_providers::gemini::GeminiProvider;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::services::scan_server::ScanServerLauncher;
use crate::services::security_analyzer::SecurityAnalyzer;
use crate::traits::reasoning_backend::ReasoningBackend;
use crate::traits::tool_server::ToolServerLauncher;
use crate::ui::api_server::ApiServer;
use crate::ui::diagnostics;

pub struct CommandRunner;

impl CommandRunner {
    pub async fn run_command(command: Commands) -> AnalyzerResult<()> {
        match command {
            Commands::Serve { port, host } => Self::serve_command(port, host).await,
            Commands::Check => Self::check_command().await,
        }
    }

    async fn serve_command(port: Option<u16>, host: Option<String>) -> AnalyzerResult<()> {
        let mut config = ConfigManager::load()?;
        if let Some(port) = port {
            config.server.port = port;
        }
        if let Some(host) = host {
            config.server.host = host;
        }

        if config.backend.api_key.is_none() {
            log::warn!(
                "⚠️ {} is not set; analysis requests will be rejected until it is",
                GEMINI_API_KEY_ENV
            );
        }

        let backend: Arc<dyn ReasoningBackend> = Arc::new(GeminiProvider::new(
            config.backend.clone(),
            Arc::new(ApiRateLimiter::new()),
        ));
        let launcher: Arc<dyn ToolServerLauncher> =
            Arc::new(ScanServerLauncher::new(config.scan_server.clone()));
        let analyzer = Arc::new(SecurityAnalyzer::new(config.clone(), backend, launcher));

        ApiServer::new(analyzer, config).run().await
    }

    async fn check_command() -> AnalyzerResult<()> {
        let config = ConfigManager::load()?;

        if config.backend.api_key.is_some() {
            log::info!("✅ Backend credential is configured");
        } else {
            log::error!("❌ {} is not set", GEMINI_API_KEY_ENV);
        }
        log::info!("📦 Backend model: {}", config.backend.model);

        let scanner = diagnostics::scanner_probe(&config.scan_server).await;
        log::info!("🔧 Scanner check: {}", scanner);

        let network = diagnostics::network_probe().await;
        log::info!("🌐 Vendor API check: {}", network);

        Ok(())
    }
}

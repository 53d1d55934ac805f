use std::env;
use std::fs;
use std::path::Path;

use crate::config::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENVIRONMENT_ENV, GEMINI_API_KEY_ENV, GEMINI_MODEL_ENV,
    PORT_ENV, SCAN_SERVER_COMMAND_ENV,
};
use crate::enums::environment::Environment;
use crate::errors::{AnalyzerError, AnalyzerResult};
use crate::structs::config::app_config::AppConfig;

pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration: optional `~/.seclyzer/config.toml`, then
    /// environment overrides on top.
    pub fn load() -> AnalyzerResult<AppConfig> {
        let mut config = match dirs::home_dir() {
            Some(home) => {
                let path = home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
                if path.exists() {
                    log::info!("📋 Loading config from: {}", path.display());
                    Self::load_from(&path)?
                } else {
                    AppConfig::default()
                }
            }
            None => AppConfig::default(),
        };

        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> AnalyzerResult<AppConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::config_error(
                &format!("cannot read config file {}: {}", path.display(), e),
                None,
            )
        })?;
        toml::from_str(&content).map_err(|e| {
            AnalyzerError::config_error(
                &format!("invalid config file {}: {}", path.display(), e.message()),
                None,
            )
        })
    }

    fn apply_env_overrides(config: &mut AppConfig) {
        if let Ok(key) = env::var(GEMINI_API_KEY_ENV) {
            if !key.is_empty() {
                config.backend.api_key = Some(key);
            }
        }
        if let Ok(model) = env::var(GEMINI_MODEL_ENV) {
            if !model.is_empty() {
                config.backend.model = model;
            }
        }
        if let Ok(port) = env::var(PORT_ENV) {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(environment) = env::var(ENVIRONMENT_ENV) {
            config.server.environment = Environment::from_name(&environment);
        }
        if let Ok(command) = env::var(SCAN_SERVER_COMMAND_ENV) {
            let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
            if !parts.is_empty() {
                config.scan_server.command = parts;
            }
        }
    }
}

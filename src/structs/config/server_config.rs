use serde::Deserialize;

use crate::config::constants::{DEFAULT_API_HOST, DEFAULT_API_PORT};
use crate::enums::environment::Environment;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_API_HOST.to_string(),
            port: DEFAULT_API_PORT,
            environment: Environment::default(),
        }
    }
}

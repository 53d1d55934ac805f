use serde::Deserialize;

use crate::structs::config::backend_config::BackendConfig;
use crate::structs::config::scan_server_config::ScanServerConfig;
use crate::structs::config::server_config::ServerConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub scan_server: ScanServerConfig,
}

use std::time::Duration;

use serde::Deserialize;

use crate::config::constants::{
    timeout_duration_secs, DEFAULT_SCAN_CALL_TIMEOUT_SECS, DEFAULT_SCAN_SERVER_COMMAND,
    DEFAULT_SCAN_STARTUP_TIMEOUT_SECS,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanServerConfig {
    /// Program plus arguments launching the MCP scan server over stdio.
    pub command: Vec<String>,
    pub startup_timeout_secs: u64,
    pub call_timeout_secs: u64,
}

impl ScanServerConfig {
    pub fn startup_timeout(&self) -> Duration {
        timeout_duration_secs(self.startup_timeout_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        timeout_duration_secs(self.call_timeout_secs)
    }
}

impl Default for ScanServerConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_SCAN_SERVER_COMMAND
                .iter()
                .map(|s| s.to_string())
                .collect(),
            startup_timeout_secs: DEFAULT_SCAN_STARTUP_TIMEOUT_SECS,
            call_timeout_secs: DEFAULT_SCAN_CALL_TIMEOUT_SECS,
        }
    }
}

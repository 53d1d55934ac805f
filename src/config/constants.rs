use std::time::Duration;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";
pub const PORT_ENV: &str = "PORT";
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";
pub const SCAN_SERVER_COMMAND_ENV: &str = "SCAN_SERVER_COMMAND";

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_API_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8000;
pub const MAX_REQUEST_BODY_BYTES: u64 = 1024 * 1024;

pub const DEFAULT_SCAN_SERVER_COMMAND: &[&str] = &["uvx", "semgrep-mcp"];
pub const SCANNER_VENDOR_API_URL: &str = "https://semgrep.dev/api/v1/";

pub const MAX_CODE_LENGTH: usize = 200_000;
pub const SMALL_CODE_THRESHOLD: usize = 500;
pub const MEDIUM_CODE_THRESHOLD: usize = 5_000;

pub const BACKEND_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SCAN_STARTUP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SCAN_CALL_TIMEOUT_SECS: u64 = 60;
pub const NETWORK_TEST_TIMEOUT_SECS: u64 = 10;
pub const SCANNER_TEST_TIMEOUT_SECS: u64 = 30;

pub const MAX_TOOL_TURNS: usize = 8;
pub const OUTGOING_CHANNEL_CAPACITY: usize = 128;

pub const JSONRPC_VERSION: &str = "2.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

pub const AGENT_NAME: &str = "Security Researcher";

pub const CONFIG_DIR_NAME: &str = ".seclyzer";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub fn timeout_duration_secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}

use async_trait::async_trait;
use serde_json::Value;

use crate::enums::scan_server_error::ScanServerError;
use crate::structs::mcp::tool_info::ToolInfo;

/// A live connection to the external static-analysis tool, owned by exactly
/// one in-flight request. `shutdown` must be called before the owning
/// request completes; dropping the handle also tears the process down, so
/// cancellation cannot leak it.
#[async_trait]
pub trait ToolServer: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolInfo>, ScanServerError>;

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ScanServerError>;

    async fn shutdown(&self) -> Result<(), ScanServerError>;
}

#[async_trait]
pub trait ToolServerLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn ToolServer>, ScanServerError>;
}

use serde::Deserialize;
use serde_json::Value;

use crate::structs::mcp::rpc_error::RpcError;

/// A reply frame from the scan server. Notifications carry no `id` and are
/// not routable to a pending request.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

//! Stdio client for the external MCP static-analysis server.
//!
//! One server process is spawned per analysis request, handshaken, used for
//! the duration of that request, and torn down before the request completes.
//! `kill_on_drop` keeps a cancelled request from leaking the child.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time;

use crate::config::constants::{
    JSONRPC_VERSION, MCP_PROTOCOL_VERSION, OUTGOING_CHANNEL_CAPACITY,
};
use crate::enums::scan_server_error::ScanServerError;
use crate::structs::config::scan_server_config::ScanServerConfig;
use crate::structs::mcp::rpc_notification::RpcNotification;
use crate::structs::mcp::rpc_request::RpcRequest;
use crate::structs::mcp::rpc_response::RpcResponse;
use crate::structs::mcp::tool_info::ToolInfo;
use crate::traits::tool_server::{ToolServer, ToolServerLauncher};

type PendingMap = Arc<Mutex<HashMap<i64, oneshot::Sender<RpcResponse>>>>;

pub struct ScanServer {
    child: Mutex<Option<Child>>,
    outgoing_tx: mpsc::Sender<String>,
    pending: PendingMap,
    id_counter: AtomicI64,
    call_timeout: Duration,
}

impl ScanServer {
    pub async fn spawn(config: &ScanServerConfig) -> Result<Self, ScanServerError> {
        let (program, args) = config
            .command
            .split_first()
            .ok_or_else(|| ScanServerError::Spawn("scan server command is empty".to_string()))?;

        log::info!("🔌 Starting scan server: {}", config.command.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScanServerError::Spawn(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ScanServerError::Spawn("failed to capture child stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ScanServerError::Spawn("failed to capture child stdout".to_string()))?;

        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<String>(OUTGOING_CHANNEL_CAPACITY);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let mut writer = stdin;
        tokio::spawn(async move {
            while let Some(line) = outgoing_rx.recv().await {
                if writer.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
                if writer.write_all(b"\n").await.is_err() {
                    break;
                }
                if writer.flush().await.is_err() {
                    break;
                }
            }
        });

        let reader_pending = Arc::clone(&pending);
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let response: RpcResponse = match serde_json::from_str(&line) {
                    Ok(response) => response,
                    // Notifications and any non-frame noise are not routable.
                    Err(_) => continue,
                };
                let Some(id) = response.id else { continue };
                if let Some(tx) = reader_pending.lock().await.remove(&id) {
                    let _ = tx.send(response);
                }
            }
        });

        let server = Self {
            child: Mutex::new(Some(child)),
            outgoing_tx,
            pending,
            id_counter: AtomicI64::new(1),
            call_timeout: config.call_timeout(),
        };

        // A handshake failure drops `server`, which kills the half-started
        // child; no handle ever leaks out of here.
        server.initialize(config.startup_timeout()).await?;
        Ok(server)
    }

    async fn initialize(&self, timeout: Duration) -> Result<(), ScanServerError> {
        let params = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "seclyzer",
                "version": env!("CARGO_PKG_VERSION"),
            },
        });
        self.request("initialize", Some(params), timeout).await?;
        self.notify("notifications/initialized", None).await?;
        Ok(())
    }

    async fn request(
        &self,
        method: &str,
        params: Option<Value>,
        timeout: Duration,
    ) -> Result<Value, ScanServerError> {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let frame = RpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params,
        };
        let line =
            serde_json::to_string(&frame).map_err(|e| ScanServerError::Transport(e.to_string()))?;

        // Register before sending so an immediate reply cannot be lost.
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        if self.outgoing_tx.send(line).await.is_err() {
            self.pending.lock().await.remove(&id);
            return Err(ScanServerError::Transport(
                "writer task is gone".to_string(),
            ));
        }

        let response = match time::timeout(timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                self.pending.lock().await.remove(&id);
                return Err(ScanServerError::Transport(
                    "scan server closed the connection".to_string(),
                ));
            }
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(ScanServerError::Timeout {
                    method: method.to_string(),
                });
            }
        };

        if let Some(error) = response.error {
            return Err(ScanServerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), ScanServerError> {
        let frame = RpcNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        };
        let line =
            serde_json::to_string(&frame).map_err(|e| ScanServerError::Transport(e.to_string()))?;
        self.outgoing_tx
            .send(line)
            .await
            .map_err(|_| ScanServerError::Transport("writer task is gone".to_string()))
    }
}

#[async_trait]
impl ToolServer for ScanServer {
    async fn list_tools(&self) -> Result<Vec<ToolInfo>, ScanServerError> {
        let result = self.request("tools/list", None, self.call_timeout).await?;
        let tools = result.get("tools").cloned().unwrap_or(Value::Null);
        serde_json::from_value(tools)
            .map_err(|e| ScanServerError::Transport(format!("malformed tools/list result: {}", e)))
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ScanServerError> {
        let params = json!({ "name": name, "arguments": arguments });
        self.request("tools/call", Some(params), self.call_timeout)
            .await
    }

    async fn shutdown(&self) -> Result<(), ScanServerError> {
        let Some(mut child) = self.child.lock().await.take() else {
            return Ok(());
        };
        // start_kill errors when the process already exited; either way we
        // reap it so nothing is left behind.
        let _ = child.start_kill();
        let _ = child.wait().await;
        log::debug!("🔌 Scan server stopped");
        Ok(())
    }
}

pub struct ScanServerLauncher {
    config: ScanServerConfig,
}

impl ScanServerLauncher {
    pub fn new(config: ScanServerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ToolServerLauncher for ScanServerLauncher {
    async fn launch(&self) -> Result<Box<dyn ToolServer>, ScanServerError> {
        let server = ScanServer::spawn(&self.config).await?;
        Ok(Box::new(server))
    }
}

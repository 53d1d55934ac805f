use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanServerError {
    #[error("failed to spawn scan server: {0}")]
    Spawn(String),
    #[error("scan server transport error: {0}")]
    Transport(String),
    #[error("scan server request '{method}' timed out")]
    Timeout { method: String },
    #[error("scan server returned JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

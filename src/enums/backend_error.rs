use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum BackendApiError {
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Network Error: {0}")]
    Network(String),
    #[error("Serialization Error: {0}")]
    Serialization(String),
    #[error("Authentication Error: {0}")]
    Authentication(String),
}

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::backend_error::BackendApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalyzerError {
    // Request errors
    InvalidInput {
        reason: String,
    },

    // Configuration errors
    ConfigurationError {
        message: String,
        field: Option<String>,
    },

    // Scan server errors
    ToolAcquisitionError {
        stage: String,
        reason: String,
    },

    // Backend errors
    BackendInvocationError {
        operation: String,
        status_code: Option<u16>,
        reason: String,
    },

    // Structured output errors
    OutputValidationError {
        field: Option<String>,
        reason: String,
    },
}

impl AnalyzerError {
    pub fn invalid_input(reason: &str) -> Self {
        Self::InvalidInput {
            reason: reason.to_string(),
        }
    }

    pub fn config_error(message: &str, field: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.map(|s| s.to_string()),
        }
    }

    pub fn tool_error(stage: &str, reason: &str) -> Self {
        Self::ToolAcquisitionError {
            stage: stage.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn backend_error(operation: &str, status_code: Option<u16>, reason: &str) -> Self {
        Self::BackendInvocationError {
            operation: operation.to_string(),
            status_code,
            reason: reason.to_string(),
        }
    }

    pub fn validation_error(field: Option<&str>, reason: &str) -> Self {
        Self::OutputValidationError {
            field: field.map(|s| s.to_string()),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "InvalidInput",
            Self::ConfigurationError { .. } => "ConfigurationError",
            Self::ToolAcquisitionError { .. } => "ToolAcquisitionError",
            Self::BackendInvocationError { .. } => "BackendInvocationError",
            Self::OutputValidationError { .. } => "OutputValidationError",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { reason } => reason.clone(),
            Self::ConfigurationError { message, field } => {
                let mut msg = message.clone();
                if let Some(field) = field {
                    msg.push_str(&format!(" (setting: {})", field));
                }
                msg
            }
            Self::ToolAcquisitionError { stage, reason } => {
                format!("Scan server unavailable during {}: {}", stage, reason)
            }
            Self::BackendInvocationError { operation, status_code, reason } => {
                let mut msg = format!("Backend call '{}' failed: {}", operation, reason);
                if let Some(code) = status_code {
                    msg.push_str(&format!(" (Status: {})", code));
                }
                msg
            }
            Self::OutputValidationError { field, reason } => {
                let mut msg = format!("Backend reply failed validation: {}", reason);
                if let Some(field) = field {
                    msg.push_str(&format!(" (field: {})", field));
                }
                msg
            }
        }
    }

    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }

    /// HTTP status for every kind. The mapping is total: invalid input is the
    /// caller's mistake, everything else is ours.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::ConfigurationError { .. }
            | Self::ToolAcquisitionError { .. }
            | Self::BackendInvocationError { .. }
            | Self::OutputValidationError { .. } => 500,
        }
    }

    /// Client-visible failure text. Internal distinctions stay in logs; the
    /// caller sees one uniform message carrying the original error text.
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidInput { reason } => reason.clone(),
            _ => format!("Analysis failed: {}", self.user_message()),
        }
    }
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl StdError for AnalyzerError {}

/// Result type alias for seclyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

impl From<BackendApiError> for AnalyzerError {
    fn from(error: BackendApiError) -> Self {
        let status_code = match &error {
            BackendApiError::Api { status, .. } => Some(*status),
            BackendApiError::Authentication(_) => Some(401),
            _ => None,
        };
        AnalyzerError::BackendInvocationError {
            operation: "generateContent".to_string(),
            status_code,
            reason: error.to_string(),
        }
    }
}

/// Error handler for consistent failure logging
pub struct ErrorHandler;

impl ErrorHandler {
    /// Log the full internal failure detail, independent of what the caller
    /// gets back.
    pub fn log_failure(request_id: &Uuid, error: &AnalyzerError) {
        log::error!(
            "❌ [{}] {}: {}",
            request_id,
            error.kind(),
            error.technical_details()
        );
    }
}

use serde::{Deserialize, Serialize};

use crate::enums::severity::Severity;

/// One identified vulnerability. Every field is mandatory; the backend must
/// supply each of them, there are no serde defaults here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIssue {
    pub title: String,
    pub description: String,
    pub code: String,
    pub fix: String,
    pub cvss_score: f64,
    pub severity: Severity,
}

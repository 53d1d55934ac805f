use serde::{Deserialize, Serialize};

use crate::structs::security_issue::SecurityIssue;

/// The structured analysis result. Issue order is the backend's emission
/// order; the list may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityReport {
    pub summary: String,
    pub issues: Vec<SecurityIssue>,
}

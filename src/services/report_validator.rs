use crate::errors::{AnalyzerError, AnalyzerResult};
use crate::structs::security_report::SecurityReport;

/// Strict validation of the backend's final reply into a [`SecurityReport`].
///
/// The backend is the producer of truth: missing fields, unknown severity
/// values and out-of-range scores are hard failures. Nothing is repaired,
/// coerced or default-filled.
pub fn validate_report(raw: &str) -> AnalyzerResult<SecurityReport> {
    let payload = strip_code_fence(raw.trim());

    let report: SecurityReport = serde_json::from_str(payload).map_err(|e| {
        AnalyzerError::validation_error(
            None,
            &format!("reply is not a valid security report: {}", e),
        )
    })?;

    for (index, issue) in report.issues.iter().enumerate() {
        if !(0.0..=10.0).contains(&issue.cvss_score) {
            return Err(AnalyzerError::validation_error(
                Some("cvss_score"),
                &format!(
                    "issue {} has cvss_score {} outside the range 0.0 to 10.0",
                    index, issue.cvss_score
                ),
            ));
        }
    }

    Ok(report)
}

// Some models fence their JSON despite instructions. Unfencing is transport
// cleanup, not repair: the payload itself is still parsed strictly.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => rest,
    }
}

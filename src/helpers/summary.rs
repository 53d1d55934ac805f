use crate::config::constants::{MEDIUM_CODE_THRESHOLD, SMALL_CODE_THRESHOLD};

/// Appends a length-derived scope qualifier to the backend's summary.
/// Deterministic and side-effect-free; the issues list is never touched
/// here.
pub fn enrich_summary(code_len: usize, raw_summary: &str) -> String {
    let scale = if code_len <= SMALL_CODE_THRESHOLD {
        "a small snippet"
    } else if code_len <= MEDIUM_CODE_THRESHOLD {
        "a medium-sized sample"
    } else {
        "a large code sample"
    };

    format!(
        "{}\n\nScope: analyzed {} ({} characters of source).",
        raw_summary.trim_end(),
        scale,
        code_len
    )
}

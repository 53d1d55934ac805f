/// Turns raw source code into the analysis prompt. The code is opaque data
/// for the backend: concatenated unmodified and unescaped, never executed.
pub fn build_analysis_prompt(code: &str) -> String {
    format!(
        "Analyze the following source code for security vulnerabilities. \
         Scan it with the attached static-analysis tools before writing your report.\n\n{}",
        code
    )
}

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<i32>,
}

impl GeminiGenerationConfig {
    /// Low-temperature settings for reproducible analysis output.
    pub fn analysis_defaults() -> Self {
        Self {
            temperature: Some(0.2),
            top_p: Some(0.95),
            top_k: Some(40),
            max_output_tokens: Some(8192),
            candidate_count: Some(1),
        }
    }
}

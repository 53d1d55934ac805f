use serde::{Deserialize, Serialize};

use crate::structs::ai::gemini::gemini_part::GeminiPart;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user(text: String) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart::text(text)],
        }
    }
}

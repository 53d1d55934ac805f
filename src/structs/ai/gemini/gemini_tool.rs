use serde::Serialize;

use crate::structs::ai::gemini::gemini_function_declaration::GeminiFunctionDeclaration;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    pub function_declarations: Vec<GeminiFunctionDeclaration>,
}

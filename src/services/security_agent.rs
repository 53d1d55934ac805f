use serde_json::Value;

use crate::config::constants::{AGENT_NAME, MAX_TOOL_TURNS};
use crate::errors::{AnalyzerError, AnalyzerResult};
use crate::prompts::security_researcher_prompt::SECURITY_RESEARCHER_INSTRUCTIONS;
use crate::structs::ai::gemini::gemini_content::GeminiContent;
use crate::structs::ai::gemini::gemini_function_call::GeminiFunctionCall;
use crate::structs::ai::gemini::gemini_function_declaration::GeminiFunctionDeclaration;
use crate::structs::ai::gemini::gemini_function_response::GeminiFunctionResponse;
use crate::structs::ai::gemini::gemini_generation_config::GeminiGenerationConfig;
use crate::structs::ai::gemini::gemini_part::GeminiPart;
use crate::structs::ai::gemini::gemini_request::GeminiRequest;
use crate::structs::ai::gemini::gemini_tool::GeminiTool;
use crate::structs::mcp::tool_info::ToolInfo;
use crate::traits::reasoning_backend::ReasoningBackend;
use crate::traits::tool_server::ToolServer;

/// One bound analysis agent: fixed instructions and model, plus the tool
/// declarations of the scan server attached for this request. The
/// tool-augmented turns it runs internally are invisible to the caller,
/// which sees a single invocation producing the final reply text.
pub struct SecurityAgent<'a> {
    name: &'static str,
    instructions: &'static str,
    backend: &'a dyn ReasoningBackend,
    tool_server: &'a dyn ToolServer,
    tools: Vec<GeminiTool>,
}

impl<'a> SecurityAgent<'a> {
    pub async fn bind(
        backend: &'a dyn ReasoningBackend,
        tool_server: &'a dyn ToolServer,
    ) -> AnalyzerResult<SecurityAgent<'a>> {
        let available = tool_server
            .list_tools()
            .await
            .map_err(|e| AnalyzerError::tool_error("tools/list", &e.to_string()))?;

        Ok(Self {
            name: AGENT_NAME,
            instructions: SECURITY_RESEARCHER_INSTRUCTIONS,
            backend,
            tool_server,
            tools: Self::declarations_from(&available),
        })
    }

    fn declarations_from(tools: &[ToolInfo]) -> Vec<GeminiTool> {
        if tools.is_empty() {
            return Vec::new();
        }
        let function_declarations = tools
            .iter()
            .map(|tool| GeminiFunctionDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            })
            .collect();
        vec![GeminiTool {
            function_declarations,
        }]
    }

    pub async fn run(&self, prompt: String) -> AnalyzerResult<String> {
        let mut contents = vec![
            GeminiContent::user(self.instructions.to_string()),
            GeminiContent::user(prompt),
        ];

        for _turn in 0..MAX_TOOL_TURNS {
            let request = GeminiRequest {
                contents: contents.clone(),
                tools: if self.tools.is_empty() {
                    None
                } else {
                    Some(self.tools.clone())
                },
                generation_config: Some(GeminiGenerationConfig::analysis_defaults()),
            };

            let reply = self.backend.generate(request).await?;

            let calls: Vec<GeminiFunctionCall> = reply
                .parts
                .iter()
                .filter_map(|part| part.function_call.clone())
                .collect();
            let text: String = reply
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("");

            contents.push(reply);

            if calls.is_empty() {
                if text.trim().is_empty() {
                    return Err(AnalyzerError::backend_error(
                        "generateContent",
                        None,
                        "backend returned an empty reply",
                    ));
                }
                return Ok(text);
            }

            let mut response_parts = Vec::with_capacity(calls.len());
            for call in calls {
                log::info!("🔧 [{}] tool call: {}", self.name, call.name);
                let result = self
                    .tool_server
                    .call_tool(&call.name, call.args.clone())
                    .await
                    .map_err(|e| {
                        AnalyzerError::backend_error(
                            &format!("tools/call {}", call.name),
                            None,
                            &e.to_string(),
                        )
                    })?;
                response_parts.push(GeminiPart::function_response(GeminiFunctionResponse {
                    name: call.name,
                    response: wrap_tool_result(result),
                }));
            }
            contents.push(GeminiContent {
                role: "user".to_string(),
                parts: response_parts,
            });
        }

        Err(AnalyzerError::backend_error(
            "generateContent",
            None,
            "tool turn limit exceeded without a final reply",
        ))
    }
}

// Gemini requires functionResponse.response to be an object.
fn wrap_tool_result(result: Value) -> Value {
    if result.is_object() {
        result
    } else {
        serde_json::json!({ "result": result })
    }
}

use async_trait::async_trait;

use crate::enums::backend_error::BackendApiError;
use crate::structs::ai::gemini::gemini_content::GeminiContent;
use crate::structs::ai::gemini::gemini_request::GeminiRequest;

/// One inference round trip against the reasoning backend. Implementations
/// return the first candidate's content; retry policy, if any, belongs to
/// the implementation, not the callers.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn generate(&self, request: GeminiRequest) -> Result<GeminiContent, BackendApiError>;
}

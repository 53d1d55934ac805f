use std::sync::Arc;

use crate::config::constants::{GEMINI_API_KEY_ENV, MAX_CODE_LENGTH};
use crate::errors::{AnalyzerError, AnalyzerResult};
use crate::helpers::prompt_builder::build_analysis_prompt;
use crate::helpers::summary::enrich_summary;
use crate::services::report_validator;
use crate::services::security_agent::SecurityAgent;
use crate::structs::analyze_request::AnalyzeRequest;
use crate::structs::config::app_config::AppConfig;
use crate::structs::security_report::SecurityReport;
use crate::traits::reasoning_backend::ReasoningBackend;
use crate::traits::tool_server::{ToolServer, ToolServerLauncher};

/// The analysis pipeline coordinator. Holds only read-only state, so one
/// instance serves every in-flight request concurrently.
pub struct SecurityAnalyzer {
    config: AppConfig,
    backend: Arc<dyn ReasoningBackend>,
    launcher: Arc<dyn ToolServerLauncher>,
}

impl SecurityAnalyzer {
    pub fn new(
        config: AppConfig,
        backend: Arc<dyn ReasoningBackend>,
        launcher: Arc<dyn ToolServerLauncher>,
    ) -> Self {
        Self {
            config,
            backend,
            launcher,
        }
    }

    /// Runs one analysis. The step order is fixed: credentials, request
    /// shape, tool acquisition, agent build, invocation, output validation,
    /// summary enrichment, tool release. Nothing external is contacted
    /// before both local checks pass.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> AnalyzerResult<SecurityReport> {
        self.check_credentials()?;
        Self::validate_request(request)?;

        let handle = self
            .launcher
            .launch()
            .await
            .map_err(|e| AnalyzerError::tool_error("launch", &e.to_string()))?;

        // The handle is released exactly once on every path below; if this
        // future is dropped mid-flight, dropping `handle` tears the process
        // down instead.
        let result = self.run_analysis(handle.as_ref(), &request.code).await;
        if let Err(e) = handle.shutdown().await {
            log::warn!("⚠️ Scan server teardown failed: {}", e);
        }

        result
    }

    fn check_credentials(&self) -> AnalyzerResult<()> {
        let configured = self
            .config
            .backend
            .api_key
            .as_deref()
            .is_some_and(|key| !key.is_empty());
        if !configured {
            return Err(AnalyzerError::config_error(
                "Gemini API key not configured",
                Some(GEMINI_API_KEY_ENV),
            ));
        }
        Ok(())
    }

    fn validate_request(request: &AnalyzeRequest) -> AnalyzerResult<()> {
        if request.code.trim().is_empty() {
            return Err(AnalyzerError::invalid_input("No code provided for analysis"));
        }
        if request.code.len() > MAX_CODE_LENGTH {
            return Err(AnalyzerError::invalid_input(&format!(
                "Code exceeds the {} byte analysis limit",
                MAX_CODE_LENGTH
            )));
        }
        Ok(())
    }

    async fn run_analysis(
        &self,
        tool_server: &dyn ToolServer,
        code: &str,
    ) -> AnalyzerResult<SecurityReport> {
        let agent = SecurityAgent::bind(self.backend.as_ref(), tool_server).await?;
        let reply = agent.run(build_analysis_prompt(code)).await?;
        let report = report_validator::validate_report(&reply)?;

        Ok(SecurityReport {
            summary: enrich_summary(code.len(), &report.summary),
            issues: report.issues,
        })
    }
}

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time;

use seclyzer::config::config_manager::ConfigManager;
use seclyzer::config::constants::MAX_CODE_LENGTH;
use seclyzer::enums::backend_error::BackendApiError;
use seclyzer::enums::scan_server_error::ScanServerError;
use seclyzer::enums::severity::Severity;
use seclyzer::errors::AnalyzerError;
use seclyzer::helpers::prompt_builder::build_analysis_prompt;
use seclyzer::helpers::summary::enrich_summary;
use seclyzer::services::report_validator::validate_report;
use seclyzer::services::security_analyzer::SecurityAnalyzer;
use seclyzer::structs::ai::gemini::gemini_content::GeminiContent;
use seclyzer::structs::ai::gemini::gemini_function_call::GeminiFunctionCall;
use seclyzer::structs::ai::gemini::gemini_part::GeminiPart;
use seclyzer::structs::ai::gemini::gemini_request::GeminiRequest;
use seclyzer::structs::analyze_request::AnalyzeRequest;
use seclyzer::structs::config::app_config::AppConfig;
use seclyzer::structs::mcp::tool_info::ToolInfo;
use seclyzer::traits::reasoning_backend::ReasoningBackend;
use seclyzer::traits::tool_server::{ToolServer, ToolServerLauncher};

// ---------------------------------------------------------------------------
// Stubs

struct StubBackend {
    calls: AtomicUsize,
    replies: Mutex<VecDeque<GeminiContent>>,
}

impl StubBackend {
    fn with_replies(replies: Vec<GeminiContent>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            replies: Mutex::new(replies.into()),
        })
    }

    fn exhausted() -> Arc<Self> {
        Self::with_replies(Vec::new())
    }
}

#[async_trait]
impl ReasoningBackend for StubBackend {
    async fn generate(&self, _request: GeminiRequest) -> Result<GeminiContent, BackendApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(reply),
            None => Err(BackendApiError::Network("stub backend exhausted".to_string())),
        }
    }
}

/// A backend whose call never resolves; used to park a request mid-flight.
struct PendingBackend;

#[async_trait]
impl ReasoningBackend for PendingBackend {
    async fn generate(&self, _request: GeminiRequest) -> Result<GeminiContent, BackendApiError> {
        std::future::pending().await
    }
}

#[derive(Default)]
struct ReleaseProbe {
    launches: AtomicUsize,
    shutdowns: AtomicUsize,
    dropped: AtomicBool,
    tool_calls: Mutex<Vec<String>>,
}

struct StubToolServer {
    probe: Arc<ReleaseProbe>,
}

impl Drop for StubToolServer {
    fn drop(&mut self) {
        self.probe.dropped.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ToolServer for StubToolServer {
    async fn list_tools(&self) -> Result<Vec<ToolInfo>, ScanServerError> {
        Ok(vec![ToolInfo {
            name: "semgrep_scan".to_string(),
            description: Some("Scan code for vulnerabilities".to_string()),
            input_schema: Some(json!({"type": "object"})),
        }])
    }

    async fn call_tool(&self, name: &str, _arguments: Value) -> Result<Value, ScanServerError> {
        self.probe.tool_calls.lock().unwrap().push(name.to_string());
        Ok(json!({"content": [{"type": "text", "text": "scan completed: 1 finding"}]}))
    }

    async fn shutdown(&self) -> Result<(), ScanServerError> {
        self.probe.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct StubLauncher {
    probe: Arc<ReleaseProbe>,
    fail: bool,
}

impl StubLauncher {
    fn working(probe: Arc<ReleaseProbe>) -> Arc<Self> {
        Arc::new(Self { probe, fail: false })
    }

    fn failing(probe: Arc<ReleaseProbe>) -> Arc<Self> {
        Arc::new(Self { probe, fail: true })
    }
}

#[async_trait]
impl ToolServerLauncher for StubLauncher {
    async fn launch(&self) -> Result<Box<dyn ToolServer>, ScanServerError> {
        self.probe.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScanServerError::Spawn("scanner binary not found".to_string()));
        }
        Ok(Box::new(StubToolServer {
            probe: Arc::clone(&self.probe),
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers

fn configured(api_key: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.backend.api_key = api_key.map(str::to_string);
    config
}

fn text_reply(text: &str) -> GeminiContent {
    GeminiContent {
        role: "model".to_string(),
        parts: vec![GeminiPart::text(text.to_string())],
    }
}

fn tool_call_reply(name: &str) -> GeminiContent {
    GeminiContent {
        role: "model".to_string(),
        parts: vec![GeminiPart {
            function_call: Some(GeminiFunctionCall {
                name: name.to_string(),
                args: json!({"code": "eval(input())"}),
            }),
            ..GeminiPart::default()
        }],
    }
}

fn single_issue_report() -> String {
    json!({
        "summary": "One critical issue identified.",
        "issues": [{
            "title": "Arbitrary code execution",
            "description": "User input is passed straight into eval.",
            "code": "eval(input())",
            "fix": "Parse the input with ast.literal_eval or a dedicated parser.",
            "cvss_score": 9.8,
            "severity": "critical"
        }]
    })
    .to_string()
}

fn make_analyzer(
    api_key: Option<&str>,
    backend: Arc<StubBackend>,
    launcher: Arc<StubLauncher>,
) -> SecurityAnalyzer {
    SecurityAnalyzer::new(configured(api_key), backend, launcher)
}

fn request(code: &str) -> AnalyzeRequest {
    AnalyzeRequest {
        code: code.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Orchestration

#[tokio::test]
async fn whitespace_only_code_is_rejected_before_any_external_work() {
    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::exhausted();
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), Arc::clone(&backend), launcher);

    let error = analyzer.analyze(&request("  \n\t  ")).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::InvalidInput { .. }));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(probe.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_code_is_rejected() {
    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::exhausted();
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), backend, launcher);

    let code = "a".repeat(MAX_CODE_LENGTH + 1);
    let error = analyzer.analyze(&request(&code)).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::InvalidInput { .. }));
    assert_eq!(probe.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_credential_short_circuits_before_any_call() {
    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::exhausted();
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(None, Arc::clone(&backend), launcher);

    let error = analyzer.analyze(&request("fn main() {}")).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::ConfigurationError { .. }));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(probe.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn analysis_produces_an_enriched_single_issue_report() {
    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::with_replies(vec![text_reply(&single_issue_report())]);
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), backend, launcher);

    let report = analyzer.analyze(&request("eval(input())")).await.unwrap();

    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.title, "Arbitrary code execution");
    assert_eq!(issue.cvss_score, 9.8);
    assert_eq!(issue.severity, Severity::Critical);

    assert!(report.summary.starts_with("One critical issue identified."));
    assert!(report.summary.contains("a small snippet"));
    assert!(report.summary.contains("13 characters"));

    assert_eq!(probe.launches.load(Ordering::SeqCst), 1);
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn issue_order_follows_backend_emission_order() {
    let report_json = json!({
        "summary": "Three issues.",
        "issues": [
            {"title": "first", "description": "d", "code": "c", "fix": "f",
             "cvss_score": 2.0, "severity": "low"},
            {"title": "second", "description": "d", "code": "c", "fix": "f",
             "cvss_score": 9.0, "severity": "critical"},
            {"title": "third", "description": "d", "code": "c", "fix": "f",
             "cvss_score": 5.0, "severity": "medium"}
        ]
    })
    .to_string();

    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::with_replies(vec![text_reply(&report_json)]);
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), backend, launcher);

    let report = analyzer.analyze(&request("let x = 1;")).await.unwrap();

    let titles: Vec<&str> = report.issues.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn tool_calls_run_against_the_attached_server_before_the_final_reply() {
    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::with_replies(vec![
        tool_call_reply("semgrep_scan"),
        text_reply(&single_issue_report()),
    ]);
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), Arc::clone(&backend), launcher);

    let report = analyzer.analyze(&request("eval(input())")).await.unwrap();

    assert_eq!(report.issues.len(), 1);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        *probe.tool_calls.lock().unwrap(),
        vec!["semgrep_scan".to_string()]
    );
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn out_of_range_cvss_score_is_rejected_not_coerced() {
    let report_json = json!({
        "summary": "s",
        "issues": [{"title": "t", "description": "d", "code": "c", "fix": "f",
                    "cvss_score": 11.2, "severity": "critical"}]
    })
    .to_string();

    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::with_replies(vec![text_reply(&report_json)]);
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), backend, launcher);

    let error = analyzer.analyze(&request("let x = 1;")).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::OutputValidationError { .. }));
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_severity_is_rejected() {
    let report_json = json!({
        "summary": "s",
        "issues": [{"title": "t", "description": "d", "code": "c", "fix": "f",
                    "cvss_score": 5.0, "severity": "catastrophic"}]
    })
    .to_string();

    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::with_replies(vec![text_reply(&report_json)]);
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), backend, launcher);

    let error = analyzer.analyze(&request("let x = 1;")).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::OutputValidationError { .. }));
}

#[tokio::test]
async fn reply_missing_the_fix_field_is_rejected_whole() {
    let report_json = json!({
        "summary": "s",
        "issues": [{"title": "t", "description": "d", "code": "c",
                    "cvss_score": 5.0, "severity": "medium"}]
    })
    .to_string();

    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::with_replies(vec![text_reply(&report_json)]);
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), backend, launcher);

    let error = analyzer.analyze(&request("let x = 1;")).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::OutputValidationError { .. }));
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn backend_failure_still_releases_the_tool_server_exactly_once() {
    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::exhausted();
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), backend, launcher);

    let error = analyzer.analyze(&request("let x = 1;")).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::BackendInvocationError { .. }));
    assert_eq!(probe.launches.load(Ordering::SeqCst), 1);
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn launcher_failure_surfaces_as_tool_acquisition() {
    let probe = Arc::new(ReleaseProbe::default());
    let backend = StubBackend::exhausted();
    let launcher = StubLauncher::failing(Arc::clone(&probe));
    let analyzer = make_analyzer(Some("key"), Arc::clone(&backend), launcher);

    let error = analyzer.analyze(&request("let x = 1;")).await.unwrap_err();

    assert!(matches!(error, AnalyzerError::ToolAcquisitionError { .. }));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancellation_mid_flight_still_tears_down_the_tool_server() {
    let probe = Arc::new(ReleaseProbe::default());
    let launcher = StubLauncher::working(Arc::clone(&probe));
    let analyzer = Arc::new(SecurityAnalyzer::new(
        configured(Some("key")),
        Arc::new(PendingBackend),
        launcher,
    ));

    let task = tokio::spawn({
        let analyzer = Arc::clone(&analyzer);
        async move { analyzer.analyze(&request("let x = 1;")).await }
    });

    for _ in 0..100 {
        if probe.launches.load(Ordering::SeqCst) == 1 {
            break;
        }
        time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(probe.launches.load(Ordering::SeqCst), 1);

    task.abort();

    for _ in 0..100 {
        if probe.dropped.load(Ordering::SeqCst) {
            break;
        }
        time::sleep(Duration::from_millis(10)).await;
    }
    assert!(probe.dropped.load(Ordering::SeqCst));
    // The explicit release never ran; drop-based teardown is the one release.
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Validator

#[test]
fn validator_accepts_a_clean_report_with_no_issues() {
    let report = validate_report(r#"{"summary": "No issues found.", "issues": []}"#).unwrap();
    assert_eq!(report.summary, "No issues found.");
    assert!(report.issues.is_empty());
}

#[test]
fn validator_accepts_fenced_json() {
    let fenced = format!("```json\n{}\n```", single_issue_report());
    let report = validate_report(&fenced).unwrap();
    assert_eq!(report.issues.len(), 1);
}

#[test]
fn validator_rejects_non_json_replies() {
    let error = validate_report("I could not find any issues, great job!").unwrap_err();
    assert!(matches!(error, AnalyzerError::OutputValidationError { .. }));
}

// ---------------------------------------------------------------------------
// Enrichment and prompt building

#[test]
fn enrich_summary_is_deterministic() {
    let first = enrich_summary(13, "Summary text.");
    let second = enrich_summary(13, "Summary text.");
    assert_eq!(first, second);
}

#[test]
fn enrich_summary_appends_a_length_derived_qualifier() {
    let small = enrich_summary(13, "s");
    assert!(small.contains("a small snippet"));
    assert!(small.contains("13 characters"));

    let medium = enrich_summary(2_000, "s");
    assert!(medium.contains("a medium-sized sample"));

    let large = enrich_summary(50_000, "s");
    assert!(large.contains("a large code sample"));
}

#[test]
fn analysis_prompt_carries_the_code_verbatim() {
    let code = "fn main() {\n    let password = \"hunter2\";\n}";
    let prompt = build_analysis_prompt(code);
    assert!(prompt.contains(code));
}

// ---------------------------------------------------------------------------
// Configuration

#[test]
fn config_file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
port = 9000

[backend]
model = "gemini-2.5-pro"

[scan_server]
command = ["semgrep-mcp"]
"#,
    )
    .unwrap();

    let config = ConfigManager::load_from(&path).unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.backend.model, "gemini-2.5-pro");
    assert_eq!(config.backend.api_key, None);
    assert_eq!(config.scan_server.command, vec!["semgrep-mcp".to_string()]);
    // Untouched sections keep their defaults.
    assert!(config.backend.base_url.starts_with("https://"));
}

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Filter;

use crate::config::constants::MAX_REQUEST_BODY_BYTES;
use crate::errors::{AnalyzerError, AnalyzerResult, ErrorHandler};
use crate::services::security_analyzer::SecurityAnalyzer;
use crate::structs::analyze_request::AnalyzeRequest;
use crate::structs::config::app_config::AppConfig;
use crate::structs::config::scan_server_config::ScanServerConfig;
use crate::ui::diagnostics;

pub struct ApiServer {
    analyzer: Arc<SecurityAnalyzer>,
    config: AppConfig,
}

impl ApiServer {
    pub fn new(analyzer: Arc<SecurityAnalyzer>, config: AppConfig) -> Self {
        Self { analyzer, config }
    }

    pub async fn run(&self) -> AnalyzerResult<()> {
        let analyzer = Arc::clone(&self.analyzer);
        let analyzer_filter = warp::any().map(move || Arc::clone(&analyzer));

        let analyze = warp::path!("api" / "analyze")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_REQUEST_BODY_BYTES))
            .and(warp::body::json())
            .and(analyzer_filter)
            .and_then(analyze_handler);

        let health = warp::path!("health")
            .and(warp::get())
            .and_then(health_handler);

        let network_test = warp::path!("network-test")
            .and(warp::get())
            .and_then(network_test_handler);

        let scan_config = self.config.scan_server.clone();
        let scanner_test = warp::path!("scanner-test")
            .and(warp::get())
            .and(warp::any().map(move || scan_config.clone()))
            .and_then(scanner_test_handler);

        // Frontend bundle, when one is deployed next to the binary.
        let static_files = warp::fs::dir("static");

        let mut cors = warp::cors()
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST"]);
        cors = if self.config.server.environment.is_production() {
            // Same-domain deployment serves the frontend itself.
            cors.allow_any_origin()
        } else {
            cors.allow_origin("http://localhost:3000")
                .allow_origin("http://frontend:3000")
        };

        let routes = analyze
            .or(health)
            .or(network_test)
            .or(scanner_test)
            .or(static_files)
            .with(cors);

        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| {
                AnalyzerError::config_error(
                    &format!("invalid listen address: {}", e),
                    Some("server.host"),
                )
            })?;

        log::info!("🌐 Security analyzer API listening on {}", addr);
        let (_, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("🛑 Shutdown signal received");
        });
        server.await;

        log::info!("✅ Server stopped");
        Ok(())
    }
}

async fn analyze_handler(
    request: AnalyzeRequest,
    analyzer: Arc<SecurityAnalyzer>,
) -> Result<impl warp::Reply, Infallible> {
    let request_id = Uuid::new_v4();
    log::info!(
        "🔍 [{}] Analysis requested ({} bytes of code)",
        request_id,
        request.code.len()
    );

    match analyzer.analyze(&request).await {
        Ok(report) => {
            log::info!(
                "✅ [{}] Analysis finished with {} issue(s)",
                request_id,
                report.issues.len()
            );
            Ok(warp::reply::with_status(
                warp::reply::json(&report),
                StatusCode::OK,
            ))
        }
        Err(error) => {
            ErrorHandler::log_failure(&request_id, &error);
            let status = StatusCode::from_u16(error.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({ "detail": error.detail() })),
                status,
            ))
        }
    }
}

async fn health_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "message": "Security Analyzer API",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

async fn network_test_handler() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&diagnostics::network_probe().await))
}

async fn scanner_test_handler(
    config: ScanServerConfig,
) -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&diagnostics::scanner_probe(&config).await))
}

use std::process::Stdio;

use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::process::Command;
use tokio::time;

use crate::config::constants::{
    timeout_duration_secs, NETWORK_TEST_TIMEOUT_SECS, SCANNER_TEST_TIMEOUT_SECS,
    SCANNER_VENDOR_API_URL,
};
use crate::structs::config::scan_server_config::ScanServerConfig;

static HTTP: Lazy<Client> = Lazy::new(Client::new);

/// Probes reachability of the scanner vendor API.
pub async fn network_probe() -> Value {
    let request = HTTP
        .get(SCANNER_VENDOR_API_URL)
        .timeout(timeout_duration_secs(NETWORK_TEST_TIMEOUT_SECS))
        .send();

    match request.await {
        Ok(response) => {
            let status_code = response.status().as_u16();
            let response_size = response.bytes().await.map(|body| body.len()).unwrap_or(0);
            json!({
                "scanner_api_reachable": true,
                "status_code": status_code,
                "response_size": response_size,
            })
        }
        Err(error) => json!({
            "scanner_api_reachable": false,
            "error": error.to_string(),
        }),
    }
}

/// Probes whether the configured scan server program can run at all.
pub async fn scanner_probe(config: &ScanServerConfig) -> Value {
    let Some(program) = config.command.first() else {
        return json!({
            "scanner_available": false,
            "error": "scan server command is empty",
        });
    };

    let probe = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output();

    match time::timeout(timeout_duration_secs(SCANNER_TEST_TIMEOUT_SECS), probe).await {
        Ok(Ok(output)) => json!({
            "scanner_available": output.status.success(),
            "version_output": String::from_utf8_lossy(&output.stdout).trim(),
            "version_error": String::from_utf8_lossy(&output.stderr).trim(),
        }),
        Ok(Err(error)) => json!({
            "scanner_available": false,
            "error": error.to_string(),
        }),
        Err(_) => json!({
            "scanner_available": false,
            "error": "timed out waiting for the scanner version check",
        }),
    }
}

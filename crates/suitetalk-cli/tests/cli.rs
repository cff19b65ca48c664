//! CLI tests running the built binary.
//!
//! Remote calls go to a mock web services endpoint, so no account is needed.

use std::path::Path;
use std::process::Output;

use serde_json::json;
use tokio::process::Command;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PORT_PATH: &str = "/services/NetSuitePort_2019_1";

/// Run the binary with only the given `NETSUITE_*` variables set.
async fn run_cli(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_suitetalk"));
    cmd.args(args).env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        cmd.env("PATH", path);
    }
    cmd.envs(env.iter().copied());
    cmd.output().await.expect("Failed to execute CLI")
}

fn token_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("NETSUITE_ACCOUNT", "123456"),
        ("NETSUITE_CONSUMER_KEY", "ck"),
        ("NETSUITE_CONSUMER_SECRET", "cs"),
        ("NETSUITE_TOKEN_KEY", "tk"),
        ("NETSUITE_TOKEN_SECRET", "ts"),
    ]
}

fn host(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn search_page(page_index: u32, ids: &[&str]) -> serde_json::Value {
    let records: Vec<_> = ids
        .iter()
        .map(|id| json!({"$type": "Customer", "internalId": id}))
        .collect();
    json!({
        "searchResult": {
            "status": {"isSuccess": true},
            "searchId": "WEBSERVICES_123456_abc",
            "pageIndex": page_index,
            "totalRecords": 3,
            "totalPages": 2,
            "pageSize": 2,
            "recordList": {"record": records}
        }
    })
}

// ============================================================================
// Argument handling
// ============================================================================

#[tokio::test]
async fn help_lists_commands() {
    let output = run_cli(&["--help"], &[]).await;

    assert!(output.status.success());
    let help = stdout(&output);
    for command in ["endpoint", "get", "add", "update", "delete", "search"] {
        assert!(help.contains(command), "missing {command} in:\n{help}");
    }
}

#[tokio::test]
async fn missing_account_is_a_config_error() {
    let output = run_cli(&["endpoint"], &[]).await;

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("NETSUITE_ACCOUNT"), "stderr: {err}");
}

#[tokio::test]
async fn plain_http_host_is_rejected() {
    let output = run_cli(&["endpoint", "--host", "http://example.com"], &token_env()).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid --host"));
}

// ============================================================================
// Remote calls
// ============================================================================

#[tokio::test]
async fn endpoint_uses_configured_host() {
    let server = MockServer::start().await;
    let host = host(&server);

    let output = run_cli(&["endpoint", "--host", &host], &token_env()).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(&format!("{host}{PORT_PATH}")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_prints_the_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/get")))
        .and(body_partial_json(json!({
            "body": {"baseRef": {"internalId": "42", "type": "customer"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "readResponse": {
                "status": {"isSuccess": true},
                "record": {"$type": "Customer", "internalId": "42", "companyName": "Wolfe"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(
        &["get", "42", "--type", "customer", "--compact", "--host", &host(&server)],
        &token_env(),
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let record: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(record["companyName"], "Wolfe");
}

#[tokio::test]
async fn rejected_get_fails_with_the_status_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "readResponse": {
                "status": {
                    "isSuccess": false,
                    "statusDetail": [
                        {"code": "RCRD_DSNT_EXIST", "message": "That record does not exist.", "type": "ERROR"}
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    let output = run_cli(
        &["get", "404", "--type", "customer", "--host", &host(&server)],
        &token_env(),
    )
    .await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("RCRD_DSNT_EXIST"));
}

#[tokio::test]
async fn search_prints_every_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(1, &["1", "2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/searchMoreWithId")))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(2, &["3"])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(
        &["search", "CustomerSearchBasic", "--page-size", "2", "--host", &host(&server)],
        &token_env(),
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let ids: Vec<String> = stdout(&output)
        .lines()
        .map(|line| {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            record["internalId"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[tokio::test]
async fn search_count_and_limit_stay_on_the_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page(1, &["1", "2"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/searchMoreWithId")))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let count = run_cli(
        &["search", "CustomerSearchBasic", "--count", "--host", &host(&server)],
        &token_env(),
    )
    .await;
    assert!(count.status.success(), "stderr: {}", stderr(&count));
    assert_eq!(stdout(&count).trim(), "3");

    let limited = run_cli(
        &["search", "CustomerSearchBasic", "--limit", "2", "--host", &host(&server)],
        &token_env(),
    )
    .await;
    assert!(limited.status.success(), "stderr: {}", stderr(&limited));
    assert_eq!(stdout(&limited).lines().count(), 2);
}

#[tokio::test]
async fn add_reads_record_file_and_logs_the_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PORT_PATH}/add")))
        .and(body_partial_json(json!({
            "body": {"record": {"$type": "Customer", "companyName": "Wolfe"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResponse": {
                "status": {"isSuccess": true},
                "baseRef": {"internalId": "77", "type": "customer"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("customer.json");
    std::fs::write(&record, r#"{"companyName": "Wolfe"}"#).unwrap();
    let logs = dir.path().join("logs");

    let output = run_cli(
        &[
            "add",
            record.to_str().unwrap(),
            "--type",
            "Customer",
            "--host",
            &host(&server),
            "--log-dir",
            logs.to_str().unwrap(),
        ],
        &token_env(),
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("77"));
    assert_eq!(logged(&logs, "-add-request.json"), 1);
    assert_eq!(logged(&logs, "-add-response.json"), 1);
}

fn logged(dir: &Path, suffix: &str) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(suffix)
        })
        .count()
}

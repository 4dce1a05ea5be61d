use std::path::Path;
use std::process::Output;

use tempfile::tempdir;
use tokio::process::Command;
use wiremock::matchers::{basic_auth, body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BIN: &str = env!("CARGO_BIN_EXE_jira-rest");

fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("config.yaml");
    std::fs::write(
        &config_path,
        format!(
            "default_profile: test\nprofiles:\n  test:\n    base_url: {base_url}\n    user: cli-user\n    dial_timeout_secs: 2\n"
        ),
    )
    .unwrap();
    config_path
}

async fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env("HOME", home)
        .env("JIRA_API_TOKEN", "cli-token")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute jira-rest")
}

#[tokio::test]
async fn test_cli_help() {
    let dir = tempdir().unwrap();
    let output = run(dir.path(), &["--help"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("issue"));
    assert!(stdout.contains("project"));
    assert!(stdout.contains("comment"));
    assert!(stdout.contains("auth"));
}

#[tokio::test]
async fn test_cli_version() {
    let dir = tempdir().unwrap();
    let output = run(dir.path(), &["--version"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("jira-rest"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_cli_issue_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/ABC-42/"))
        .and(query_param("fields", "summary"))
        .and(basic_auth("cli-user", "cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "10042",
            "key": "ABC-42",
            "fields": {"summary": "Fix login bug"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &format!("{}/rest/api/2/", mock_server.uri()));
    let output = run(
        dir.path(),
        &["--config", config.to_str().unwrap(), "--output", "json", "issue", "ABC-42"],
    )
    .await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let issue: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(issue["project"], "abc");
    assert_eq!(issue["summary"], "Fix login bug");
    assert_eq!(issue["data"]["summary"], "Fix login bug");
}

#[tokio::test]
async fn test_cli_project_quiet() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/project/ABC"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Alpha Beta"})),
        )
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &format!("{}/rest/api/2/", mock_server.uri()));
    let output = run(
        dir.path(),
        &["--config", config.to_str().unwrap(), "--output", "quiet", "project", "ABC"],
    )
    .await;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Alpha Beta\n");
}

#[tokio::test]
async fn test_cli_comment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/ABC-42/comment"))
        .and(body_string(r#"{"body":"Looks good"}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &format!("{}/rest/api/2/", mock_server.uri()));
    let output = run(
        dir.path(),
        &["--config", config.to_str().unwrap(), "comment", "ABC-42", "Looks good"],
    )
    .await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[tokio::test]
async fn test_cli_issue_not_found_fails() {
    let mock_server = MockServer::start().await;

    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), &format!("{}/rest/api/2/", mock_server.uri()));
    let output = run(
        dir.path(),
        &["--config", config.to_str().unwrap(), "issue", "NOPE-1"],
    )
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to fetch issue NOPE-1"));
    assert!(stderr.contains("Not found"));
}

#[tokio::test]
async fn test_cli_without_profile_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");
    let output = run(
        dir.path(),
        &["--config", missing.to_str().unwrap(), "project", "ABC"],
    )
    .await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No profile configured"));
}

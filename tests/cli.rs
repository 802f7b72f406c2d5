use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Output;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gh_activity(workdir: &Path, api_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("gh-activity").unwrap();
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir.join("config"))
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_API_URL", api_url)
        .env_remove("GH_ACTIVITY_LOG");
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn mount_identity(server: &MockServer, orgs: Value) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "alice" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/memberships/orgs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orgs))
        .mount(server)
        .await;
}

#[test]
fn help_shows_options() {
    let mut cmd = Command::cargo_bin("gh-activity").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--org"))
        .stdout(predicate::str::contains("--out"));
}

#[test]
fn version_flag() {
    let mut cmd = Command::cargo_bin("gh-activity").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gh-activity"));
}

#[test]
fn missing_token_exits_with_code_2() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("gh-activity").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("GITHUB_TOKEN")
        // Nothing listens here; a request would hang in retries.
        .env("GITHUB_API_URL", "http://127.0.0.1:9")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn malformed_dates_fail() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = gh_activity(dir.path(), "http://127.0.0.1:9");
    cmd.args(["--from", "2024-01-01", "--to", "January 31"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid date"));
}

#[tokio::test(flavor = "multi_thread")]
async fn exports_seven_records_for_one_org() {
    let server = MockServer::start().await;
    mount_identity(
        &server,
        json!([{ "state": "active", "organization": { "login": "acme" } }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "items": [{
                "repository_url": "https://api.github.com/repos/acme/widgets",
                "number": 42,
                "title": "Add sprockets",
                "state": "open",
                "html_url": "https://github.com/acme/widgets/pull/42",
                "created_at": "2024-01-03T10:00:00Z",
                "updated_at": "2024-01-04T10:00:00Z",
                "closed_at": null
            }]
        })))
        .expect(6)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "items": [{
                "sha": "deadbeef",
                "html_url": "https://github.com/acme/widgets/commit/deadbeef",
                "commit": { "message": "Add sprockets", "author": { "date": "2024-01-03T09:00:00Z" } },
                "repository": { "full_name": "acme/widgets" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = gh_activity(dir.path(), &server.uri());
    cmd.args(["--from", "2024-01-01", "--to", "2024-01-31"]);
    let output = run(cmd).await;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Wrote 7 records"));

    let json_path = dir.path().join("github_activity_2024-01-01_2024-01-31.json");
    let records: Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    let kinds: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "prs_opened",
            "prs_merged",
            "prs_reviewed",
            "prs_commented",
            "issues_opened",
            "involves_me",
            "commits",
        ]
    );
    assert_eq!(records[0]["repo"], "acme/widgets");
    assert_eq!(records[0]["number"], 42);

    let csv = std::fs::read_to_string(dir.path().join("github_activity_2024-01-01_2024-01-31.csv"))
        .unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].starts_with("kind,org,repo,number,"));
    assert!(lines[7].starts_with("commits,acme,acme/widgets,"));
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_prefix_names_the_files() {
    let server = MockServer::start().await;
    mount_identity(
        &server,
        json!([{ "state": "active", "organization": { "login": "acme" } }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = gh_activity(dir.path(), &server.uri());
    cmd.args(["--from", "2024-02-01", "--to", "2024-02-29", "--out", "me"]);
    let output = run(cmd).await;
    assert!(output.status.success());

    let json = std::fs::read_to_string(dir.path().join("me_2024-02-01_2024-02-29.json")).unwrap();
    assert_eq!(json, "[]");
    assert!(dir.path().join("me_2024-02-01_2024-02-29.csv").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn no_organizations_exits_cleanly() {
    let server = MockServer::start().await;
    mount_identity(&server, json!([])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = gh_activity(dir.path(), &server.uri());
    cmd.args(["--from", "2024-01-01", "--to", "2024-01-31"]);
    let output = run(cmd).await;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No organizations to process."));
    assert!(!dir
        .path()
        .join("github_activity_2024-01-01_2024-01-31.json")
        .exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn org_filter_can_exclude_everything() {
    let server = MockServer::start().await;
    mount_identity(
        &server,
        json!([
            { "state": "active", "organization": { "login": "A" } },
            { "state": "active", "organization": { "login": "C" } }
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = gh_activity(dir.path(), &server.uri());
    cmd.args(["--org", "B", "--org", "D"]);
    let output = run(cmd).await;

    assert!(output.status.success());
}

#[tokio::test(flavor = "multi_thread")]
async fn api_error_fails_without_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = gh_activity(dir.path(), &server.uri());
    cmd.args(["--from", "2024-01-01", "--to", "2024-01-31"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("401"));
    assert!(!dir
        .path()
        .join("github_activity_2024-01-01_2024-01-31.csv")
        .exists());
}

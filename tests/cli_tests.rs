use assert_cmd::Command;
use predicates::prelude::*;
use politicos::testing::MockApiServer;
use serde_json::json;
use std::io::Write;

#[allow(deprecated)]
fn politicos() -> Command {
    let mut cmd = Command::cargo_bin("politicos").unwrap();
    cmd.env_remove("POLITICOS_ENDPOINT")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_cli_version() {
    politicos().arg("--version").assert().success();
}

#[test]
fn test_cli_help_lists_commands() {
    politicos()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_cli_bad_config_exit_code() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"endpoint = [").unwrap();
    politicos()
        .arg("--config")
        .arg(file.path())
        .arg("health")
        .assert()
        .code(2);
}

#[test]
fn test_cli_unknown_gender_is_usage_error() {
    politicos()
        .args(["list", "--gender", "Otro"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown gender"));
}

#[test]
fn test_cli_import_rejects_non_csv() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    politicos()
        .args(["--endpoint", "http://127.0.0.1:9", "import"])
        .arg(file.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Only CSV files are supported"));
}

#[test]
fn test_cli_edit_refuses_bare_thousands_group() {
    politicos()
        .args(["--endpoint", "http://127.0.0.1:9", "edit", "1", "--monthly-pay", "3.500"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not a valid amount"));
}

#[test]
fn test_cli_network_failure_exit_code() {
    politicos()
        .args(["--endpoint", "http://127.0.0.1:9", "stats"])
        .assert()
        .code(4);
}

#[test]
fn test_cli_list_against_mock_server() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(
        MockApiServer::builder()
            .with_json(
                "GET",
                "/politicians",
                200,
                json!({
                    "data": [{"_id": "1", "nombre": "Jane Doe", "retribucionanual": 59507.0}],
                    "total_pages": 2
                }),
            )
            .build(),
    );

    politicos()
        .args(["--endpoint", server.url(), "list", "/politicians?gender=Mujer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe"))
        .stdout(predicate::str::contains("59.507,00 €"))
        .stdout(predicate::str::contains("Page 1 of 2"));

    let requests = runtime.block_on(server.requests());
    assert_eq!(requests[0].query(), Some("page=1&per_page=10&gender=Mujer"));
    runtime.block_on(server.stop());
}

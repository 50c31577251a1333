use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SETTING_VARS: &[&str] = &[
    "ASM_API_KEY",
    "ASM_PROXY",
    "ASM_TIMEOUT_SECONDS",
    "ASM_BASE_URL",
    "ASM_USER_ACTION_LIMIT",
    "ASM_PROXY_ENABLED",
    "ASM_PROXY_SCHEME",
    "ASM_PROXY_HOST",
    "ASM_PROXY_PORT",
    "ASM_PROXY_USERNAME",
    "ASM_PROXY_PASSWORD",
    "SPLUNK_HOME",
];

/// A collector command isolated from the caller's environment.
fn collector(workdir: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("asm-collector")?;
    cmd.current_dir(workdir);
    for var in SETTING_VARS {
        cmd.env_remove(var);
    }
    cmd.env("ASM_LOG_LEVEL", "debug");
    Ok(cmd)
}

fn write_conf(app_dir: &Path, layer: &str, body: &str) -> Result<()> {
    let dir = app_dir.join(layer);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("asm_settings.conf"), body)?;
    Ok(())
}

fn stdout_lines(output: &[u8]) -> Result<Vec<Value>> {
    let text = String::from_utf8(output.to_vec())?;
    text.lines()
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

#[test]
fn missing_api_key_prints_one_error_event_and_exits_1() -> Result<()> {
    let app_dir = TempDir::new()?;
    write_conf(app_dir.path(), "default", "[settings]\napi_key =\ntimeout_seconds = 60\n")?;

    let mut cmd = collector(app_dir.path())?;
    cmd.arg("--app-dir").arg(app_dir.path());

    let output = cmd.assert().code(1).get_output().clone();
    let lines = stdout_lines(&output.stdout)?;

    assert_eq!(lines.len(), 1, "stdout must carry exactly one line");
    assert_eq!(lines[0]["event_type"], "asm_inventory_stats_error");
    assert!(
        lines[0]["error"]
            .as_str()
            .is_some_and(|error| error.contains("api_key"))
    );
    assert!(lines[0]["ts"].is_i64());
    Ok(())
}

#[test]
fn inventory_stats_success_prints_one_event() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/1.0/inventory")
        .match_header("authorization", "conf-key")
        .with_status(200)
        .with_body(r#"{"stats":{"total":10,"domaincount":2},"hiddenCount":0,"freeLimitReached":false}"#)
        .create();

    let app_dir = TempDir::new()?;
    write_conf(app_dir.path(), "default", "[settings]\napi_key =\ntimeout_seconds = 60\n")?;
    write_conf(
        app_dir.path(),
        "local",
        &format!("[settings]\napi_key = conf-key\nbase_url = {}\n", server.url()),
    )?;

    let mut cmd = collector(app_dir.path())?;
    cmd.arg("--app-dir").arg(app_dir.path());

    let output = cmd.assert().success().get_output().clone();
    mock.assert();

    let lines = stdout_lines(&output.stdout)?;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["event_type"], "asm_inventory_stats");
    assert_eq!(lines[0]["total_assets"], 10);
    assert_eq!(lines[0]["domains"], 2);
    assert_eq!(lines[0]["subdomains"], Value::Null);
    assert_eq!(lines[0]["free_limit_reached"], false);
    Ok(())
}

#[test]
fn environment_overrides_conf_file() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/1.0/inventory")
        .match_header("authorization", "env-key")
        .with_status(200)
        .with_body("{}")
        .create();

    let app_dir = TempDir::new()?;
    let conf = app_dir.path().join("custom.conf");
    fs::write(&conf, "[settings]\napi_key = conf-key\n")?;

    let mut cmd = collector(app_dir.path())?;
    cmd.arg("--conf-file")
        .arg(&conf)
        .env("ASM_API_KEY", "env-key")
        .env("ASM_BASE_URL", server.url());

    cmd.assert().success();
    mock.assert();
    Ok(())
}

#[test]
fn http_error_is_reported_on_stdout_with_logs_on_stderr() -> Result<()> {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/1.0/inventory")
        .with_status(503)
        .create();

    let app_dir = TempDir::new()?;
    let mut cmd = collector(app_dir.path())?;
    cmd.arg("--app-dir")
        .arg(app_dir.path())
        .env("ASM_API_KEY", "k")
        .env("ASM_BASE_URL", server.url());

    let assert = cmd.assert().code(1);
    let output = assert.get_output().clone();
    assert.stderr(predicate::str::contains("asm-collector"));

    let lines = stdout_lines(&output.stdout)?;
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0]["error"]
            .as_str()
            .is_some_and(|error| error.contains("HTTP 503"))
    );
    Ok(())
}

#[test]
fn subcommand_selects_collector() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/1.0/asset-limit")
        .with_status(200)
        .with_body(r#"{"asset_limit": 500, "limit_reached": false}"#)
        .create();

    let app_dir = TempDir::new()?;
    let mut cmd = collector(app_dir.path())?;
    cmd.arg("--app-dir")
        .arg(app_dir.path())
        .arg("asset-limit")
        .env("ASM_API_KEY", "k")
        .env("ASM_BASE_URL", server.url());

    let output = cmd.assert().success().get_output().clone();
    mock.assert();

    let lines = stdout_lines(&output.stdout)?;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["event_type"], "asm_asset_limit");
    assert_eq!(lines[0]["asset_limit"], 500);
    Ok(())
}

#[test]
fn app_dir_and_conf_file_conflict() -> Result<()> {
    let app_dir = TempDir::new()?;
    let mut cmd = collector(app_dir.path())?;
    cmd.arg("--app-dir")
        .arg(app_dir.path())
        .arg("--conf-file")
        .arg(app_dir.path().join("x.conf"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}

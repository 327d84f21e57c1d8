// tests/config_loading.rs

mod common;
use crate::common::builders::{AgentOptionsBuilder, ConfigFileBuilder};

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use tempfile::NamedTempFile;

use shellevent::command::Program;
use shellevent::config::{ConfigFile, load_and_validate, load_from_path, validate_config};
use shellevent::errors::ShellEventError;
use shellevent::select_agents;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str) -> String {
    match load_and_validate(write_config(contents).path()) {
        Err(ShellEventError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn demo_config_loads() {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest.join("demos/basic.toml")).unwrap();

    assert!(!cfg.config.allow_execution);
    assert_eq!(cfg.agent_names().collect::<Vec<_>>(), vec!["echo", "listing", "where"]);

    let listing = &cfg.agent["listing"].parsed;
    assert_eq!(
        listing.command,
        Program::ArgVector(vec!["ls".to_string(), "-1".to_string()])
    );
    assert!(listing.suppress_on_empty_output);
    assert_eq!(listing.timeout, Some(Duration::from_secs(10)));

    let echo = &cfg.agent["echo"];
    assert!(echo.parsed.merge);
    assert_eq!(echo.options["source"], json!("demo"));
}

#[test]
fn defaults_when_config_section_missing() {
    let file = write_config(
        r#"
[agent.a]
path = "/"
command = "true"
expected_update_period_in_days = 1
"#,
    );

    let raw = load_from_path(file.path()).unwrap();
    assert!(!raw.config.allow_execution);
    assert!(!raw.config.spawn_failure_is_failure);

    let cfg = ConfigFile::try_from(raw).unwrap();
    let a = &cfg.agent["a"].parsed;
    assert!(!a.suppress_on_failure);
    assert!(!a.merge);
    assert_eq!(a.stdin, None);
    assert_eq!(a.timeout, None);
}

#[test]
fn no_agents_is_an_error() {
    let msg = expect_config_error("[config]\nallow_execution = true\n");
    assert!(msg.contains("at least one [agent.<name>]"));
}

#[test]
fn missing_required_fields() {
    let msg = expect_config_error(
        r#"
[agent.a]
path = "/"
command = "pwd"
"#,
    );
    assert!(msg.contains("agent 'a'"));
    assert!(msg.contains("all required"));
}

#[test]
fn non_string_argv_element() {
    let msg = expect_config_error(
        r#"
[agent.a]
path = "/"
command = ["ls", 1]
expected_update_period_in_days = 1
"#,
    );
    assert!(msg.contains("command must be a shell command line string"));
}

#[test]
fn non_string_stdin() {
    let msg = expect_config_error(
        r#"
[agent.a]
path = "/"
command = "cat"
stdin = 5
expected_update_period_in_days = 1
"#,
    );
    assert!(msg.contains("stdin must be a string"));
}

#[test]
fn path_must_be_a_real_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    let msg = expect_config_error(&format!(
        r#"
[agent.a]
path = "{}"
command = "pwd"
expected_update_period_in_days = 1
"#,
        missing.display()
    ));
    assert!(msg.contains("is not a real directory"));
}

#[test]
fn templated_path_is_checked_later() {
    let file = write_config(
        r#"
[agent.a]
path = "{{ dir }}/work"
command = "pwd"
expected_update_period_in_days = 1
"#,
    );
    assert!(load_and_validate(file.path()).is_ok());
}

#[test]
fn invalid_timeout() {
    let msg = expect_config_error(
        r#"
[agent.a]
path = "/"
command = "pwd"
expected_update_period_in_days = 1
timeout = "forever"
"#,
    );
    assert!(msg.contains("invalid timeout"));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[agent.a\npath = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(ShellEventError::TomlError(_))
    ));
}

#[test]
fn missing_file_error_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let err = load_and_validate(&path).unwrap_err();
    let ShellEventError::ReadConfig { path: reported, .. } = &err else {
        panic!("expected ReadConfig, got {err:?}");
    };
    assert_eq!(reported, &path);
    assert!(err.to_string().contains("nope.toml"), "{err}");
}

#[test]
fn validate_config_rechecks_edited_options() {
    let mut cfg = ConfigFileBuilder::new()
        .with_agent("a", AgentOptionsBuilder::shell("/", "true").build())
        .build();
    assert!(validate_config(&cfg).is_ok());

    cfg.agent
        .get_mut("a")
        .unwrap()
        .options
        .insert("stdin".into(), json!(["not", "a", "string"]));
    assert!(matches!(
        validate_config(&cfg),
        Err(ShellEventError::ConfigError(_))
    ));
}

#[test]
fn select_agents_by_name() {
    let cfg = ConfigFileBuilder::new()
        .with_agent("a", AgentOptionsBuilder::shell("/", "true").build())
        .with_agent("b", AgentOptionsBuilder::shell("/", "true").build())
        .build();

    let all = select_agents(&cfg, None, true).unwrap();
    assert_eq!(all.len(), 2);

    let only_b = select_agents(&cfg, Some("b"), true).unwrap();
    assert_eq!(only_b.len(), 1);
    assert_eq!(only_b[0].name(), "b");

    match select_agents(&cfg, Some("zzz"), true) {
        Err(ShellEventError::AgentNotFound(name)) => assert_eq!(name, "zzz"),
        other => panic!("expected AgentNotFound, got {:?}", other.map(|a| a.len())),
    }
}

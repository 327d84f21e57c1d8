// src/config/options.rs

//! Typed view over an agent's loose option map.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::command::{CommandSpec, Program};
use crate::config::duration::parse_duration;
use crate::gate::GatePolicy;
use crate::interpolate::contains_placeholder;

/// Options whose value may depend on the incoming event.
const DEFERRED_KEYS: [&str; 4] = [
    "suppress_on_failure",
    "suppress_on_empty_output",
    "merge",
    "timeout",
];

/// Options of one agent after type checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOptions {
    pub path: PathBuf,
    pub command: Program,
    pub stdin: Option<String>,
    pub suppress_on_failure: bool,
    pub suppress_on_empty_output: bool,
    pub merge: bool,
    pub expected_update_period_in_days: u32,
    pub timeout: Option<Duration>,
}

impl AgentOptions {
    /// Type-check an option map.
    ///
    /// Booleans accept `true`/`false` as well as the strings `"true"` and
    /// `"false"`, since interpolated values always come back as strings.
    pub fn from_map(options: &Map<String, Value>) -> Result<Self, String> {
        let path = options.get("path").and_then(Value::as_str).unwrap_or("");
        let has_command = options.get("command").is_some_and(|v| !v.is_null());
        let has_period = options
            .get("expected_update_period_in_days")
            .is_some_and(|v| !v.is_null());

        if path.trim().is_empty() || !has_command || !has_period {
            return Err(
                "the path, command, and expected_update_period_in_days fields are all required"
                    .to_string(),
            );
        }

        Ok(Self {
            path: PathBuf::from(path),
            command: parse_command(&options["command"])?,
            stdin: parse_stdin(options.get("stdin"))?,
            suppress_on_failure: parse_bool(options, "suppress_on_failure")?,
            suppress_on_empty_output: parse_bool(options, "suppress_on_empty_output")?,
            merge: parse_bool(options, "merge")?,
            expected_update_period_in_days: parse_period(
                &options["expected_update_period_in_days"],
            )?,
            timeout: parse_timeout(options.get("timeout"))?,
        })
    }

    /// Type-check an option map whose values may still hold placeholders.
    ///
    /// Boolean and timeout options that are templated can only be checked
    /// once an event has been interpolated into them, so they are skipped
    /// here and treated as unset.
    pub fn from_template(options: &Map<String, Value>) -> Result<Self, String> {
        let mut probe = options.clone();
        for key in DEFERRED_KEYS {
            if probe
                .get(key)
                .and_then(Value::as_str)
                .is_some_and(contains_placeholder)
            {
                probe.remove(key);
            }
        }
        Self::from_map(&probe)
    }

    pub fn command_spec(&self) -> CommandSpec {
        CommandSpec {
            program: self.command.clone(),
            working_dir: self.path.clone(),
            stdin: self.stdin.clone(),
        }
    }

    pub fn gate_policy(&self, spawn_failure_is_failure: bool) -> GatePolicy {
        GatePolicy {
            suppress_on_failure: self.suppress_on_failure,
            suppress_on_empty_output: self.suppress_on_empty_output,
            spawn_failure_is_failure,
        }
    }

    pub fn expected_update_period(&self) -> Duration {
        Duration::from_secs(u64::from(self.expected_update_period_in_days) * 24 * 60 * 60)
    }
}

fn parse_command(value: &Value) -> Result<Program, String> {
    const MSG: &str =
        "command must be a shell command line string or an array of command line arguments";

    let program: Program = serde_json::from_value(value.clone()).map_err(|_| MSG.to_string())?;
    if program.is_empty() {
        return Err(MSG.to_string());
    }
    Ok(program)
}

fn parse_stdin(value: Option<&Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err("stdin must be a string".to_string()),
    }
}

fn parse_bool(options: &Map<String, Value>, key: &str) -> Result<bool, String> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(format!("{key} must be a boolean (got \"{other}\")")),
        },
        Some(other) => Err(format!("{key} must be a boolean (got {other})")),
    }
}

fn parse_period(value: &Value) -> Result<u32, String> {
    let days = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match days.and_then(|d| u32::try_from(d).ok()) {
        Some(d) if d > 0 => Ok(d),
        _ => Err(format!(
            "expected_update_period_in_days must be a positive integer (got {value})"
        )),
    }
}

fn parse_timeout(value: Option<&Value>) -> Result<Option<Duration>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => parse_duration(s)
            .map(Some)
            .map_err(|e| format!("invalid timeout '{s}': {e}")),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(format!("timeout must be a positive number of seconds (got {n})")),
        },
        Some(other) => Err(format!("timeout must be a duration string like \"30s\" (got {other})")),
    }
}

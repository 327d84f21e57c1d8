// src/payload.rs

//! Packaging an execution result into an event payload.
//!
//! Every payload carries the same five keys (see [`RESERVED_KEYS`]). In merge
//! mode the caller's own option keys ride along, but never replace a reserved
//! key.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::command::CommandSpec;
use crate::exec::ExecutionResult;

pub const KEY_COMMAND: &str = "command";
pub const KEY_PATH: &str = "path";
pub const KEY_EXIT_STATUS: &str = "exit_status";
pub const KEY_ERRORS: &str = "errors";
pub const KEY_OUTPUT: &str = "output";

/// Keys always set by [`package`].
pub const RESERVED_KEYS: [&str; 5] = [
    KEY_COMMAND,
    KEY_PATH,
    KEY_EXIT_STATUS,
    KEY_ERRORS,
    KEY_OUTPUT,
];

/// Option keys that configure the agent itself and are therefore never
/// copied into a payload as extras.
pub const BUILT_IN_OPTION_KEYS: [&str; 8] = [
    "path",
    "command",
    "suppress_on_failure",
    "suppress_on_empty_output",
    "expected_update_period_in_days",
    "merge",
    "stdin",
    "timeout",
];

/// The structured record describing one command execution.
///
/// Serializes as its field map only; whether the run failed to spawn is kept
/// alongside for health tracking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventPayload {
    fields: Map<String, Value>,
    #[serde(skip)]
    spawn_failed: bool,
}

impl EventPayload {
    /// `None` when the field is JSON `null`: a spawn failure, or a child
    /// terminated by a signal.
    pub fn exit_status(&self) -> Option<i64> {
        self.fields.get(KEY_EXIT_STATUS).and_then(Value::as_i64)
    }

    /// True when the command never ran to completion (not found, bad working
    /// directory, timed out).
    pub fn is_spawn_failure(&self) -> bool {
        self.spawn_failed
    }

    pub fn output(&self) -> &str {
        self.str_field(KEY_OUTPUT)
    }

    pub fn errors(&self) -> &str {
        self.str_field(KEY_ERRORS)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    fn str_field(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

impl fmt::Display for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Build the payload for one run.
///
/// `extra` is only consulted in merge mode; pass `None` otherwise.
pub fn package(
    spec: &CommandSpec,
    result: &ExecutionResult,
    extra: Option<&Map<String, Value>>,
) -> EventPayload {
    let mut map = Map::new();

    map.insert(
        KEY_COMMAND.to_string(),
        serde_json::to_value(&spec.program).unwrap_or(Value::Null),
    );
    map.insert(
        KEY_PATH.to_string(),
        Value::String(spec.working_dir.to_string_lossy().into_owned()),
    );
    map.insert(
        KEY_EXIT_STATUS.to_string(),
        result.exit_status.map(Value::from).unwrap_or(Value::Null),
    );
    map.insert(KEY_ERRORS.to_string(), Value::String(result.errors().to_string()));
    map.insert(KEY_OUTPUT.to_string(), Value::String(result.stdout.clone()));

    if let Some(extra) = extra {
        for (key, value) in extra {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            map.insert(key.clone(), value.clone());
        }
    }

    EventPayload {
        fields: map,
        spawn_failed: result.is_spawn_failure(),
    }
}

/// The caller's option map minus every built-in option key.
pub fn extra_fields(options: &Map<String, Value>) -> Map<String, Value> {
    options
        .iter()
        .filter(|(key, _)| !BUILT_IN_OPTION_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

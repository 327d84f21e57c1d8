// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::options::AgentOptions;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// allow_execution = true
///
/// [agent.listing]
/// path = "/tmp"
/// command = ["ls", "-1"]
/// expected_update_period_in_days = 1
/// ```
///
/// Each `[agent.<name>]` table is kept as a loose option map: placeholders
/// inside it are only resolved when an event arrives, and in merge mode any
/// non built-in key is forwarded into the payload.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All agents from `[agent.<name>]`, keyed by agent name.
    #[serde(default)]
    pub agent: BTreeMap<String, Map<String, Value>>,
}

/// `[config]` section.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigSection {
    /// Master switch for running commands at all. Off unless the host opts
    /// in, either here or with `--allow-execution`.
    #[serde(default)]
    pub allow_execution: bool,

    /// Treat a spawn failure (no exit status) as a failed run for
    /// `suppress_on_failure`.
    #[serde(default)]
    pub spawn_failure_is_failure: bool,
}

/// One validated `[agent.<name>]` entry.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// The raw option map, placeholders unresolved.
    pub options: Map<String, Value>,

    /// Options as parsed at load time, see [`AgentOptions::from_template`].
    /// The agent re-parses them after each interpolation.
    pub parsed: AgentOptions,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub agent: BTreeMap<String, AgentConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        agent: BTreeMap<String, AgentConfig>,
    ) -> Self {
        Self { config, agent }
    }

    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agent.keys().map(String::as_str)
    }
}

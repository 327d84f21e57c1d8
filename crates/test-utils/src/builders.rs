#![allow(dead_code)]

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use shellevent::config::{ConfigFile, ConfigSection, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                agent: BTreeMap::new(),
            },
        }
    }

    pub fn with_agent(mut self, name: &str, options: Map<String, Value>) -> Self {
        self.config.agent.insert(name.to_string(), options);
        self
    }

    pub fn allow_execution(mut self, val: bool) -> Self {
        self.config.config.allow_execution = val;
        self
    }

    pub fn spawn_failure_is_failure(mut self, val: bool) -> Self {
        self.config.config.spawn_failure_is_failure = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one agent's option map.
pub struct AgentOptionsBuilder {
    options: Map<String, Value>,
}

impl AgentOptionsBuilder {
    /// `command` may be a string (shell line) or an array (argv).
    pub fn new(path: &str, command: Value) -> Self {
        let mut options = Map::new();
        options.insert("path".into(), json!(path));
        options.insert("command".into(), command);
        options.insert("expected_update_period_in_days".into(), json!(1));
        Self { options }
    }

    pub fn shell(path: &str, line: &str) -> Self {
        Self::new(path, json!(line))
    }

    pub fn argv(path: &str, argv: &[&str]) -> Self {
        Self::new(path, json!(argv))
    }

    pub fn stdin(self, text: &str) -> Self {
        self.set("stdin", json!(text))
    }

    pub fn suppress_on_failure(self, val: bool) -> Self {
        self.set("suppress_on_failure", json!(val))
    }

    pub fn suppress_on_empty_output(self, val: bool) -> Self {
        self.set("suppress_on_empty_output", json!(val))
    }

    pub fn merge(self, val: bool) -> Self {
        self.set("merge", json!(val))
    }

    pub fn timeout(self, duration: &str) -> Self {
        self.set("timeout", json!(duration))
    }

    pub fn expected_update_period_in_days(self, days: u32) -> Self {
        self.set("expected_update_period_in_days", json!(days))
    }

    /// Any other key; rides along in merge mode.
    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Map<String, Value> {
        self.options
    }
}

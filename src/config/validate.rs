// src/config/validate.rs

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::model::{AgentConfig, ConfigFile, RawConfigFile};
use crate::config::options::AgentOptions;
use crate::errors::{Result, ShellEventError};
use crate::interpolate::contains_placeholder;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ShellEventError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_agents(&raw)?;

        let mut agents = BTreeMap::new();
        for (name, options) in raw.agent {
            let parsed = validate_agent(&name, &options)?;
            agents.insert(name, AgentConfig { options, parsed });
        }

        Ok(ConfigFile::new_unchecked(raw.config, agents))
    }
}

/// Validate an already-loaded config again, e.g. after it was edited in
/// place by a test or a host.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    for (name, agent) in cfg.agent.iter() {
        validate_agent(name, &agent.options)?;
    }
    Ok(())
}

fn ensure_has_agents(cfg: &RawConfigFile) -> Result<()> {
    if cfg.agent.is_empty() {
        return Err(ShellEventError::ConfigError(
            "config must contain at least one [agent.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_agent(
    name: &str,
    options: &serde_json::Map<String, serde_json::Value>,
) -> Result<AgentOptions> {
    let parsed = AgentOptions::from_template(options)
        .map_err(|msg| ShellEventError::ConfigError(format!("agent '{name}': {msg}")))?;

    validate_directory(name, &parsed.path)?;

    Ok(parsed)
}

/// The working directory must exist, unless it is only known once an event
/// has been interpolated into it.
fn validate_directory(name: &str, path: &Path) -> Result<()> {
    let raw = path.to_string_lossy();
    if contains_placeholder(&raw) {
        return Ok(());
    }

    if !path.is_dir() {
        return Err(ShellEventError::ConfigError(format!(
            "agent '{name}': {raw} is not a real directory"
        )));
    }
    Ok(())
}

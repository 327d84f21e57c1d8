// src/agent/mod.rs

//! A configured shell agent: resolves its options against an incoming event,
//! runs the command, packages the result and applies the emission gate.
//!
//! Whether execution is permitted at all is decided by the host and handed
//! in at construction; the agent never reads process-wide state for it.

pub mod health;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::{AgentConfig, AgentOptions, ConfigFile};
use crate::errors::{Result, ShellEventError};
use crate::exec::ProcessRunner;
use crate::gate::should_emit_with;
use crate::interpolate::interpolate_options;
use crate::payload::{EventPayload, extra_fields, package};

pub use health::AgentHealth;

/// What happened when an agent handled one event.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// The payload passed the gate and should be published.
    Emitted(EventPayload),
    /// The command ran but the gate held the payload back.
    Suppressed(EventPayload),
    /// Execution is disabled for this host; nothing ran.
    Disabled,
}

impl AgentOutcome {
    pub fn payload(&self) -> Option<&EventPayload> {
        match self {
            AgentOutcome::Emitted(p) | AgentOutcome::Suppressed(p) => Some(p),
            AgentOutcome::Disabled => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellAgent {
    name: String,
    config: AgentConfig,
    execution_enabled: bool,
    spawn_failure_is_failure: bool,
}

impl ShellAgent {
    pub fn new(name: impl Into<String>, config: AgentConfig, execution_enabled: bool) -> Self {
        Self {
            name: name.into(),
            config,
            execution_enabled,
            spawn_failure_is_failure: false,
        }
    }

    pub fn spawn_failure_is_failure(mut self, value: bool) -> Self {
        self.spawn_failure_is_failure = value;
        self
    }

    /// Build every agent in `cfg`.
    pub fn all_from_config(cfg: &ConfigFile, execution_enabled: bool) -> Vec<ShellAgent> {
        cfg.agent
            .iter()
            .map(|(name, agent)| {
                ShellAgent::new(name, agent.clone(), execution_enabled)
                    .spawn_failure_is_failure(cfg.config.spawn_failure_is_failure)
            })
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &AgentOptions {
        &self.config.parsed
    }

    /// Handle one incoming event. Pass an empty object for a scheduled check.
    ///
    /// Errors only when the options no longer type-check after the event was
    /// interpolated into them; a command that fails to run is still an
    /// outcome.
    pub async fn handle(&self, event: &Value) -> Result<AgentOutcome> {
        if !self.execution_enabled {
            warn!(
                agent = %self.name,
                "unable to run because command execution is not enabled; \
                 set [config].allow_execution or pass --allow-execution"
            );
            return Ok(AgentOutcome::Disabled);
        }

        let resolved = interpolate_options(&self.config.options, event);
        let opts = AgentOptions::from_map(&resolved).map_err(|msg| {
            ShellEventError::ConfigError(format!(
                "agent '{}': options invalid after interpolation: {msg}",
                self.name
            ))
        })?;

        let spec = opts.command_spec();
        let result = ProcessRunner::with_timeout(opts.timeout).run(&spec).await;

        info!(
            agent = %self.name,
            command = %spec.program,
            path = ?spec.working_dir,
            exit_status = ?result.exit_status,
            "ran command"
        );

        let extras = opts.merge.then(|| extra_fields(&resolved));
        let payload = package(&spec, &result, extras.as_ref());

        if should_emit_with(&payload, &opts.gate_policy(self.spawn_failure_is_failure)) {
            info!(agent = %self.name, payload = %payload, "emitting event");
            Ok(AgentOutcome::Emitted(payload))
        } else {
            info!(agent = %self.name, payload = %payload, "suppressed event");
            Ok(AgentOutcome::Suppressed(payload))
        }
    }
}

// src/agent/health.rs

//! "Is this agent working?" bookkeeping.
//!
//! An agent counts as working when it emitted an event within its expected
//! update period and its most recent run did not fail to spawn.

use std::time::{Duration, Instant};

use crate::agent::AgentOutcome;

#[derive(Debug, Clone)]
pub struct AgentHealth {
    expected_period: Duration,
    last_emitted: Option<Instant>,
    last_run_errored: bool,
}

impl AgentHealth {
    pub fn new(expected_period: Duration) -> Self {
        Self {
            expected_period,
            last_emitted: None,
            last_run_errored: false,
        }
    }

    /// Record the outcome of a run that finished at `now`.
    pub fn record(&mut self, outcome: &AgentOutcome, now: Instant) {
        match outcome {
            AgentOutcome::Emitted(payload) => {
                self.last_emitted = Some(now);
                self.last_run_errored = payload.is_spawn_failure();
            }
            AgentOutcome::Suppressed(payload) => {
                self.last_run_errored = payload.is_spawn_failure();
            }
            AgentOutcome::Disabled => {}
        }
    }

    /// Record a run that could not even be attempted (e.g. its options were
    /// invalid after interpolation).
    pub fn record_error(&mut self) {
        self.last_run_errored = true;
    }

    pub fn last_emitted(&self) -> Option<Instant> {
        self.last_emitted
    }

    pub fn is_working(&self, now: Instant) -> bool {
        let recent = self
            .last_emitted
            .is_some_and(|at| now.saturating_duration_since(at) <= self.expected_period);
        recent && !self.last_run_errored
    }
}

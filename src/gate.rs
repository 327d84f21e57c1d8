// src/gate.rs

//! Emission gate: decides whether a packaged payload is published.

use crate::payload::EventPayload;

/// Suppression flags for one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatePolicy {
    /// Suppress when the command exited with a non-zero status.
    pub suppress_on_failure: bool,
    /// Suppress when the command produced no stdout.
    pub suppress_on_empty_output: bool,
    /// Count a missing exit status (spawn failure) as a failure for
    /// `suppress_on_failure`. Off by default.
    pub spawn_failure_is_failure: bool,
}

/// Returns `false` if either suppression rule matches.
///
/// A payload without an exit status never trips `suppress_on_failure` here;
/// use [`should_emit_with`] to change that.
pub fn should_emit(
    payload: &EventPayload,
    suppress_on_failure: bool,
    suppress_on_empty_output: bool,
) -> bool {
    should_emit_with(
        payload,
        &GatePolicy {
            suppress_on_failure,
            suppress_on_empty_output,
            spawn_failure_is_failure: false,
        },
    )
}

pub fn should_emit_with(payload: &EventPayload, policy: &GatePolicy) -> bool {
    let failed = match payload.exit_status() {
        Some(code) => code != 0,
        None => policy.spawn_failure_is_failure,
    };

    if policy.suppress_on_failure && failed {
        return false;
    }

    if policy.suppress_on_empty_output && payload.output().is_empty() {
        return false;
    }

    true
}

// src/engine/runtime.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::agent::{AgentHealth, AgentOutcome, ShellAgent};
use crate::errors::{Error, Result};
use crate::sink::EventSink;

use super::events::parse_event_line;

/// Feeds events to every agent and publishes what passes the gate.
///
/// For each event all agents run concurrently; the next event is only taken
/// once every agent has finished with the current one. Emitted payloads are
/// published in agent order, not completion order.
pub struct Runtime<S: EventSink> {
    agents: Vec<Arc<ShellAgent>>,
    health: BTreeMap<String, AgentHealth>,
    sink: S,
}

impl<S: EventSink> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("agents", &self.agents.iter().map(|a| a.name()).collect::<Vec<_>>())
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}

impl<S: EventSink> Runtime<S> {
    pub fn new(agents: Vec<ShellAgent>, sink: S) -> Self {
        let health = agents
            .iter()
            .map(|a| {
                (
                    a.name().to_string(),
                    AgentHealth::new(a.options().expected_update_period()),
                )
            })
            .collect();

        Self {
            agents: agents.into_iter().map(Arc::new).collect(),
            health,
            sink,
        }
    }

    /// A single scheduled run of every agent against an empty event.
    pub async fn run_check(&mut self) -> Result<Vec<(String, AgentOutcome)>> {
        info!(agents = self.agents.len(), "running check");
        self.dispatch(Value::Object(Map::new())).await
    }

    /// Read newline-delimited JSON events until EOF and dispatch each one.
    ///
    /// Returns the number of events dispatched.
    pub async fn run_events<R>(&mut self, reader: R) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("shellevent runtime started");

        let mut lines = reader.split(b'\n');
        let mut line_no = 0usize;
        let mut dispatched = 0usize;

        while let Some(raw) = lines.next_segment().await? {
            line_no += 1;
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    warn!(line = line_no, error = %e, "event is not valid UTF-8; skipping");
                    continue;
                }
            };
            let Some(event) = parse_event_line(&line, line_no) else {
                continue;
            };

            debug!(line = line_no, "runtime received event");
            self.dispatch(event).await?;
            dispatched += 1;
        }

        info!(events = dispatched, "event stream closed; runtime exiting");
        Ok(dispatched)
    }

    /// Run every agent against `event` and publish emitted payloads.
    pub async fn dispatch(&mut self, event: Value) -> Result<Vec<(String, AgentOutcome)>> {
        let event = Arc::new(event);
        let mut set = JoinSet::new();

        for (idx, agent) in self.agents.iter().enumerate() {
            let agent = Arc::clone(agent);
            let event = Arc::clone(&event);
            set.spawn(async move { (idx, agent.handle(&event).await) });
        }

        let mut slots: Vec<Option<Result<AgentOutcome>>> =
            (0..self.agents.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            let (idx, outcome) = joined.map_err(Error::from)?;
            slots[idx] = Some(outcome);
        }

        let now = Instant::now();
        let mut outcomes = Vec::with_capacity(slots.len());

        for (agent, slot) in self.agents.iter().zip(slots) {
            let name = agent.name().to_string();
            let health = self.health.get_mut(&name);

            match slot {
                Some(Ok(outcome)) => {
                    if let Some(h) = health {
                        h.record(&outcome, now);
                    }
                    if let AgentOutcome::Emitted(payload) = &outcome {
                        self.sink.publish(&name, payload.clone()).await?;
                    }
                    outcomes.push((name, outcome));
                }
                Some(Err(err)) => {
                    error!(agent = %name, error = %err, "agent could not handle event");
                    if let Some(h) = health {
                        h.record_error();
                    }
                }
                None => {
                    warn!(agent = %name, "agent produced no outcome");
                }
            }
        }

        Ok(outcomes)
    }

    pub fn health(&self, agent: &str) -> Option<&AgentHealth> {
        self.health.get(agent)
    }

    /// Names of agents that are not working as of `now`.
    pub fn unhealthy_agents(&self, now: Instant) -> Vec<&str> {
        self.health
            .iter()
            .filter(|(_, h)| !h.is_working(now))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

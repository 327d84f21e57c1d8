// src/engine/events.rs

//! Incoming event stream: one JSON object per line.

use serde_json::Value;
use tracing::warn;

/// Parse one line of the event stream.
///
/// Blank lines are skipped silently; malformed lines and non-object values
/// are logged and skipped so one bad event doesn't stop the stream.
pub fn parse_event_line(line: &str, line_no: usize) -> Option<Value> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(line) {
        Ok(value @ Value::Object(_)) => Some(value),
        Ok(other) => {
            warn!(line = line_no, value = %other, "event is not a JSON object; skipping");
            None
        }
        Err(e) => {
            warn!(line = line_no, error = %e, "malformed event JSON; skipping");
            None
        }
    }
}

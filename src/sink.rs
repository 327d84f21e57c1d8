// src/sink.rs

//! Pluggable destination for emitted payloads.
//!
//! The dispatcher talks to an `EventSink` instead of writing to stdout
//! directly. This makes it easy to swap in a collecting sink in tests while
//! keeping the production implementation in [`StdoutSink`].

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

use crate::errors::Result;
use crate::payload::EventPayload;

/// Trait abstracting where emitted payloads go.
pub trait EventSink: Send {
    /// Publish one payload produced by `agent`.
    fn publish(
        &mut self,
        agent: &str,
        payload: EventPayload,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Writes each payload as one line of JSON.
pub struct JsonLinesSink<W> {
    out: W,
}

/// Production sink: JSON lines on stdout. Logs go to stderr, so stdout
/// carries nothing but payloads.
pub type StdoutSink = JsonLinesSink<Stdout>;

impl StdoutSink {
    pub fn stdout() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl<W> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: AsyncWrite + Unpin + Send> EventSink for JsonLinesSink<W> {
    fn publish(
        &mut self,
        _agent: &str,
        payload: EventPayload,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut line = serde_json::to_vec(&payload)?;
            line.push(b'\n');
            self.out.write_all(&line).await?;
            self.out.flush().await?;
            Ok(())
        })
    }
}

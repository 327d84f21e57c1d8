use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use shellevent::errors::Result;
use shellevent::payload::EventPayload;
use shellevent::sink::EventSink;

/// A fake sink that records every published payload together with the name
/// of the agent that produced it.
#[derive(Clone, Default)]
pub struct CollectingSink {
    published: Arc<Mutex<Vec<(String, EventPayload)>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn published(&self) -> Vec<(String, EventPayload)> {
        self.published.lock().unwrap().clone()
    }

    pub fn agents(&self) -> Vec<String> {
        self.published().into_iter().map(|(name, _)| name).collect()
    }
}

impl EventSink for CollectingSink {
    fn publish(
        &mut self,
        agent: &str,
        payload: EventPayload,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let agent = agent.to_string();
        let published = Arc::clone(&self.published);

        Box::pin(async move {
            published.lock().unwrap().push((agent, payload));
            Ok(())
        })
    }
}

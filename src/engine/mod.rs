// src/engine/mod.rs

//! Host runtime for shellevent.
//!
//! This module ties together:
//! - the configured agents
//! - the incoming event stream (or a single check run)
//! - the event sink that receives emitted payloads
//! - per-agent health bookkeeping
//!
//! Line parsing lives in [`events`]; the async loop is in [`runtime`].

pub mod events;
pub mod runtime;

pub use runtime::Runtime;

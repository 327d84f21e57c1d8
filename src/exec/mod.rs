// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running commands using
//! `tokio::process::Command` and turning whatever happened into an
//! [`ExecutionResult`].
//!
//! - [`runner`] owns the [`ProcessRunner`] and the concurrent pipe pumping.

pub mod runner;

pub use runner::{ExecutionResult, ProcessRunner, run};

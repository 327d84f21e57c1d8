// src/config/mod.rs

//! Configuration loading and validation for shellevent.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Type-check an agent's option map (`options.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate agents on load (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod options;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{AgentConfig, ConfigFile, ConfigSection, RawConfigFile};
pub use options::AgentOptions;
pub use validate::validate_config;

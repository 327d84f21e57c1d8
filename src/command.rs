// src/command.rs

//! Normalized description of what to run.
//!
//! A command is either a single shell line (run through the platform shell)
//! or an argument vector (exec'd directly, no shell). The two shapes are never
//! mixed; the runner branches on the variant.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The program part of a [`CommandSpec`].
///
/// Deserializes from either a string or an array of strings, and serializes
/// back into the same shape so the payload's `command` key mirrors what the
/// caller configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Program {
    /// `sh -c <line>` on unix, `cmd /C <line>` on windows.
    ShellLine(String),
    /// `argv[0]` exec'd with the remaining tokens as arguments.
    ArgVector(Vec<String>),
}

impl Program {
    /// True if there is nothing to run (blank line or empty argv).
    pub fn is_empty(&self) -> bool {
        match self {
            Program::ShellLine(line) => line.trim().is_empty(),
            Program::ArgVector(argv) => argv.is_empty(),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::ShellLine(line) => f.write_str(line),
            Program::ArgVector(argv) => f.write_str(&argv.join(" ")),
        }
    }
}

impl From<&str> for Program {
    fn from(line: &str) -> Self {
        Program::ShellLine(line.to_string())
    }
}

impl From<Vec<String>> for Program {
    fn from(argv: Vec<String>) -> Self {
        Program::ArgVector(argv)
    }
}

/// A fully resolved command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: Program,
    pub working_dir: PathBuf,
    /// `None` closes the child's input immediately.
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<Program>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }
}

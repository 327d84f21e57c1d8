// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `shellevent`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shellevent",
    version,
    about = "Run shell commands and publish their results as JSON events.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Shellevent.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Shellevent.toml")]
    pub config: String,

    /// Run only the agent with this name.
    #[arg(long, value_name = "NAME")]
    pub agent: Option<String>,

    /// Read newline-delimited JSON events from this file (`-` for stdin)
    /// and run the agents once per event.
    ///
    /// Without this flag every agent runs once against an empty event.
    #[arg(long, value_name = "PATH")]
    pub events: Option<String>,

    /// Permit command execution even if `[config].allow_execution` is false.
    #[arg(long)]
    pub allow_execution: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SHELLEVENT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the agents, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["shellevent"]).unwrap();
        assert_eq!(args.config, "Shellevent.toml");
        assert!(args.agent.is_none());
        assert!(args.events.is_none());
        assert!(!args.allow_execution);
        assert!(!args.dry_run);
    }

    #[test]
    fn parses_all_flags() {
        let args = CliArgs::try_parse_from([
            "shellevent",
            "--config",
            "cfg.toml",
            "--agent",
            "listing",
            "--events",
            "-",
            "--allow-execution",
            "--log-level",
            "debug",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.config, "cfg.toml");
        assert_eq!(args.agent.as_deref(), Some("listing"));
        assert_eq!(args.events.as_deref(), Some("-"));
        assert!(args.allow_execution);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.dry_run);
    }
}

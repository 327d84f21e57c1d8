// src/lib.rs

pub mod agent;
pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod gate;
pub mod interpolate;
pub mod logging;
pub mod payload;
pub mod sink;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info, warn};

use crate::agent::ShellAgent;
use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::engine::Runtime;
use crate::errors::ShellEventError;
use crate::sink::StdoutSink;

pub use crate::command::{CommandSpec, Program};
pub use crate::exec::{ExecutionResult, ProcessRunner};
pub use crate::gate::{GatePolicy, should_emit, should_emit_with};
pub use crate::payload::{EventPayload, extra_fields, package};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - agent selection and the execution switch
/// - the event source (single check run or JSON lines)
/// - the stdout sink
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let execution_enabled = args.allow_execution || cfg.config.allow_execution;
    if !execution_enabled {
        warn!("command execution is disabled; agents will not run");
    }

    let agents = select_agents(&cfg, args.agent.as_deref(), execution_enabled)?;
    info!(
        agents = ?agents.iter().map(|a| a.name()).collect::<Vec<_>>(),
        "agents selected"
    );

    let mut runtime = Runtime::new(agents, StdoutSink::stdout());

    match args.events.as_deref() {
        None => {
            runtime.run_check().await?;
        }
        Some(source) => {
            let reader = open_events(source).await?;
            runtime.run_events(reader).await?;
        }
    }

    for name in runtime.unhealthy_agents(Instant::now()) {
        info!(agent = %name, "agent is not working: no successful event within its expected update period");
    }

    Ok(())
}

/// Build the agents to run: all of them, or just `only`.
pub fn select_agents(
    cfg: &ConfigFile,
    only: Option<&str>,
    execution_enabled: bool,
) -> errors::Result<Vec<ShellAgent>> {
    let agents = ShellAgent::all_from_config(cfg, execution_enabled);

    let Some(name) = only else {
        return Ok(agents);
    };

    let selected: Vec<ShellAgent> = agents.into_iter().filter(|a| a.name() == name).collect();
    if selected.is_empty() {
        return Err(ShellEventError::AgentNotFound(name.to_string()));
    }
    Ok(selected)
}

async fn open_events(source: &str) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if source == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let path = Path::new(source);
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening event stream {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Simple dry-run output: print agents and what they would run.
fn print_dry_run(cfg: &ConfigFile) {
    println!("shellevent dry-run");
    println!("  config.allow_execution = {}", cfg.config.allow_execution);
    println!(
        "  config.spawn_failure_is_failure = {}",
        cfg.config.spawn_failure_is_failure
    );
    println!();

    println!("agents ({}):", cfg.agent.len());
    for (name, agent) in cfg.agent.iter() {
        let opts = &agent.parsed;
        println!("  - {name}");
        println!("      command: {}", opts.command);
        println!("      path: {}", opts.path.display());
        if let Some(ref stdin) = opts.stdin {
            println!("      stdin: {} bytes", stdin.len());
        }
        if opts.suppress_on_failure {
            println!("      suppress_on_failure: true");
        }
        if opts.suppress_on_empty_output {
            println!("      suppress_on_empty_output: true");
        }
        if opts.merge {
            println!("      merge: true");
        }
        if let Some(timeout) = opts.timeout {
            println!("      timeout: {timeout:?}");
        }
        println!(
            "      expected_update_period_in_days: {}",
            opts.expected_update_period_in_days
        );
    }

    debug!("dry-run complete (no execution)");
}

// comment-gate-cli/src/main.rs
// ============================================================================
// Module: Comment Gate CLI Entry Point
// Description: Command dispatcher for offline comment policy evaluation.
// Purpose: Inspect rules, preview hints, and simulate save gating from files.
// Dependencies: clap, comment-gate-config, comment-gate-core, serde, tokio.
// ============================================================================

//! ## Overview
//! The Comment Gate CLI runs the same engine the host integration uses
//! against a ticket snapshot file. The `gate` command simulates a save
//! against an in-memory ticket, so autofix mutations are visible in the
//! printed ticket state. Inputs are untrusted and read with size limits.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use comment_gate_config::CommentGateConfig;
use comment_gate_config::config_toml_example;
use comment_gate_core::CommentPolicyEngine;
use comment_gate_core::CommentRule;
use comment_gate_core::GateDecision;
use comment_gate_core::InMemoryHostClient;
use comment_gate_core::Notice;
use comment_gate_core::PolicySettings;
use comment_gate_core::TicketSnapshot;
use comment_gate_core::Verdict;
use comment_gate_core::evaluate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a ticket snapshot JSON input.
const MAX_SNAPSHOT_BYTES: usize = 1024 * 1024;
/// Exit code reported when a simulated save is denied.
const EXIT_DENIED: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "comment-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the rule derived from the configured settings.
    Rule(ConfigArgs),
    /// Evaluate a ticket snapshot and show the hint an agent would see.
    Check(SnapshotArgs),
    /// Simulate a save attempt against a ticket snapshot.
    Gate(SnapshotArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration file selection.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Path to comment-gate.toml (defaults to `COMMENT_GATE_CONFIG` or ./comment-gate.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for snapshot-driven commands.
#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Ticket snapshot JSON keyed by host field name.
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,
    /// Configuration file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigArgs),
    /// Print a canonical example configuration.
    Example,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Output of the `rule` command.
#[derive(Debug, Serialize)]
struct RuleReport {
    /// Resolved settings.
    settings: PolicySettings,
    /// Derived rule.
    rule: CommentRule,
}

/// Output of the `check` command.
#[derive(Debug, Serialize)]
struct CheckReport {
    /// Evaluation verdict.
    verdict: Verdict,
    /// Hint that would be shown, if any.
    hint: Option<Notice>,
}

/// Output of the `gate` command.
#[derive(Debug, Serialize)]
struct GateReport {
    /// Save decision.
    decision: GateDecision,
    /// Ticket state after the attempt.
    ticket: TicketSnapshot,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("comment-gate {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        write_stdout_line("usage: comment-gate <rule|check|gate|config> [--help]")
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Rule(args) => command_rule(&args),
        Commands::Check(args) => command_check(&args).await,
        Commands::Gate(args) => command_gate(&args).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `rule` command.
fn command_rule(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    let settings = resolve_settings(&config)?;
    let engine = CommentPolicyEngine::with_settings(InMemoryHostClient::default(), settings);
    write_json(&RuleReport {
        settings: engine.settings().clone(),
        rule: engine.rule(),
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `check` command.
async fn command_check(args: &SnapshotArgs) -> CliResult<ExitCode> {
    let engine = build_engine(args)?;
    let snapshot = engine.host().snapshot();
    let verdict = evaluate(&engine.rule(), &snapshot);
    let hint = engine.advise().await;
    write_json(&CheckReport {
        verdict,
        hint,
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `gate` command.
async fn command_gate(args: &SnapshotArgs) -> CliResult<ExitCode> {
    let engine = build_engine(args)?;
    let decision = engine.check_save().await;
    let code = if decision.is_allow() { ExitCode::SUCCESS } else { ExitCode::from(EXIT_DENIED) };
    write_json(&GateReport {
        decision,
        ticket: engine.host().snapshot(),
    })?;
    Ok(code)
}

/// Executes `config` subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => {
            let config = load_config(&args)?;
            resolve_settings(&config)?;
            write_stdout_line("config ok")
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration for a command.
fn load_config(args: &ConfigArgs) -> CliResult<CommentGateConfig> {
    CommentGateConfig::discover(args.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Resolves policy settings from configuration.
fn resolve_settings(config: &CommentGateConfig) -> CliResult<PolicySettings> {
    config
        .resolve_settings()
        .map_err(|err| CliError::new(format!("failed to resolve settings: {err}")))
}

/// Builds an engine over an in-memory ticket loaded from the snapshot file.
fn build_engine(args: &SnapshotArgs) -> CliResult<CommentPolicyEngine<InMemoryHostClient>> {
    let config = load_config(&args.config)?;
    let settings = resolve_settings(&config)?;
    let audit = config
        .build_audit_sink()
        .map_err(|err| CliError::new(format!("failed to open audit sink: {err}")))?;
    let fields = read_snapshot_fields(&args.snapshot)?;
    let host = InMemoryHostClient::from_fields(fields);
    Ok(CommentPolicyEngine::with_settings(host, settings).with_audit(audit))
}

/// Reads ticket fields from a snapshot file.
fn read_snapshot_fields(path: &Path) -> CliResult<BTreeMap<String, Value>> {
    let bytes = read_bytes_with_limit(path, MAX_SNAPSHOT_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read snapshot {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!("snapshot is {size} bytes; limit is {limit}")),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("snapshot must be a JSON object: {err}")))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to render output: {err}")))?;
    rendered.push('\n');
    write_stdout_bytes(rendered.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream error message.
fn output_error(stream: &str, err: &std::io::Error) -> String {
    format!("failed to write {stream}: {err}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

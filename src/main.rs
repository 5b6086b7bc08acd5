//! Binary entry point for the tugaccess CLI.
//!
//! ## Usage
//!
//! ```bash
//! # List the visibility changes offered for declaration 3
//! tugaccess suggest --tree outline.json --node 3
//!
//! # Make it internal and save the outline
//! tugaccess apply --tree outline.json --node 3 --to internal --write
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tugaccess::cli::{run_apply, run_suggest};
use tugaccess::csharp::ops::AdvisorOptions;
use tugaccess_core::error::{AccessError, OutputErrorCode};
use tugaccess_core::output::{emit_response, ErrorResponse, SuggestResponse};
use tugaccess_core::visibility::Visibility;

// ============================================================================
// CLI Structure
// ============================================================================

/// Visibility refactoring for C# declarations.
///
/// Reads a declaration outline, lists the accessibility changes that are
/// valid for one declaration, and applies them. Output is JSON by default.
#[derive(Parser, Debug)]
#[command(
    name = "tugaccess",
    version,
    about = "Visibility refactoring for C# declarations"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for suggest command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum SuggestFormat {
    /// Full JSON response (default).
    #[default]
    Json,
    /// One action label per line.
    Text,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List the visibility changes offered for a declaration.
    Suggest {
        /// Declaration outline (JSON).
        #[arg(long)]
        tree: PathBuf,
        /// Id of the declaration.
        #[arg(long)]
        node: u32,
        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: SuggestFormat,
        /// Also offer `protected internal` for top-level declarations.
        #[arg(long)]
        top_level_protected_internal: bool,
    },
    /// Change the visibility of a declaration.
    Apply {
        /// Declaration outline (JSON).
        #[arg(long)]
        tree: PathBuf,
        /// Id of the declaration.
        #[arg(long)]
        node: u32,
        /// Target visibility (e.g. `internal`, `protected-internal`).
        #[arg(long, value_parser = parse_visibility)]
        to: Visibility,
        /// Save the rewritten outline back to `--tree`.
        #[arg(long)]
        write: bool,
        /// Also offer `protected internal` for top-level declarations.
        #[arg(long)]
        top_level_protected_internal: bool,
    },
}

/// Parse a visibility argument.
fn parse_visibility(s: &str) -> Result<Visibility, String> {
    s.parse::<Visibility>().map_err(|e| e.to_string())
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like successful responses.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), AccessError> {
    match cli.command {
        Command::Suggest {
            tree,
            node,
            format,
            top_level_protected_internal,
        } => {
            let options = AdvisorOptions {
                top_level_protected_internal,
            };
            let response = run_suggest(&tree, node, &options)?;
            match format {
                SuggestFormat::Json => emit(&response),
                SuggestFormat::Text => emit_labels(&response),
            }
        }
        Command::Apply {
            tree,
            node,
            to,
            write,
            top_level_protected_internal,
        } => {
            let options = AdvisorOptions {
                top_level_protected_internal,
            };
            let response = run_apply(&tree, node, to, &options, write)?;
            emit(&response)
        }
    }
}

// ============================================================================
// Output
// ============================================================================

fn emit<T: serde::Serialize>(response: &T) -> Result<(), AccessError> {
    emit_response(response, &mut io::stdout()).map_err(|e| AccessError::internal(e.to_string()))?;
    let _ = io::stdout().flush();
    Ok(())
}

fn emit_labels(response: &SuggestResponse) -> Result<(), AccessError> {
    let mut out = io::stdout().lock();
    write_labels(response, &mut out).map_err(|e| AccessError::internal(e.to_string()))?;
    let _ = out.flush();
    Ok(())
}

fn write_labels<W: Write>(response: &SuggestResponse, out: &mut W) -> io::Result<()> {
    for action in &response.actions {
        writeln!(out, "{}", action.label)?;
    }
    Ok(())
}

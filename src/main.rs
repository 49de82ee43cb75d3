// console-attach - main.rs
//
// Demo entry point. Built as a GUI-subsystem executable in release builds,
// so Windows starts it without a console; the shim then attaches to the
// console of whatever launched it. Handles:
// 1. CLI argument parsing
// 2. Config loading and output-mode resolution
// 3. Logging initialisation (debug mode support)
// 4. Writing the requested lines through the shim

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use console_attach::platform::config::{load_config, PlatformPaths};
use console_attach::util::{constants, error::ShimError, logging};
use console_attach::{ConsoleShim, OutputMode};
use std::path::PathBuf;

/// console-attach - write lines to the parent console from a GUI-subsystem
/// process.
///
/// Each TEXT value is written as its own line. With --template, the values
/// are substituted into the template ("{0} of {1}") and written as one line.
#[derive(Parser, Debug)]
#[command(name = "console-attach", version, about)]
struct Cli {
    /// Lines to write, or template arguments when --template is given.
    text: Vec<String>,

    /// Positional template; TEXT values fill {0}, {1}, ...
    #[arg(short = 't', long = "template")]
    template: Option<String>,

    /// Output mode: "debug" (trace sink, no attachment) or "release".
    #[arg(short = 'm', long = "mode")]
    mode: Option<String>,

    /// Also write a summary of the console attachment.
    #[arg(short = 's', long = "status")]
    status: bool,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_dir);
    let (config, config_warnings) = load_config(&config_dir);

    let (mode, mode_warnings) = match resolve_mode(&cli, config.mode) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    // The shim must exist before anything writes to stderr so diagnostics
    // land on the attached console.
    let shim = ConsoleShim::new(mode);
    shim.ensure_console_attached();
    let installed = console_attach::install(shim).is_ok();

    logging::init(cli.debug, config.log_level.as_deref());

    if !installed {
        tracing::warn!("Console shim already installed; keeping the existing instance");
    }

    for warning in config_warnings.iter().chain(&mode_warnings) {
        tracing::warn!(warning = %warning, "Startup warning");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        mode = %mode,
        console_enabled = console_attach::is_console_enabled(),
        "console-attach starting"
    );

    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "Failed to write output");
        std::process::exit(1);
    }
}

/// An explicit `--mode` must be valid; the environment and config file are
/// allowed to fall through to the next source.
fn resolve_mode(
    cli: &Cli,
    config_mode: Option<OutputMode>,
) -> Result<(OutputMode, Vec<String>), ShimError> {
    if let Some(ref value) = cli.mode {
        return Ok((value.parse::<OutputMode>()?, Vec::new()));
    }
    let env_mode = std::env::var(constants::MODE_ENV_VAR).ok();
    Ok(OutputMode::resolve(None, env_mode.as_deref(), config_mode))
}

fn run(cli: &Cli) -> Result<(), ShimError> {
    match (&cli.template, cli.text.as_slice()) {
        (Some(template), values) => {
            let args: Vec<&dyn std::fmt::Display> =
                values.iter().map(|v| v as &dyn std::fmt::Display).collect();
            console_attach::write_line_format(template, &args)?;
        }
        (None, []) => console_attach::write_line!(),
        (None, lines) => {
            for line in lines {
                console_attach::write_line_str(line);
            }
        }
    }

    if cli.status {
        write_status();
    }
    Ok(())
}

fn write_status() {
    match console_attach::ensure_console_attached() {
        None => console_attach::write_line_str("console: not attached (debug mode)"),
        Some(report) if !report.platform_supported => {
            console_attach::write_line_str("console: native streams (no attachment needed)")
        }
        Some(report) => console_attach::write_line_args(format_args!(
            "console: parent attached={} stdout redirected={} stderr redirected={} stderr unified={}",
            report.parent_console_attached,
            report.output_redirected,
            report.error_redirected,
            report.error_unified,
        )),
    }
}

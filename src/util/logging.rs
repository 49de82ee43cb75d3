// console-attach - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug (sets the filter to debug)
//   - Config file: [logging] level = "debug"
//
// Output: stderr. Once the console shim has attached, stderr is whichever
// stream the shim unified it with, so diagnostics land next to the program's
// own output in the parent terminal.

use tracing_subscriber::EnvFilter;

/// Pick the filter directive string.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
/// Returns `None` when RUST_LOG should be used as-is. Otherwise the debug
/// sink's target is always enabled so debug-mode lines show up under any
/// base level.
fn filter_directive(
    rust_log_set: bool,
    debug_flag: bool,
    config_level: Option<&str>,
) -> Option<String> {
    if rust_log_set {
        return None;
    }
    let base = if debug_flag {
        "debug"
    } else {
        config_level.unwrap_or(super::constants::DEFAULT_LOG_LEVEL)
    };
    Some(format!("{base},{}=debug", super::constants::TRACE_SINK_TARGET))
}

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
///
/// Safe to call more than once: a second call leaves the first subscriber in
/// place.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let filter = match filter_directive(
        std::env::var("RUST_LOG").is_ok(),
        debug_flag,
        config_level,
    ) {
        None => EnvFilter::from_default_env(),
        Some(directive) => EnvFilter::new(directive),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }
}

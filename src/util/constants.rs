// console-attach - util/constants.rs
//
// Single source of truth for named constants and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "console-attach";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ConsoleAttach";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Output mode
// =============================================================================

/// Environment variable that overrides the output mode at startup.
/// Recognised values: "debug", "release" (case-insensitive).
pub const MODE_ENV_VAR: &str = "CONSOLE_ATTACH_MODE";

/// `tracing` target used by the debug line sink.
///
/// Filter on this target (e.g. `RUST_LOG=console_attach::trace=debug`) to see
/// lines written in debug mode without the rest of the diagnostic output.
pub const TRACE_SINK_TARGET: &str = "console_attach::trace";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

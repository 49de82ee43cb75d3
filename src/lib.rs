// console-attach - lib.rs
//
// Library entry point. Attaches a GUI-subsystem process to its parent
// console on Windows and writes lines through it; on other platforms the
// native streams are used as-is.
//
// The common entry points are re-exported here; the full surface lives in
// `app::shim`.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;

pub use app::shim::{
    ensure_console_attached, install, is_console_enabled, write_line_args, write_line_format,
    write_line_str, ConsoleShim,
};
pub use self::core::attach::AttachReport;
pub use self::core::mode::OutputMode;

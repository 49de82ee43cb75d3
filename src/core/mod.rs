// console-attach - core/mod.rs
//
// Core shim logic: output mode, line templates, sinks, and the one-shot
// attachment state machine. Talks to the OS only through
// `platform::console::ConsoleApi`.

pub mod attach;
pub mod mode;
pub mod sink;
pub mod template;

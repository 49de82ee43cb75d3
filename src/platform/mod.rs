// console-attach - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories crate, kernel32 (Windows only).
// Must NOT depend on: app.

pub mod config;
pub mod console;
pub mod detect;

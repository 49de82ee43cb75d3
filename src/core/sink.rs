// console-attach - core/sink.rs
//
// Line sinks: the two places a finished line can go.
//
// - `ConsoleSink` writes to standard output (release mode, after attachment).
// - `DebugSink` writes to the trace channel (debug mode): a `tracing` event
//   plus, on Windows, the debugger output stream.
//
// Both are fire-and-forget. A write that fails is dropped; a GUI-subsystem
// process with no console has nowhere to report it anyway.

use crate::platform::console::output_debug_string;
use crate::util::constants::TRACE_SINK_TARGET;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;

/// Capability shared by every line destination.
pub trait LineWriter: Send + Sync {
    /// Write `line` followed by a line terminator. Never fails.
    fn write_line(&self, line: &str);
}

impl<T: LineWriter + ?Sized> LineWriter for Box<T> {
    fn write_line(&self, line: &str) {
        (**self).write_line(line)
    }
}

// =============================================================================
// Console sink
// =============================================================================

/// Writes lines to an `io::Write` target, standard output by default.
#[derive(Debug)]
pub struct ConsoleSink<W = Stdout> {
    out: Mutex<W>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            out: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> LineWriter for ConsoleSink<W> {
    fn write_line(&self, line: &str) {
        // A panic mid-write cannot leave the writer in a state we care about.
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = write_terminated(&mut *out, line) {
            tracing::trace!(error = %e, "Console write dropped");
        }
    }
}

fn write_terminated(out: &mut impl Write, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

// =============================================================================
// Debug sink
// =============================================================================

/// The debug-mode trace channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugSink;

impl LineWriter for DebugSink {
    fn write_line(&self, line: &str) {
        tracing::debug!(target: TRACE_SINK_TARGET, "{line}");
        output_debug_string(line);
    }
}

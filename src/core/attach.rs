// console-attach - core/attach.rs
//
// One-shot console attachment.
//
// State machine: Unattached -> Attached. The transition runs at most once per
// attacher, inside `OnceLock::get_or_init`, so concurrent first callers block
// on the same initialisation instead of racing through the native sequence.
//
// Sequence on Windows (release mode only):
//   1. classify stdout (disk/pipe = redirected)
//   2. if redirected, materialise stdout
//   3. classify stderr, materialise if redirected
//   4. AttachConsole(ATTACH_PARENT_PROCESS)
//   5. if stderr was NOT redirected, point it at the current stdout handle
//   6. mark attached
// Every native failure is swallowed; the report records what happened.

use super::mode::OutputMode;
use crate::platform::console::{ConsoleApi, StdHandle, StdStream};
use crate::platform::detect::Platform;
use std::sync::OnceLock;

/// What the one-shot attachment observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttachReport {
    /// `false` when the host platform has no console inheritance and the
    /// native sequence was skipped entirely.
    pub platform_supported: bool,
    pub output_redirected: bool,
    pub error_redirected: bool,
    /// Handle stdout was pinned to before attaching (redirected only).
    pub pinned_output: Option<StdHandle>,
    /// Handle stderr was pinned to before attaching (redirected only).
    pub pinned_error: Option<StdHandle>,
    /// Result of the native attach call. Informational only.
    pub parent_console_attached: bool,
    /// Whether stderr was re-pointed at stdout's handle.
    pub error_unified: bool,
}

impl AttachReport {
    fn unsupported() -> Self {
        Self::default()
    }
}

/// Owns the "console enabled" state and performs the attachment sequence
/// against a [`ConsoleApi`].
#[derive(Debug)]
pub struct ConsoleAttacher<A> {
    api: A,
    mode: OutputMode,
    platform: Platform,
    report: OnceLock<AttachReport>,
}

impl<A: ConsoleApi> ConsoleAttacher<A> {
    pub fn new(api: A, mode: OutputMode, platform: Platform) -> Self {
        Self {
            api,
            mode,
            platform,
            report: OnceLock::new(),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// `true` once attachment has completed (or been skipped on a platform
    /// that does not need it). Never reverts.
    pub fn is_enabled(&self) -> bool {
        self.report.get().is_some()
    }

    /// The report of the completed attachment, if it has run.
    pub fn report(&self) -> Option<&AttachReport> {
        self.report.get()
    }

    /// Idempotent. The first call in release mode runs the attachment
    /// sequence; later calls return the same report without side effects.
    ///
    /// In debug mode nothing runs, the console stays disabled and `None` is
    /// returned.
    pub fn ensure_attached(&self) -> Option<&AttachReport> {
        if self.mode == OutputMode::Debug {
            return None;
        }
        Some(self.report.get_or_init(|| self.attach_once()))
    }

    fn attach_once(&self) -> AttachReport {
        if !self.platform.is_windows() {
            tracing::debug!(platform = ?self.platform, "Console attachment not needed on this platform");
            return AttachReport::unsupported();
        }

        let output_redirected = self.api.file_type(StdStream::Output).is_redirected();
        let pinned_output = if output_redirected {
            self.api.materialize(StdStream::Output)
        } else {
            None
        };

        let error_redirected = self.api.file_type(StdStream::Error).is_redirected();
        let pinned_error = if error_redirected {
            self.api.materialize(StdStream::Error)
        } else {
            None
        };

        let parent_console_attached = self.api.attach_parent_console();

        let mut error_unified = false;
        if !error_redirected {
            if let Some(output) = self.api.std_handle(StdStream::Output) {
                error_unified = self.api.set_std_handle(StdStream::Error, output);
            }
        }

        let report = AttachReport {
            platform_supported: true,
            output_redirected,
            error_redirected,
            pinned_output,
            pinned_error,
            parent_console_attached,
            error_unified,
        };
        tracing::debug!(?report, "Console attachment complete");
        report
    }
}

// =============================================================================
// Tests
// =============================================================================

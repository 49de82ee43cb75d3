// console-attach - app/shim.rs
//
// `ConsoleShim`: the service object that ties the output mode, the attacher
// and the active line sink together, plus the process-wide instance behind
// the free functions and the `write_line!` macro.
//
// Lifecycle of the process-wide instance: installed at most once (explicitly
// via `install`, or lazily with the build-default mode on first use) and
// never replaced.

use crate::core::attach::{AttachReport, ConsoleAttacher};
use crate::core::mode::OutputMode;
use crate::core::sink::{ConsoleSink, DebugSink, LineWriter};
use crate::core::template::format_positional;
use crate::platform::console::{ConsoleApi, NativeConsole};
use crate::platform::detect::Platform;
use crate::util::error::TemplateError;
use std::fmt;
use std::sync::OnceLock;

/// Console attachment plus line output for one process.
pub struct ConsoleShim {
    attacher: ConsoleAttacher<Box<dyn ConsoleApi>>,
    sink: Box<dyn LineWriter>,
}

impl fmt::Debug for ConsoleShim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleShim")
            .field("mode", &self.attacher.mode())
            .field("platform", &self.attacher.platform())
            .field("report", &self.attacher.report())
            .finish_non_exhaustive()
    }
}

impl ConsoleShim {
    /// Shim for the real process: native handles, host platform, and the
    /// sink that belongs to `mode`.
    pub fn new(mode: OutputMode) -> Self {
        let sink: Box<dyn LineWriter> = match mode {
            OutputMode::Debug => Box::new(DebugSink),
            OutputMode::Release => Box::new(ConsoleSink::stdout()),
        };
        Self::with_parts(mode, Platform::current(), Box::new(NativeConsole), sink)
    }

    /// Assemble a shim from explicit parts. `sink` receives every line
    /// regardless of mode.
    pub fn with_parts(
        mode: OutputMode,
        platform: Platform,
        api: Box<dyn ConsoleApi>,
        sink: Box<dyn LineWriter>,
    ) -> Self {
        Self {
            attacher: ConsoleAttacher::new(api, mode, platform),
            sink,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.attacher.mode()
    }

    /// Run the one-shot attachment if it has not run yet. `None` in debug
    /// mode.
    pub fn ensure_console_attached(&self) -> Option<&AttachReport> {
        self.attacher.ensure_attached()
    }

    pub fn is_console_enabled(&self) -> bool {
        self.attacher.is_enabled()
    }

    /// Write an empty line.
    pub fn write_line(&self) {
        self.emit("");
    }

    pub fn write_line_str(&self, text: &str) {
        self.emit(text);
    }

    /// Expand a positional template (`"{0} of {1}"`) and write the result.
    ///
    /// A malformed template writes nothing and returns the error.
    pub fn write_line_format(
        &self,
        template: &str,
        args: &[&dyn fmt::Display],
    ) -> Result<(), TemplateError> {
        let line = format_positional(template, args)?;
        self.emit(&line);
        Ok(())
    }

    /// Write a line built with Rust's own formatting machinery.
    pub fn write_line_args(&self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(text) => self.emit(text),
            None => self.emit(&args.to_string()),
        }
    }

    fn emit(&self, line: &str) {
        if self.mode() == OutputMode::Release {
            self.attacher.ensure_attached();
        }
        self.sink.write_line(line);
    }
}

// =============================================================================
// Process-wide instance
// =============================================================================

static GLOBAL: OnceLock<ConsoleShim> = OnceLock::new();

/// Install the process-wide shim.
///
/// Fails (handing the shim back) if one is already installed, including one
/// created lazily by an earlier write.
pub fn install(shim: ConsoleShim) -> Result<(), ConsoleShim> {
    GLOBAL.set(shim)
}

/// The process-wide shim, created with [`OutputMode::build_default`] if
/// nothing was installed.
pub fn global() -> &'static ConsoleShim {
    GLOBAL.get_or_init(|| ConsoleShim::new(OutputMode::build_default()))
}

pub fn ensure_console_attached() -> Option<&'static AttachReport> {
    global().ensure_console_attached()
}

pub fn is_console_enabled() -> bool {
    global().is_console_enabled()
}

pub fn write_line() {
    global().write_line();
}

pub fn write_line_str(text: &str) {
    global().write_line_str(text);
}

pub fn write_line_format(template: &str, args: &[&dyn fmt::Display]) -> Result<(), TemplateError> {
    global().write_line_format(template, args)
}

pub fn write_line_args(args: fmt::Arguments<'_>) {
    global().write_line_args(args);
}

/// Write a line through the process-wide shim.
///
/// ```no_run
/// use console_attach::write_line;
///
/// write_line!();
/// write_line!("plain text");
/// write_line!("{0} of {1}", 3, 10).expect("valid template");
/// ```
///
/// The template form returns `Result<(), TemplateError>`.
#[macro_export]
macro_rules! write_line {
    () => {
        $crate::app::shim::write_line()
    };
    ($text:expr $(,)?) => {
        $crate::app::shim::write_line_str(::std::convert::AsRef::<str>::as_ref(&$text))
    };
    ($template:expr, $($arg:expr),+ $(,)?) => {
        $crate::app::shim::write_line_format(
            $template,
            &[$(&$arg as &dyn ::std::fmt::Display),+],
        )
    };
}

// console-attach - tests/e2e_shim.rs
//
// End-to-end tests for the public shim surface: mode resolution from a real
// config.toml, the attachment sequence as seen through a recording handle
// table, and line output through the process-wide instance and the
// `write_line!` macro.

use console_attach::app::shim::ConsoleShim;
use console_attach::core::sink::{ConsoleSink, LineWriter};
use console_attach::platform::config::load_config;
use console_attach::platform::console::{ConsoleApi, FileType, StdHandle, StdStream};
use console_attach::platform::detect::Platform;
use console_attach::OutputMode;
use std::io::Write;
use std::sync::{Arc, Mutex};

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Native {
    FileType(StdStream),
    Materialize(StdStream),
    Attach,
    GetHandle(StdStream),
    SetHandle(StdStream, StdHandle),
}

/// Handle table double. Attaching swaps stdout to a fresh console handle so
/// tests can tell the pre- and post-attach handles apart.
#[derive(Clone)]
struct HandleTable {
    types: [FileType; 2],
    handles: Arc<Mutex<[StdHandle; 2]>>,
    log: Arc<Mutex<Vec<Native>>>,
}

const REDIRECT_OUT: StdHandle = StdHandle(0x100);
const REDIRECT_ERR: StdHandle = StdHandle(0x200);
const CONSOLE_OUT: StdHandle = StdHandle(0x300);

fn idx(stream: StdStream) -> usize {
    match stream {
        StdStream::Output => 0,
        StdStream::Error => 1,
    }
}

impl HandleTable {
    fn new(output: FileType, error: FileType) -> Self {
        Self {
            types: [output, error],
            handles: Arc::new(Mutex::new([REDIRECT_OUT, REDIRECT_ERR])),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(&self, call: Native) {
        self.log.lock().unwrap().push(call);
    }

    fn log(&self) -> Vec<Native> {
        self.log.lock().unwrap().clone()
    }

    fn current(&self, stream: StdStream) -> StdHandle {
        self.handles.lock().unwrap()[idx(stream)]
    }
}

impl ConsoleApi for HandleTable {
    fn file_type(&self, stream: StdStream) -> FileType {
        self.push(Native::FileType(stream));
        self.types[idx(stream)]
    }

    fn materialize(&self, stream: StdStream) -> Option<StdHandle> {
        self.push(Native::Materialize(stream));
        Some(self.current(stream))
    }

    fn attach_parent_console(&self) -> bool {
        self.push(Native::Attach);
        if !self.types[0].is_redirected() {
            self.handles.lock().unwrap()[0] = CONSOLE_OUT;
        }
        true
    }

    fn std_handle(&self, stream: StdStream) -> Option<StdHandle> {
        self.push(Native::GetHandle(stream));
        Some(self.current(stream))
    }

    fn set_std_handle(&self, stream: StdStream, handle: StdHandle) -> bool {
        self.push(Native::SetHandle(stream, handle));
        self.handles.lock().unwrap()[idx(stream)] = handle;
        true
    }
}

/// `io::Write` into a shared buffer so output can be inspected after the
/// sink has been boxed into a shim.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn windows_shim(mode: OutputMode, table: &HandleTable, out: &SharedBuf) -> ConsoleShim {
    ConsoleShim::with_parts(
        mode,
        Platform::Windows,
        Box::new(table.clone()),
        Box::new(ConsoleSink::with_writer(out.clone())),
    )
}

// =============================================================================
// Attachment sequence
// =============================================================================

/// stdout to a file, stderr still a console: stderr follows stdout.
#[test]
fn e2e_file_redirect_unifies_stderr() {
    let table = HandleTable::new(FileType::Disk, FileType::Char);
    let out = SharedBuf::default();
    let shim = windows_shim(OutputMode::Release, &table, &out);

    shim.write_line_str("to the file");

    assert_eq!(table.current(StdStream::Error), REDIRECT_OUT);
    assert_eq!(table.current(StdStream::Error), table.current(StdStream::Output));
    assert_eq!(out.text(), "to the file\n");
    assert!(shim.is_console_enabled());
}

/// Both streams redirected: stderr keeps its own target.
#[test]
fn e2e_both_redirected_leaves_stderr_alone() {
    let table = HandleTable::new(FileType::Disk, FileType::Disk);
    let out = SharedBuf::default();
    let shim = windows_shim(OutputMode::Release, &table, &out);

    shim.write_line();

    assert_eq!(table.current(StdStream::Error), REDIRECT_ERR);
    assert!(!table
        .log()
        .iter()
        .any(|c| matches!(c, Native::SetHandle(..))));
}

/// Launched from a terminal without redirection: both streams end up on the
/// parent's console handle.
#[test]
fn e2e_interactive_launch_points_stderr_at_attached_console() {
    let table = HandleTable::new(FileType::Char, FileType::Char);
    let out = SharedBuf::default();
    let shim = windows_shim(OutputMode::Release, &table, &out);

    let report = *shim.ensure_console_attached().unwrap();

    assert!(report.parent_console_attached);
    assert!(report.error_unified);
    assert_eq!(table.current(StdStream::Output), CONSOLE_OUT);
    assert_eq!(table.current(StdStream::Error), CONSOLE_OUT);
}

#[test]
fn e2e_native_sequence_runs_once_across_writes() {
    let table = HandleTable::new(FileType::Pipe, FileType::Char);
    let out = SharedBuf::default();
    let shim = windows_shim(OutputMode::Release, &table, &out);

    shim.write_line_str("one");
    let first = table.log();
    shim.write_line_str("two");
    shim.write_line_format("{0}", &[&"three"]).unwrap();
    shim.ensure_console_attached();

    assert_eq!(table.log(), first);
    assert_eq!(
        first,
        vec![
            Native::FileType(StdStream::Output),
            Native::Materialize(StdStream::Output),
            Native::FileType(StdStream::Error),
            Native::Attach,
            Native::GetHandle(StdStream::Output),
            Native::SetHandle(StdStream::Error, REDIRECT_OUT),
        ]
    );
    assert_eq!(out.text(), "one\ntwo\nthree\n");
}

#[test]
fn e2e_debug_mode_issues_no_native_calls() {
    let table = HandleTable::new(FileType::Disk, FileType::Char);
    let out = SharedBuf::default();
    let shim = windows_shim(OutputMode::Debug, &table, &out);

    for i in 0..4 {
        shim.write_line_format("{0} of {1}", &[&i, &4]).unwrap();
    }
    assert!(shim.ensure_console_attached().is_none());

    assert!(table.log().is_empty());
    assert!(!shim.is_console_enabled());
    assert_eq!(out.text(), "0 of 4\n1 of 4\n2 of 4\n3 of 4\n");
}

#[test]
fn e2e_other_platform_is_a_no_op() {
    let table = HandleTable::new(FileType::Disk, FileType::Char);
    let out = SharedBuf::default();
    let shim = ConsoleShim::with_parts(
        OutputMode::Release,
        Platform::Other,
        Box::new(table.clone()),
        Box::new(ConsoleSink::with_writer(out.clone())),
    );

    shim.write_line_str("native streams");

    assert!(table.log().is_empty());
    assert!(shim.is_console_enabled());
    assert_eq!(out.text(), "native streams\n");
}

// =============================================================================
// Mode from config
// =============================================================================

#[test]
fn e2e_config_mode_feeds_resolution() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[console]\nmode = \"release\"\n",
    )
    .unwrap();

    let (config, warnings) = load_config(dir.path());
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let (mode, _) = OutputMode::resolve(None, None, config.mode);
    assert_eq!(mode, OutputMode::Release);

    let (mode, _) = OutputMode::resolve(Some("debug"), None, config.mode);
    assert_eq!(mode, OutputMode::Debug);
}

// =============================================================================
// Process-wide instance
// =============================================================================

#[derive(Clone, Default)]
struct Collected(Arc<Mutex<Vec<String>>>);

impl LineWriter for Collected {
    fn write_line(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

/// The only test in this binary that touches the global instance.
#[test]
fn e2e_global_shim_and_macro() {
    let table = HandleTable::new(FileType::Disk, FileType::Char);
    let lines = Collected::default();
    let shim = ConsoleShim::with_parts(
        OutputMode::Release,
        Platform::Windows,
        Box::new(table.clone()),
        Box::new(lines.clone()),
    );
    assert!(console_attach::install(shim).is_ok());
    assert!(!console_attach::is_console_enabled());

    console_attach::write_line!();
    console_attach::write_line!("plain");
    console_attach::write_line!(String::from("owned"));
    console_attach::write_line!("{0} of {1}", 3, 10).unwrap();
    let err = console_attach::write_line!("{0} {1}", 1).unwrap_err();
    assert!(err.to_string().contains("{1}"));

    assert!(console_attach::is_console_enabled());
    assert_eq!(
        *lines.0.lock().unwrap(),
        vec!["", "plain", "owned", "3 of 10"]
    );
    assert_eq!(
        table
            .log()
            .iter()
            .filter(|c| **c == Native::Attach)
            .count(),
        1
    );

    let again = ConsoleShim::with_parts(
        OutputMode::Debug,
        Platform::Other,
        Box::new(table.clone()),
        Box::new(Collected::default()),
    );
    assert!(console_attach::install(again).is_err());
}

// console-attach - platform/console.rs
//
// Native console handle operations.
//
// The four kernel32 calls the shim needs (AttachConsole, GetStdHandle,
// SetStdHandle, GetFileType) are declared in a private `ffi` module and only
// reachable through the `ConsoleApi` trait, so the attachment sequence in
// `core::attach` can be driven by a recording double in tests.
//
// # Platform support
// On non-Windows targets `NativeConsole` compiles to inert stubs. The attacher
// never calls them there: `Platform::Other` short-circuits before any native
// operation.

// =============================================================================
// Platform-neutral types
// =============================================================================

/// One of the two standard streams the shim manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Output,
    Error,
}

/// Opaque copy of a native standard-handle value.
///
/// Stored as an integer so reports and test doubles stay `Send + Sync` and
/// comparable on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StdHandle(pub isize);

impl StdHandle {
    /// `NULL` and `INVALID_HANDLE_VALUE` are not usable handles.
    pub fn is_valid(self) -> bool {
        self.0 != 0 && self.0 != -1
    }
}

/// Classification of whatever a standard handle is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Unknown,
    /// A file on disk (`program > out.txt`).
    Disk,
    /// A character device, normally a live console.
    Char,
    /// An anonymous or named pipe (`program | more`).
    Pipe,
    Remote,
}

impl FileType {
    /// Map a raw `GetFileType` return code. Unrecognised codes are `Unknown`.
    pub fn from_raw(code: u32) -> Self {
        match code {
            0x0001 => Self::Disk,
            0x0002 => Self::Char,
            0x0003 => Self::Pipe,
            0x8000 => Self::Remote,
            _ => Self::Unknown,
        }
    }

    /// A stream counts as redirected when it is bound to a disk file or a
    /// pipe rather than an interactive device.
    pub fn is_redirected(self) -> bool {
        matches!(self, Self::Disk | Self::Pipe)
    }
}

// =============================================================================
// Capability trait
// =============================================================================

/// The native operations the attachment sequence is built from.
///
/// Every method is infallible from the caller's point of view: failures
/// surface as `Unknown`, `None` or `false` and the sequence carries on.
pub trait ConsoleApi: Send + Sync {
    /// File type currently behind `stream`'s standard handle.
    fn file_type(&self, stream: StdStream) -> FileType;

    /// Force `stream` into a settled state before the handle table changes:
    /// anything buffered is written to the current target. Returns the
    /// handle the stream was pinned to.
    fn materialize(&self, stream: StdStream) -> Option<StdHandle>;

    /// Attach to the console of the parent process. `true` on success.
    fn attach_parent_console(&self) -> bool;

    fn std_handle(&self, stream: StdStream) -> Option<StdHandle>;

    /// Replace `stream`'s standard handle. `true` on success.
    fn set_std_handle(&self, stream: StdStream, handle: StdHandle) -> bool;
}

impl<T: ConsoleApi + ?Sized> ConsoleApi for Box<T> {
    fn file_type(&self, stream: StdStream) -> FileType {
        (**self).file_type(stream)
    }

    fn materialize(&self, stream: StdStream) -> Option<StdHandle> {
        (**self).materialize(stream)
    }

    fn attach_parent_console(&self) -> bool {
        (**self).attach_parent_console()
    }

    fn std_handle(&self, stream: StdStream) -> Option<StdHandle> {
        (**self).std_handle(stream)
    }

    fn set_std_handle(&self, stream: StdStream, handle: StdHandle) -> bool {
        (**self).set_std_handle(stream, handle)
    }
}

// =============================================================================
// Windows FFI declarations
// =============================================================================

#[cfg(target_os = "windows")]
mod ffi {
    use std::ffi::c_void;

    /// `(DWORD)-11`
    pub const STD_OUTPUT_HANDLE: u32 = 0xFFFF_FFF5;

    /// `(DWORD)-12`
    pub const STD_ERROR_HANDLE: u32 = 0xFFFF_FFF4;

    /// `(DWORD)-1`: attach to the console of the process that spawned us.
    pub const ATTACH_PARENT_PROCESS: u32 = 0xFFFF_FFFF;

    #[link(name = "kernel32")]
    unsafe extern "system" {
        /// Returns non-zero on success. Fails with ERROR_INVALID_HANDLE when
        /// the parent has no console and ERROR_ACCESS_DENIED when one is
        /// already attached.
        pub fn AttachConsole(dw_process_id: u32) -> i32;

        /// Returns NULL when no handle is associated, INVALID_HANDLE_VALUE on
        /// error.
        pub fn GetStdHandle(n_std_handle: u32) -> *mut c_void;

        pub fn SetStdHandle(n_std_handle: u32, h_handle: *mut c_void) -> i32;

        pub fn GetFileType(h_file: *mut c_void) -> u32;

        /// `lp_output_string` must be a NUL-terminated UTF-16 buffer.
        pub fn OutputDebugStringW(lp_output_string: *const u16);
    }
}

// =============================================================================
// Native implementation
// =============================================================================

/// `ConsoleApi` backed by the real process handle table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeConsole;

#[cfg(target_os = "windows")]
fn std_handle_id(stream: StdStream) -> u32 {
    match stream {
        StdStream::Output => ffi::STD_OUTPUT_HANDLE,
        StdStream::Error => ffi::STD_ERROR_HANDLE,
    }
}

#[cfg(target_os = "windows")]
impl ConsoleApi for NativeConsole {
    fn file_type(&self, stream: StdStream) -> FileType {
        match self.std_handle(stream) {
            // SAFETY: GetFileType only inspects the handle; a stale handle
            //         yields FILE_TYPE_UNKNOWN rather than undefined behaviour.
            Some(h) => FileType::from_raw(unsafe { ffi::GetFileType(h.0 as *mut _) }),
            None => FileType::Unknown,
        }
    }

    fn materialize(&self, stream: StdStream) -> Option<StdHandle> {
        use std::io::Write;

        let flushed = match stream {
            StdStream::Output => std::io::stdout().flush(),
            StdStream::Error => std::io::stderr().flush(),
        };
        if let Err(e) = flushed {
            tracing::debug!(?stream, error = %e, "Flush before attach failed (ignored)");
        }
        self.std_handle(stream)
    }

    fn attach_parent_console(&self) -> bool {
        // SAFETY: plain DWORD argument, no pointers involved.
        let ok = unsafe { ffi::AttachConsole(ffi::ATTACH_PARENT_PROCESS) } != 0;
        if !ok {
            tracing::debug!(
                error = %std::io::Error::last_os_error(),
                "AttachConsole(ATTACH_PARENT_PROCESS) failed (ignored)"
            );
        }
        ok
    }

    fn std_handle(&self, stream: StdStream) -> Option<StdHandle> {
        // SAFETY: GetStdHandle takes a constant identifier and returns a
        //         handle value we only copy.
        let raw = unsafe { ffi::GetStdHandle(std_handle_id(stream)) };
        Some(StdHandle(raw as isize)).filter(|h| h.is_valid())
    }

    fn set_std_handle(&self, stream: StdStream, handle: StdHandle) -> bool {
        // SAFETY: the handle value came from GetStdHandle in this process.
        let ok = unsafe { ffi::SetStdHandle(std_handle_id(stream), handle.0 as *mut _) } != 0;
        if !ok {
            tracing::debug!(
                ?stream,
                error = %std::io::Error::last_os_error(),
                "SetStdHandle failed (ignored)"
            );
        }
        ok
    }
}

#[cfg(not(target_os = "windows"))]
impl ConsoleApi for NativeConsole {
    fn file_type(&self, _stream: StdStream) -> FileType {
        FileType::Unknown
    }

    fn materialize(&self, _stream: StdStream) -> Option<StdHandle> {
        None
    }

    fn attach_parent_console(&self) -> bool {
        false
    }

    fn std_handle(&self, _stream: StdStream) -> Option<StdHandle> {
        None
    }

    fn set_std_handle(&self, _stream: StdStream, _handle: StdHandle) -> bool {
        false
    }
}

/// Send `line` to an attached debugger (the Windows debug output channel).
/// No-op elsewhere.
pub fn output_debug_string(line: &str) {
    #[cfg(target_os = "windows")]
    {
        let wide: Vec<u16> = line
            .encode_utf16()
            .chain("\n".encode_utf16())
            .chain(std::iter::once(0))
            .collect();
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        unsafe { ffi::OutputDebugStringW(wide.as_ptr()) }
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = line;
    }
}

// =============================================================================
// Tests
// =============================================================================

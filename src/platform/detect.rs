// console-attach - platform/detect.rs
//
// Host platform detection. Only Windows lets a GUI-subsystem process inherit
// its parent's console, so that is the only distinction the shim cares about.

/// Operating-system family, as far as console attachment is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows: console handles are inherited and can be attached.
    Windows,
    /// Anything else: the native stdio streams already work.
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Other
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }
}

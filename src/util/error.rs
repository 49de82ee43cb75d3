// console-attach - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
//
// Native console failures are deliberately absent: attaching to a parent
// console is best-effort and those failures never reach a caller. What is
// left are configuration problems and malformed line templates.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for console-attach operations.
#[derive(Debug)]
pub enum ShimError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// A line template could not be expanded.
    Template(TemplateError),
}

impl fmt::Display for ShimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Template(e) => write!(f, "Template error: {e}"),
        }
    }
}

impl std::error::Error for ShimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Template(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading and value validation.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A value is not one of the recognised choices.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "'{field}' = '{value}' is not recognised. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ShimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Template errors
// ---------------------------------------------------------------------------

/// Errors produced while expanding a positional line template such as
/// `"{0} of {1}"`. Every variant carries the byte offset of the brace that
/// opened (or closed) the offending placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{` with no matching `}`.
    UnmatchedOpen { offset: usize },

    /// A lone `}` that is not part of a `}}` escape.
    UnmatchedClose { offset: usize },

    /// The placeholder index is empty or not a non-negative integer.
    InvalidIndex { offset: usize, text: String },

    /// The `,width` part of a placeholder is not an integer.
    InvalidAlignment { offset: usize, text: String },

    /// `{0:spec}` format specifiers are not supported.
    UnsupportedFormatSpecifier { offset: usize, spec: String },

    /// The placeholder refers past the end of the supplied arguments.
    MissingArgument {
        offset: usize,
        index: usize,
        supplied: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedOpen { offset } => {
                write!(f, "unmatched '{{' at offset {offset}")
            }
            Self::UnmatchedClose { offset } => {
                write!(f, "unmatched '}}' at offset {offset} (use '}}}}' for a literal brace)")
            }
            Self::InvalidIndex { offset, text } => {
                write!(f, "invalid placeholder index '{text}' at offset {offset}")
            }
            Self::InvalidAlignment { offset, text } => {
                write!(f, "invalid alignment '{text}' at offset {offset}")
            }
            Self::UnsupportedFormatSpecifier { offset, spec } => write!(
                f,
                "format specifier ':{spec}' at offset {offset} is not supported"
            ),
            Self::MissingArgument {
                offset,
                index,
                supplied,
            } => write!(
                f,
                "placeholder {{{index}}} at offset {offset} has no argument \
                 ({supplied} supplied)"
            ),
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<TemplateError> for ShimError {
    fn from(e: TemplateError) -> Self {
        Self::Template(e)
    }
}

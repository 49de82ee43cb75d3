// console-attach - core/mode.rs
//
// Output mode selection: debug (trace sink, never attach) or release
// (console sink, attach on first write).

use crate::util::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Where lines go and whether console attachment ever happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Lines go to the debug/trace sink; console attachment is skipped
    /// unconditionally.
    Debug,
    /// Lines go to standard output after the console has been attached.
    Release,
}

impl OutputMode {
    /// Mode implied by the build profile: `Debug` with `debug_assertions`,
    /// `Release` otherwise.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// Resolve the effective mode from every source, highest priority first:
    /// CLI value, environment value, config file, build default.
    ///
    /// Unrecognised CLI/env strings are skipped and reported in the returned
    /// warnings; the config value has already been validated by the loader.
    pub fn resolve(
        cli: Option<&str>,
        env: Option<&str>,
        config: Option<OutputMode>,
    ) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        for (source, value) in [("--mode", cli), ("environment", env)] {
            let Some(value) = value else { continue };
            match value.parse::<OutputMode>() {
                Ok(mode) => return (mode, warnings),
                Err(e) => warnings.push(format!("{source}: {e}; ignoring")),
            }
        }

        (config.unwrap_or_else(Self::build_default), warnings)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            _ => Err(ConfigError::InvalidValue {
                field: "mode".to_string(),
                value: s.to_string(),
                expected: "\"debug\" or \"release\"".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognised_values_case_insensitively() {
        assert_eq!(" Debug ".parse::<OutputMode>().unwrap(), OutputMode::Debug);
        assert_eq!("RELEASE".parse::<OutputMode>().unwrap(), OutputMode::Release);
    }

    #[test]
    fn rejects_unknown_value() {
        let err = "profile".parse::<OutputMode>().unwrap_err();
        assert!(err.to_string().contains("profile"));
    }

    #[test]
    fn build_default_follows_debug_assertions() {
        let expected = if cfg!(debug_assertions) {
            OutputMode::Debug
        } else {
            OutputMode::Release
        };
        assert_eq!(OutputMode::build_default(), expected);
    }

    #[test]
    fn cli_beats_env_and_config() {
        let (mode, warnings) =
            OutputMode::resolve(Some("release"), Some("debug"), Some(OutputMode::Debug));
        assert_eq!(mode, OutputMode::Release);
        assert!(warnings.is_empty());
    }

    #[test]
    fn env_beats_config() {
        let (mode, _) = OutputMode::resolve(None, Some("debug"), Some(OutputMode::Release));
        assert_eq!(mode, OutputMode::Debug);
    }

    #[test]
    fn invalid_cli_falls_through_with_warning() {
        let (mode, warnings) =
            OutputMode::resolve(Some("loud"), None, Some(OutputMode::Release));
        assert_eq!(mode, OutputMode::Release);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("--mode"));
    }

    #[test]
    fn nothing_set_uses_build_default() {
        let (mode, warnings) = OutputMode::resolve(None, None, None);
        assert_eq!(mode, OutputMode::build_default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for mode in [OutputMode::Debug, OutputMode::Release] {
            assert_eq!(mode.to_string().parse::<OutputMode>().unwrap(), mode);
        }
    }
}

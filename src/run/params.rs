//! Configuration parameters for a harness run

use crate::loader::DEFAULT_PATTERN;
use std::path::PathBuf;
use termcolor::ColorChoice;

/// Configuration parameters for running tests
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Directory to load units from; `None` runs every registered unit
    pub path: Option<PathBuf>,
    /// File name pattern applied when loading from `path`
    pub pattern: String,
    /// Units to run instead of the full set
    pub tests: Vec<String>,
    /// Whether log output is colorized
    pub color: ColorChoice,
}

impl RunParams {
    /// Create a new RunParams with defaults taken from the environment
    pub fn new() -> Self {
        let pattern =
            std::env::var("REGTEST_PATTERN").unwrap_or_else(|_| DEFAULT_PATTERN.to_string());

        RunParams {
            path: None,
            pattern,
            tests: Vec::new(),
            color: Self::detect_color(),
        }
    }

    /// Load units from the given directory
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the file name pattern used when loading
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Add a unit to run explicitly
    pub fn test(mut self, name: impl Into<String>) -> Self {
        self.tests.push(name.into());
        self
    }

    /// Set the color choice
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Color is off when `NO_COLOR` is set. With the `colors` feature it is
    /// also off when stdout is not a terminal.
    fn detect_color() -> ColorChoice {
        if std::env::var_os("NO_COLOR").is_some() {
            return ColorChoice::Never;
        }

        #[cfg(feature = "colors")]
        {
            if !atty::is(atty::Stream::Stdout) {
                return ColorChoice::Never;
            }
        }

        ColorChoice::Always
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self::new()
    }
}

//! # regtest-rs
//!
//! A minimal regression-test harness. Test units implement a three-phase
//! lifecycle (init, run, destroy), are registered with a [`Registry`], and
//! are executed one at a time with failures isolated per unit. The harness
//! logs colorized, timestamped lines tagged with the running unit and ends a
//! full run with a pass/warn/fail report.

pub mod cli;
pub mod error;
pub mod loader;
pub mod logger;
pub mod registry;
pub mod run;
pub mod unit;

pub use error::{Error, Result};
pub use logger::{Level, Logger, Marker};
pub use registry::{Registry, UnitEntry};
pub use run::{ResultTable, RunParams, RunStatus, RunSummary};
pub use unit::{TestResult, TestUnit};

use std::path::PathBuf;
use termcolor::ColorChoice;

// Internal function used by the Builder - not part of public API
fn run(registry: &Registry, params: &RunParams, log: &mut Logger) -> Result<RunStatus> {
    log.log(format!(
        "Simple Regression Test Tool v{}",
        env!("CARGO_PKG_VERSION")
    ));

    let loaded;
    let units = match &params.path {
        Some(path) => {
            log.log(format!(
                "Loading tests from '{}' (to modify pass -p path)",
                path.display()
            ));
            loaded = loader::load_units(path, &params.pattern, registry, log)?;
            &loaded
        }
        None => registry,
    };

    if params.tests.is_empty() {
        log.log("Executing all loaded tests (pass -t to execute specific tests)");
        Ok(run::execute_all(units, log).status())
    } else {
        Ok(run::execute_selected(units, log, &params.tests))
    }
}

/// Builder for configuring and running a set of test units
///
/// # Examples
///
/// ```no_run
/// use regtest_rs::{regtest, Registry, Logger, TestResult, TestUnit};
///
/// #[derive(Default)]
/// struct Smoke;
///
/// impl TestUnit for Smoke {
///     fn init(&mut self, _log: &mut Logger) -> anyhow::Result<()> { Ok(()) }
///     fn run(&mut self, _log: &mut Logger) -> anyhow::Result<TestResult> { Ok(TestResult::Pass) }
///     fn destroy(&mut self, _log: &mut Logger) -> anyhow::Result<()> { Ok(()) }
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<Smoke>().unwrap();
///
/// // Only some units
/// regtest::run(registry.clone()).test("Smoke").execute().unwrap();
///
/// // Everything
/// let status = regtest::run(registry).execute().unwrap();
/// std::process::exit(status.exit_code());
/// ```
pub struct Builder {
    registry: Registry,
    params: RunParams,
}

impl Builder {
    /// Create a new builder over the given units
    fn new(registry: Registry) -> Self {
        Self {
            registry,
            params: RunParams::new(),
        }
    }

    /// Only run units declared in source files inside `dir`
    pub fn path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.params = self.params.path(dir);
        self
    }

    /// File name pattern used with [`Builder::path`] (default `*.rs`)
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.params = self.params.pattern(pattern);
        self
    }

    /// Run the named unit instead of all of them. May be repeated.
    pub fn test(mut self, name: impl Into<String>) -> Self {
        self.params = self.params.test(name);
        self
    }

    /// Run the named units instead of all of them
    pub fn tests<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.params = self.params.test(name);
        }
        self
    }

    /// Override automatic color detection
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.params = self.params.color(color);
        self
    }

    /// Run, logging to standard output
    ///
    /// # Returns
    /// The overall status, or an error if the units could not be loaded.
    pub fn execute(self) -> Result<RunStatus> {
        let mut log = Logger::stdout(self.params.color);
        self.execute_with(&mut log)
    }

    /// Run, logging through the given logger
    pub fn execute_with(self, log: &mut Logger) -> Result<RunStatus> {
        run(&self.registry, &self.params, log)
    }
}

/// Entry point for running registered units
///
/// # Examples
///
/// ```no_run
/// use regtest_rs::{regtest, Registry};
///
/// let registry = Registry::new();
/// regtest::run(registry).path("tests/units").execute().unwrap();
/// ```
pub mod regtest {
    use super::*;

    /// Create a new builder for the given registry
    pub fn run(registry: Registry) -> Builder {
        Builder::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_passes() {
        let mut log = Logger::buffered();
        let status = regtest::run(Registry::new()).execute_with(&mut log).unwrap();

        assert_eq!(status, RunStatus::Passed);
        let contents = log.contents();
        assert!(contents.contains("Simple Regression Test Tool v"));
        assert!(contents.contains("Executing all loaded tests"));
        assert!(contents.contains("TEST RESULTS: LOG - All tests PASSED!"));
    }
}

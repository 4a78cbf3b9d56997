//! The test unit contract and its tri-state result

use crate::logger::Logger;
use std::fmt;

/// Outcome of a single test unit.
///
/// Only [`TestResult::Pass`] counts as success. A warning still marks the
/// whole run as failed, it is just reported at a lower severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestResult {
    /// The unit passed
    Pass,
    /// Non-fatal problem
    Warn,
    /// Fatal problem, or a phase raised an error
    Fail,
}

impl TestResult {
    /// Whether this result counts as a success
    pub fn is_pass(self) -> bool {
        self == TestResult::Pass
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            TestResult::Pass => "PASS",
            TestResult::Warn => "WARNING",
            TestResult::Fail => "FAILURE",
        };
        f.write_str(word)
    }
}

/// A regression test with an init/run/destroy lifecycle.
///
/// A fresh instance is built for every execution, so nothing carries over
/// between runs. Each phase gets the logger of the current run; lines
/// written through it are tagged with the unit's name automatically.
///
/// # Examples
///
/// ```
/// use regtest_rs::{Logger, TestResult, TestUnit};
///
/// #[derive(Default)]
/// struct ExampleTest;
///
/// impl TestUnit for ExampleTest {
///     fn init(&mut self, log: &mut Logger) -> anyhow::Result<()> {
///         log.log("Initialising example");
///         Ok(())
///     }
///
///     fn run(&mut self, log: &mut Logger) -> anyhow::Result<TestResult> {
///         log.log("This is an example test");
///         Ok(TestResult::Pass)
///     }
///
///     fn destroy(&mut self, log: &mut Logger) -> anyhow::Result<()> {
///         log.log("Cleaning up example");
///         Ok(())
///     }
/// }
/// ```
pub trait TestUnit {
    /// Prepare fixtures. An error here skips `run` and fails the unit.
    fn init(&mut self, log: &mut Logger) -> anyhow::Result<()>;

    /// Perform the test.
    fn run(&mut self, log: &mut Logger) -> anyhow::Result<TestResult>;

    /// Release fixtures. Always called once `init` has been attempted; an
    /// error here fails the unit even if `run` passed.
    fn destroy(&mut self, log: &mut Logger) -> anyhow::Result<()>;
}

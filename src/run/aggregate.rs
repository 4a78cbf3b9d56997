//! Running many units and reporting the outcome

use crate::logger::{Level, Logger, Marker};
use crate::registry::Registry;
use crate::run::execution::execute;
use crate::unit::TestResult;
use std::process::ExitCode;
use std::time::{Duration, Instant};

/// Overall status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every unit passed
    Passed,
    /// At least one unit warned or failed
    Failed,
}

impl RunStatus {
    pub fn is_success(self) -> bool {
        self == RunStatus::Passed
    }

    /// Process exit status: 0 on success, 1 otherwise
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Passed => 0,
            RunStatus::Failed => 1,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Passed => ExitCode::SUCCESS,
            RunStatus::Failed => ExitCode::FAILURE,
        }
    }
}

/// Results of a full run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<(String, TestResult)>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result; a repeated name keeps its original position
    pub fn insert(&mut self, name: impl Into<String>, result: TestResult) {
        let name = name.into();
        match self.rows.iter_mut().find(|(existing, _)| *existing == name) {
            Some(row) => row.1 = result,
            None => self.rows.push((name, result)),
        }
    }

    pub fn get(&self, name: &str) -> Option<TestResult> {
        self.rows
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, result)| *result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TestResult)> {
        self.rows.iter().map(|(name, result)| (name.as_str(), *result))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when every recorded result is a pass (vacuously true when empty)
    pub fn all_passed(&self) -> bool {
        self.rows.iter().all(|(_, result)| result.is_pass())
    }
}

/// Outcome of [`execute_all`]
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub results: ResultTable,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn status(&self) -> RunStatus {
        if self.results.all_passed() {
            RunStatus::Passed
        } else {
            RunStatus::Failed
        }
    }
}

/// Run every registered unit in registration order, then log the report.
pub fn execute_all(registry: &Registry, log: &mut Logger) -> RunSummary {
    let start = Instant::now();
    let mut results = ResultTable::new();

    for name in registry.names() {
        log.set_marker(Marker::Idle);
        log.log(format!("Executing test '{}'", name));
        if let Some(result) = execute(registry, log, name) {
            results.insert(name, result);
        }
    }

    let summary = RunSummary {
        results,
        elapsed: start.elapsed(),
    };

    log.set_marker(Marker::Report);
    log.log(format!(
        "Test run took {:.4}s to execute.",
        summary.elapsed.as_secs_f64()
    ));
    if summary.results.all_passed() {
        log.log("All tests PASSED!");
    } else {
        write_report(log, &summary.results);
    }
    log.set_marker(Marker::Idle);

    summary
}

fn write_report(log: &mut Logger, results: &ResultTable) {
    log.log("Some tests reported errors or warnings, see below for a report:");
    log.log("--------- REPORT ---------");

    for (name, result) in results.iter() {
        let level = match result {
            TestResult::Pass => Level::Log,
            TestResult::Warn => Level::Warning,
            TestResult::Fail => Level::Error,
        };
        log.emit_result(level, name, result);
    }

    log.log("------- END REPORT -------");
}

/// Run only the named units, without the summary report.
///
/// A name that matches no registered unit is logged as an error and counts
/// as a failure.
pub fn execute_selected<I, S>(registry: &Registry, log: &mut Logger, names: I) -> RunStatus
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut status = RunStatus::Passed;

    for name in names {
        let name = name.as_ref();
        match execute(registry, log, name) {
            Some(result) if result.is_pass() => {}
            Some(_) => status = RunStatus::Failed,
            None => {
                log.error(format!("No test unit named '{}' is registered", name));
                status = RunStatus::Failed;
            }
        }
    }

    status
}

//! Lifecycle execution of a single unit

use crate::logger::{Logger, Marker};
use crate::registry::Registry;
use crate::unit::{TestResult, TestUnit};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run the named unit through init, run and destroy.
///
/// Returns `None` without touching the logger when `name` is not a
/// registered unit. Otherwise a fresh instance is built and `destroy` is
/// called whatever happened in `init` or `run`. Phase errors and panics are
/// logged at error severity and turn the result into [`TestResult::Fail`].
pub fn execute(registry: &Registry, log: &mut Logger, name: &str) -> Option<TestResult> {
    let entry = registry.get(name)?;

    log.set_marker(Marker::Unit(entry.name.clone()));
    let mut unit = entry.instantiate();
    let result = run_lifecycle(unit.as_mut(), log);
    log.set_marker(Marker::Idle);

    Some(result)
}

fn run_lifecycle(unit: &mut dyn TestUnit, log: &mut Logger) -> TestResult {
    let mut result = match isolated(|| init_and_run(unit, log)) {
        Ok(result) => result,
        Err(e) => {
            log.error(format!("{:#}", e));
            TestResult::Fail
        }
    };

    // Teardown runs even when init or run failed
    if let Err(e) = isolated(|| unit.destroy(log)) {
        log.error(format!("{:#}", e));
        result = TestResult::Fail;
    }

    result
}

fn init_and_run(unit: &mut dyn TestUnit, log: &mut Logger) -> anyhow::Result<TestResult> {
    unit.init(log)?;
    unit.run(log)
}

/// Run a phase, turning a panic (a failed `assert!`) into an error
fn isolated<T>(phase: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(phase)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow::anyhow!("panicked: {}", panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Context};

    #[derive(Default)]
    struct InitFails;

    impl TestUnit for InitFails {
        fn init(&mut self, _log: &mut Logger) -> anyhow::Result<()> {
            bail!("fixture missing")
        }

        fn run(&mut self, log: &mut Logger) -> anyhow::Result<TestResult> {
            log.log("run should not happen");
            Ok(TestResult::Pass)
        }

        fn destroy(&mut self, log: &mut Logger) -> anyhow::Result<()> {
            log.log("destroyed");
            Ok(())
        }
    }

    #[test]
    fn test_init_failure_skips_run_but_destroys() {
        let mut registry = Registry::new();
        registry.register::<InitFails>().unwrap();
        let mut log = Logger::buffered();

        let result = execute(&registry, &mut log, "InitFails");

        assert_eq!(result, Some(TestResult::Fail));
        let contents = log.contents();
        assert!(contents.contains(" InitFails: ERROR - fixture missing"));
        assert!(!contents.contains("run should not happen"));
        assert!(contents.contains(" InitFails: LOG - destroyed"));
        assert!(log.marker().is_idle());
    }

    #[test]
    fn test_panic_message_payloads() {
        let from_str = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(&*from_str), "static message");

        let from_string = panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(panic_message(&*from_string), "formatted 42");

        let opaque = panic::catch_unwind(|| std::panic::panic_any(7u8)).unwrap_err();
        assert_eq!(panic_message(&*opaque), "unknown panic payload");
    }

    #[test]
    fn test_unknown_unit_is_noop() {
        let registry = Registry::new();
        let mut log = Logger::buffered();

        assert_eq!(execute(&registry, &mut log, "Nope"), None);
        assert!(log.contents().is_empty());
        assert!(log.marker().is_idle());
    }

    #[test]
    fn test_error_context_is_logged() {
        struct Contextual;

        impl TestUnit for Contextual {
            fn init(&mut self, _log: &mut Logger) -> anyhow::Result<()> {
                Ok(())
            }

            fn run(&mut self, _log: &mut Logger) -> anyhow::Result<TestResult> {
                let connect: anyhow::Result<TestResult> = Err(anyhow::anyhow!("connection refused"));
                connect.context("opening database")
            }

            fn destroy(&mut self, _log: &mut Logger) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let mut registry = Registry::new();
        registry
            .register_fn("Contextual", || Box::new(Contextual) as Box<dyn TestUnit>)
            .unwrap();
        let mut log = Logger::buffered();

        assert_eq!(
            execute(&registry, &mut log, "Contextual"),
            Some(TestResult::Fail)
        );
        assert!(log
            .contents()
            .contains("ERROR - opening database: connection refused"));
    }
}

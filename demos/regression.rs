//! Example regression suite driven by the regtest command line
//!
//! ```text
//! cargo run --example regression
//! cargo run --example regression -- -t ExampleTest
//! cargo run --example regression -- -p demos
//! ```

use regtest_rs::{cli, Logger, Registry, TestResult, TestUnit};
use std::process::ExitCode;

#[derive(Default)]
struct ExampleTest;

impl TestUnit for ExampleTest {
    fn init(&mut self, log: &mut Logger) -> anyhow::Result<()> {
        log.log("Initialising example");
        Ok(())
    }

    fn run(&mut self, log: &mut Logger) -> anyhow::Result<TestResult> {
        log.log("This is an example test");
        Ok(TestResult::Pass)
    }

    fn destroy(&mut self, log: &mut Logger) -> anyhow::Result<()> {
        log.log("Cleaning up example");
        Ok(())
    }
}

/// Writes a scratch file in init and checks it in run
#[derive(Default)]
struct ScratchFileTest {
    path: Option<std::path::PathBuf>,
}

impl TestUnit for ScratchFileTest {
    fn init(&mut self, log: &mut Logger) -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("regtest-scratch-{}", std::process::id()));
        std::fs::write(&path, "scratch")?;
        log.log(format!("Created {}", path.display()));
        self.path = Some(path);
        Ok(())
    }

    fn run(&mut self, log: &mut Logger) -> anyhow::Result<TestResult> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("init did not create a file"))?;
        let contents = std::fs::read_to_string(path)?;
        if contents != "scratch" {
            log.warning(format!("Unexpected contents: {:?}", contents));
            return Ok(TestResult::Warn);
        }
        Ok(TestResult::Pass)
    }

    fn destroy(&mut self, _log: &mut Logger) -> anyhow::Result<()> {
        if let Some(path) = self.path.take() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn units() -> regtest_rs::Result<Registry> {
    let mut registry = Registry::new();
    registry.register::<ExampleTest>()?;
    registry.register::<ScratchFileTest>()?;
    Ok(registry)
}

fn main() -> ExitCode {
    match units() {
        Ok(registry) => cli::main(registry),
        Err(e) => {
            eprintln!("regression: {}", e);
            ExitCode::FAILURE
        }
    }
}

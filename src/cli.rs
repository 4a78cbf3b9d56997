//! Command-line front end
//!
//! Test binaries register their units and hand over to [`main`]:
//!
//! ```no_run
//! use regtest_rs::{cli, Registry};
//!
//! fn main() -> std::process::ExitCode {
//!     let registry = Registry::new();
//!     cli::main(registry)
//! }
//! ```

use crate::registry::Registry;
use crate::{regtest, Builder};
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use termcolor::ColorChoice;

/// Simple regression test tool
#[derive(Parser, Debug)]
#[command(name = "regtest", version, about)]
pub struct Args {
    /// Only load units declared in source files in this directory
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Run only this unit (may be repeated)
    #[arg(short = 't', long = "test", value_name = "NAME")]
    pub tests: Vec<String>,

    /// File name pattern used with --path
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
    pub color: ColorWhen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl Args {
    /// Turn parsed arguments into a configured builder
    pub fn into_builder(self, registry: Registry) -> Builder {
        let mut builder = regtest::run(registry).tests(self.tests);
        if let Some(path) = self.path {
            builder = builder.path(path);
        }
        if let Some(pattern) = self.pattern {
            builder = builder.pattern(pattern);
        }
        match self.color {
            ColorWhen::Auto => builder,
            ColorWhen::Always => builder.color(ColorChoice::Always),
            ColorWhen::Never => builder.color(ColorChoice::Never),
        }
    }
}

/// Parse the process arguments and run
pub fn main(registry: Registry) -> ExitCode {
    main_from(registry, std::env::args_os())
}

/// Parse the given arguments and run
pub fn main_from<I, T>(registry: Registry, args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match args.into_builder(registry).execute() {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("regtest: {}", e);
            ExitCode::FAILURE
        }
    }
}

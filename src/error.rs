//! Error types for regtest-rs

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a run from starting.
///
/// Failures raised by a test unit's own phases never show up here; the
/// executor turns those into [`TestResult::Fail`](crate::TestResult::Fail).
#[derive(Error, Debug)]
pub enum Error {
    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// WalkDir error
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Two units were registered under the same name
    #[error("A test unit named '{name}' is already registered")]
    DuplicateUnit { name: String },

    /// The load path does not name a directory
    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },
}

impl Error {
    /// Create a duplicate registration error
    pub fn duplicate_unit(name: impl Into<String>) -> Self {
        Error::DuplicateUnit { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::duplicate_unit("ExampleTest");
        assert_eq!(
            err.to_string(),
            "A test unit named 'ExampleTest' is already registered"
        );

        let err = Error::NotADirectory {
            path: PathBuf::from("units/missing"),
        };
        assert_eq!(err.to_string(), "'units/missing' is not a directory");
    }
}

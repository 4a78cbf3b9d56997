//! Test execution module

pub mod aggregate;
pub mod execution;
pub mod params;

// Re-export public types
pub use aggregate::{execute_all, execute_selected, ResultTable, RunStatus, RunSummary};
pub use execution::execute;
pub use params::RunParams;

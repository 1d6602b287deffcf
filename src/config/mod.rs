//! Table configuration
//!
//! Options are validated once when loaded; the planner and the scan read
//! them without further checks.

mod errors;
mod options;

pub use errors::{ConfigError, ConfigErrorCode, ConfigResult, Severity};
pub use options::{ColumnOptions, TableOptions, TableSource};

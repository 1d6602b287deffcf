//! Scan planning for swath tables
//!
//! Turns the host's view of a relation (referenced expressions, base and
//! join clauses, equivalence groups) into costed scan paths and finally a
//! serializable [`ScanPlan`].
//!
//! A path owns the clauses it fully evaluates: catalog comparisons pushed
//! into the catalog query and geometry checks applied per row. Everything
//! else is returned to the host for recheck.

mod errors;
mod host;
mod plan;
mod scan_planner;

pub use errors::{PlanError, PlanErrorCode, PlanResult, Severity};
pub use host::{HostPlanner, RelationInput};
pub use plan::{RelSize, ScanPath, ScanPlan};
pub use scan_planner::ScanPlanner;

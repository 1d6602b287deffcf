//! Geometry operators and bounding-box evaluation
//!
//! Footprint relations are evaluated in two places:
//! - at plan time, rewritten into a catalog filter on the file footprint
//!   via [`GeomPredicate::pushdown`]
//! - at scan time, per row, via [`filter_rows`]

mod bbox;
mod operator;
mod predicates;

pub use bbox::{Bounds, GeoBox, GeoPoint};
pub use operator::{GeomOperator, GeomPredicate, Pushdown, NUM_OPERATORS, NUM_REAL_OPERATORS};
pub use predicates::{eval_op, filter_rows, Candidates, FootprintLayout};

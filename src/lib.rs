//! hvault - SQL access to satellite swath files
//!
//! A catalog table lists swath files with their acquisition time and
//! footprint. Queries against a swath table are planned into a catalog
//! query that selects candidate files, plus per-pixel geometry checks
//! applied while the files are read line by line.

pub mod analyze;
pub mod catalog;
pub mod config;
pub mod expr;
pub mod geometry;
pub mod observability;
pub mod planner;
pub mod scan;

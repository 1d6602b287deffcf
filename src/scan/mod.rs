//! Scan execution for swath tables
//!
//! Files come from the catalog cursor, or from the table's single
//! configured file. Each file is read line by line through the host's
//! [`FileReader`]; footprint edges are derived from the geolocation lines
//! and the geometry checks of the plan are applied to every line before its
//! samples become rows.

mod errors;
mod executor;
mod file;
mod footprint;
mod reader;
mod row;

pub use errors::{ReadError, ScanError, ScanErrorCode, ScanResult, Severity};
pub use executor::SwathScan;
pub use file::{FileLayout, FileScanState};
pub use footprint::{Edge, FootprintEngine, LineWindow};
pub use reader::{DatasetInfo, FileReader, LineBuffer, SwathFile};
pub use row::{Row, Value};

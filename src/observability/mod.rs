//! Observability for hvault
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed event names
//! - Per-scan counters
//!
//! Observability never changes planning or scan results.
//!
//! ```ignore
//! use hvault::observability::{Event, Logger};
//!
//! Logger::event(Event::FileOpened, &[("file_id", "42")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, ScanMetrics};

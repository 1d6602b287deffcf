//! Observable events emitted by hvault
//!
//! Events are explicit and typed; every log line the crate writes names one.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Planning
    /// Relation size estimated
    RelSizeEstimated,
    /// Qualifier fully evaluable by the catalog
    QualCatalogDetected,
    /// Qualifier compares a footprint or point column with a geometry
    QualFootprintDetected,
    /// Qualifier could not be deparsed and is left to the host
    QualDeparseFailed,
    /// Equivalence group usable for join pushdown
    JoinGroupDetected,
    /// Join relid set rejected
    JoinRelidsIgnored,
    /// Candidate scan path produced
    PathAdded,
    /// Clause absorbed by the scan, not rechecked by the host
    ClauseAbsorbed,
    /// Final scan plan built
    PlanCreated,

    // Catalog cursor
    /// Statement prepared for the catalog query
    CatalogPrepared,
    /// Cursor opened with parameter values
    CatalogCursorStarted,
    /// Cursor closed, statement retained
    CatalogCursorReset,
    /// Cursor and statement released
    CatalogCursorFreed,
    /// Catalog row with missing required values
    CatalogRowSkipped,

    // Scan
    /// Scan state initialised
    ScanBegin,
    /// Scan restarted with new parameters
    ScanRescan,
    /// Scan resources released
    ScanEnd,
    /// Swath file opened
    FileOpened,
    /// Swath file could not be opened
    FileOpenFailed,
    /// Line read failed, rest of file skipped
    FileReadFailed,
    /// No more files to scan
    ScanExhausted,
}

impl Event {
    /// Returns the event name as written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RelSizeEstimated => "REL_SIZE_ESTIMATED",
            Event::QualCatalogDetected => "QUAL_CATALOG_DETECTED",
            Event::QualFootprintDetected => "QUAL_FOOTPRINT_DETECTED",
            Event::QualDeparseFailed => "QUAL_DEPARSE_FAILED",
            Event::JoinGroupDetected => "JOIN_GROUP_DETECTED",
            Event::JoinRelidsIgnored => "JOIN_RELIDS_IGNORED",
            Event::PathAdded => "PATH_ADDED",
            Event::ClauseAbsorbed => "CLAUSE_ABSORBED",
            Event::PlanCreated => "PLAN_CREATED",
            Event::CatalogPrepared => "CATALOG_PREPARED",
            Event::CatalogCursorStarted => "CATALOG_CURSOR_STARTED",
            Event::CatalogCursorReset => "CATALOG_CURSOR_RESET",
            Event::CatalogCursorFreed => "CATALOG_CURSOR_FREED",
            Event::CatalogRowSkipped => "CATALOG_ROW_SKIPPED",
            Event::ScanBegin => "SCAN_BEGIN",
            Event::ScanRescan => "SCAN_RESCAN",
            Event::ScanEnd => "SCAN_END",
            Event::FileOpened => "FILE_OPENED",
            Event::FileOpenFailed => "FILE_OPEN_FAILED",
            Event::FileReadFailed => "FILE_READ_FAILED",
            Event::ScanExhausted => "SCAN_EXHAUSTED",
        }
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::CatalogRowSkipped
            | Event::FileOpenFailed
            | Event::FileReadFailed
            | Event::JoinRelidsIgnored
            | Event::QualDeparseFailed => Severity::Warn,
            Event::ScanBegin | Event::ScanEnd | Event::PlanCreated => Severity::Info,
            _ => Severity::Debug,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

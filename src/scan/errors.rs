//! Scan error types
//!
//! Error codes:
//! - HVAULT_SCAN_FAILED (ERROR)
//! - HVAULT_SCAN_PARAMETER_INVALID (ERROR)
//! - HVAULT_SCAN_FILE_READ_FAILED (ERROR)
//! - HVAULT_SCAN_CATALOG (inherits the catalog error severity)
//!
//! Only `HVAULT_SCAN_FILE_READ_FAILED` is recovered inside the scan: the
//! file is logged and skipped. Everything else ends the scan.

use std::fmt;

use thiserror::Error;

use crate::catalog::{CatalogError, CatalogErrorCode};

/// Severity levels for scan errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Scan error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorCode {
    /// Scan cannot continue
    HvaultScanFailed,
    /// Parameter values do not match the plan
    HvaultScanParameterInvalid,
    /// File could not be opened or read
    HvaultScanFileReadFailed,
    /// Catalog access failed
    HvaultScanCatalog(CatalogErrorCode),
}

impl ScanErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ScanErrorCode::HvaultScanFailed => "HVAULT_SCAN_FAILED",
            ScanErrorCode::HvaultScanParameterInvalid => "HVAULT_SCAN_PARAMETER_INVALID",
            ScanErrorCode::HvaultScanFileReadFailed => "HVAULT_SCAN_FILE_READ_FAILED",
            ScanErrorCode::HvaultScanCatalog(c) => c.code(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ScanErrorCode::HvaultScanCatalog(CatalogErrorCode::HvaultCatalogPackCorrupted) => {
                Severity::Fatal
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ScanErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Scan error with context
#[derive(Debug, Clone)]
pub struct ScanError {
    code: ScanErrorCode,
    message: String,
}

impl ScanError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            code: ScanErrorCode::HvaultScanFailed,
            message: reason.into(),
        }
    }

    pub fn parameter_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: ScanErrorCode::HvaultScanParameterInvalid,
            message: reason.into(),
        }
    }

    pub fn file_read_failed(path: &str, err: &ReadError) -> Self {
        Self {
            code: ScanErrorCode::HvaultScanFileReadFailed,
            message: format!("{}: {}", path, err),
        }
    }

    pub fn code(&self) -> ScanErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ScanError {}

impl From<CatalogError> for ScanError {
    fn from(err: CatalogError) -> Self {
        Self {
            code: ScanErrorCode::HvaultScanCatalog(err.code()),
            message: err.message().to_string(),
        }
    }
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Failure reported by the file reader
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadError {
    #[error("Can't open file: {0}")]
    Open(String),

    #[error("Dataset {0} not found")]
    MissingDataset(String),

    #[error("Can't read line {line} of dataset {dataset}: {reason}")]
    Line {
        dataset: String,
        line: usize,
        reason: String,
    },

    #[error("Dataset {dataset} is {found}, expected {expected}")]
    Shape {
        dataset: String,
        expected: String,
        found: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_errors_wrap() {
        let err: ScanError = CatalogError::fetch_failed("connection lost").into();
        assert_eq!(err.code().code(), "HVAULT_CATALOG_FETCH_FAILED");
        assert_eq!(err.severity(), Severity::Error);

        let fatal: ScanError = CatalogError::pack_corrupted(1, 2).into();
        assert_eq!(fatal.severity(), Severity::Fatal);
    }

    #[test]
    fn test_display() {
        let read = ReadError::Line {
            dataset: "Latitude".into(),
            line: 4,
            reason: "short read".into(),
        };
        let err = ScanError::file_read_failed("/data/a.hdf", &read);
        assert_eq!(
            err.to_string(),
            "[ERROR] HVAULT_SCAN_FILE_READ_FAILED: /data/a.hdf: \
             Can't read line 4 of dataset Latitude: short read"
        );
    }
}

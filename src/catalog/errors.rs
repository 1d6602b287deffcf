//! Catalog error types
//!
//! Error codes:
//! - HVAULT_CATALOG_QUERY_INVALID (ERROR)
//! - HVAULT_CATALOG_PREPARE_FAILED (ERROR)
//! - HVAULT_CATALOG_EXECUTE_FAILED (ERROR)
//! - HVAULT_CATALOG_FETCH_FAILED (ERROR)
//! - HVAULT_CATALOG_PACK_CORRUPTED (FATAL)
//!
//! Catalog access errors are never retried; the whole scan fails.

use std::fmt;

use thiserror::Error;

/// Severity levels for catalog errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query fails
    Error,
    /// Plan state is corrupted and must not be executed
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

/// Catalog error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorCode {
    /// Query cannot be built (no columns, bad packed form)
    HvaultCatalogQueryInvalid,
    /// Statement preparation failed
    HvaultCatalogPrepareFailed,
    /// Cursor open or count query failed
    HvaultCatalogExecuteFailed,
    /// Row fetch failed
    HvaultCatalogFetchFailed,
    /// Packed query checksum mismatch
    HvaultCatalogPackCorrupted,
}

impl CatalogErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogErrorCode::HvaultCatalogQueryInvalid => "HVAULT_CATALOG_QUERY_INVALID",
            CatalogErrorCode::HvaultCatalogPrepareFailed => "HVAULT_CATALOG_PREPARE_FAILED",
            CatalogErrorCode::HvaultCatalogExecuteFailed => "HVAULT_CATALOG_EXECUTE_FAILED",
            CatalogErrorCode::HvaultCatalogFetchFailed => "HVAULT_CATALOG_FETCH_FAILED",
            CatalogErrorCode::HvaultCatalogPackCorrupted => "HVAULT_CATALOG_PACK_CORRUPTED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CatalogErrorCode::HvaultCatalogPackCorrupted => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for CatalogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Catalog error with context
#[derive(Debug, Clone)]
pub struct CatalogError {
    code: CatalogErrorCode,
    message: String,
}

impl CatalogError {
    pub fn query_invalid(reason: impl Into<String>) -> Self {
        Self {
            code: CatalogErrorCode::HvaultCatalogQueryInvalid,
            message: reason.into(),
        }
    }

    pub fn prepare_failed(query: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: CatalogErrorCode::HvaultCatalogPrepareFailed,
            message: format!("Can't prepare query for catalog: {}: {}", query, reason),
        }
    }

    pub fn execute_failed(reason: impl fmt::Display) -> Self {
        Self {
            code: CatalogErrorCode::HvaultCatalogExecuteFailed,
            message: format!("Can't execute catalog query: {}", reason),
        }
    }

    pub fn fetch_failed(reason: impl fmt::Display) -> Self {
        Self {
            code: CatalogErrorCode::HvaultCatalogFetchFailed,
            message: format!("Can't fetch catalog row: {}", reason),
        }
    }

    pub fn pack_corrupted(expected: u32, actual: u32) -> Self {
        Self {
            code: CatalogErrorCode::HvaultCatalogPackCorrupted,
            message: format!(
                "Packed query checksum mismatch: expected {:08x}, got {:08x}",
                expected, actual
            ),
        }
    }

    pub fn code(&self) -> CatalogErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CatalogError {
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

impl std::error::Error for CatalogError {}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Expression that cannot be rendered as catalog query text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeparseError {
    #[error("Unsupported expression node: {0}")]
    UnsupportedNode(String),

    #[error("Column {0} has no catalog counterpart")]
    NoCatalogColumn(usize),

    #[error("Expression has no operands: {0}")]
    MissingOperand(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CatalogErrorCode::HvaultCatalogFetchFailed.code(),
            "HVAULT_CATALOG_FETCH_FAILED"
        );
        assert_eq!(
            CatalogErrorCode::HvaultCatalogPackCorrupted.severity(),
            Severity::Fatal
        );
    }

    #[test]
    fn test_display() {
        let err = CatalogError::prepare_failed("SELECT", "syntax error");
        let s = err.to_string();
        assert!(s.starts_with("[ERROR] HVAULT_CATALOG_PREPARE_FAILED"));
        assert!(s.contains("syntax error"));

        let d = DeparseError::UnsupportedNode("SubLink".into());
        assert_eq!(d.to_string(), "Unsupported expression node: SubLink");
    }
}

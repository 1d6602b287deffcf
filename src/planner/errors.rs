//! Planner error types
//!
//! Error codes:
//! - HVAULT_PLAN_CONFIG (ERROR)
//! - HVAULT_PLAN_CATALOG (ERROR)
//! - HVAULT_PLAN_INVALID_INPUT (ERROR)
//!
//! Planning fails only on configuration and catalog problems. A clause the
//! scan cannot use is never an error; it is left to the host.

use std::fmt;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query fails before producing rows
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Planner error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanErrorCode {
    /// Table or column options unusable
    HvaultPlanConfig,
    /// Catalog estimate, count or query build failed
    HvaultPlanCatalog,
    /// Host input inconsistent with the table
    HvaultPlanInvalidInput,
}

impl PlanErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            PlanErrorCode::HvaultPlanConfig => "HVAULT_PLAN_CONFIG",
            PlanErrorCode::HvaultPlanCatalog => "HVAULT_PLAN_CATALOG",
            PlanErrorCode::HvaultPlanInvalidInput => "HVAULT_PLAN_INVALID_INPUT",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for PlanErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error with context
#[derive(Debug, Clone)]
pub struct PlanError {
    code: PlanErrorCode,
    message: String,
    /// Code of the underlying error, if any
    source_code: Option<&'static str>,
}

impl PlanError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self {
            code: PlanErrorCode::HvaultPlanInvalidInput,
            message: reason.into(),
            source_code: None,
        }
    }

    pub fn code(&self) -> PlanErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Code of the configuration or catalog error this wraps
    pub fn source_code(&self) -> Option<&'static str> {
        self.source_code
    }
}

impl fmt::Display for PlanError {
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

impl std::error::Error for PlanError {}

impl From<ConfigError> for PlanError {
    fn from(err: ConfigError) -> Self {
        Self {
            code: PlanErrorCode::HvaultPlanConfig,
            message: err.message().to_string(),
            source_code: Some(err.code().code()),
        }
    }
}

impl From<CatalogError> for PlanError {
    fn from(err: CatalogError) -> Self {
        Self {
            code: PlanErrorCode::HvaultPlanCatalog,
            message: err.message().to_string(),
            source_code: Some(err.code().code()),
        }
    }
}

/// Result type for planner operations
pub type PlanResult<T> = Result<T, PlanError>;

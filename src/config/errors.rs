//! Configuration error types
//!
//! Error codes:
//! - HVAULT_CONFIG_INVALID (ERROR)
//! - HVAULT_CONFIG_MISSING_OPTION (ERROR)
//! - HVAULT_CONFIG_UNKNOWN_COLUMN_TYPE (ERROR)
//! - HVAULT_CONFIG_COLUMN_TYPE_MISMATCH (ERROR)
//! - HVAULT_CONFIG_GEOMETRY_UNAVAILABLE (ERROR)
//! - HVAULT_CONFIG_IO (ERROR)
//!
//! All configuration errors abort the query before any row is produced.

use std::fmt;

/// Severity levels for configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query fails, session continues
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// Malformed options document or invalid value
    HvaultConfigInvalid,
    /// Required table option absent
    HvaultConfigMissingOption,
    /// Column `type` option not recognised
    HvaultConfigUnknownColumnType,
    /// Host column declared with the wrong SQL type
    HvaultConfigColumnTypeMismatch,
    /// Geometry type or operators not installed in the host
    HvaultConfigGeometryUnavailable,
    /// Options file could not be read
    HvaultConfigIo,
}

impl ConfigErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::HvaultConfigInvalid => "HVAULT_CONFIG_INVALID",
            ConfigErrorCode::HvaultConfigMissingOption => "HVAULT_CONFIG_MISSING_OPTION",
            ConfigErrorCode::HvaultConfigUnknownColumnType => "HVAULT_CONFIG_UNKNOWN_COLUMN_TYPE",
            ConfigErrorCode::HvaultConfigColumnTypeMismatch => {
                "HVAULT_CONFIG_COLUMN_TYPE_MISMATCH"
            }
            ConfigErrorCode::HvaultConfigGeometryUnavailable => {
                "HVAULT_CONFIG_GEOMETRY_UNAVAILABLE"
            }
            ConfigErrorCode::HvaultConfigIo => "HVAULT_CONFIG_IO",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Configuration error with context
#[derive(Debug, Clone)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
    /// Option or column the error refers to
    field: Option<String>,
}

impl ConfigError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::HvaultConfigInvalid,
            message: reason.into(),
            field: None,
        }
    }

    /// Create an invalid-value error for one option
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        let o = option.into();
        Self {
            code: ConfigErrorCode::HvaultConfigInvalid,
            message: format!("Option '{}': {}", o, reason.into()),
            field: Some(o),
        }
    }

    pub fn missing_option(option: impl Into<String>) -> Self {
        let o = option.into();
        Self {
            code: ConfigErrorCode::HvaultConfigMissingOption,
            message: format!("Option '{}' is required", o),
            field: Some(o),
        }
    }

    pub fn unknown_column_type(column: impl Into<String>, type_name: &str) -> Self {
        let c = column.into();
        Self {
            code: ConfigErrorCode::HvaultConfigUnknownColumnType,
            message: format!("Column '{}' has unknown type '{}'", c, type_name),
            field: Some(c),
        }
    }

    pub fn column_type_mismatch(column: impl Into<String>, expected: &str, found: &str) -> Self {
        let c = column.into();
        Self {
            code: ConfigErrorCode::HvaultConfigColumnTypeMismatch,
            message: format!(
                "Column '{}' must be declared as {}, found {}",
                c, expected, found
            ),
            field: Some(c),
        }
    }

    pub fn geometry_unavailable(reason: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::HvaultConfigGeometryUnavailable,
            message: reason.into(),
            field: None,
        }
    }

    pub fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        let p = path.into();
        Self {
            code: ConfigErrorCode::HvaultConfigIo,
            message: format!("Failed to read '{}': {}", p, err),
            field: Some(p),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for ConfigError {
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

impl std::error::Error for ConfigError {}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

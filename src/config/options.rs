//! Foreign table and column options
//!
//! Options are normally supplied by the host as key/value pairs; they can
//! also be loaded from a JSON document for tooling and tests.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use crate::expr::ColumnType;

/// Per-column options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOptions {
    /// Column name in the host table
    pub name: String,

    /// Column kind; absent means a float dataset
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,

    /// Catalog column backing this column, if any
    #[serde(default)]
    pub cat_name: Option<String>,

    /// Raw dataset name; defaults to the column name
    #[serde(default)]
    pub sds: Option<String>,

    /// Raw value fill marker; values equal to it read as null
    #[serde(default)]
    pub fill_value: Option<f64>,

    /// Dataset scale factor (default: 1.0)
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Dataset offset (default: 0.0)
    #[serde(default)]
    pub offset: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl ColumnOptions {
    /// Column with no options besides its name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            cat_name: None,
            sds: None,
            fill_value: None,
            scale: default_scale(),
            offset: 0.0,
        }
    }

    pub fn with_type(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn with_cat_name(mut self, cat_name: &str) -> Self {
        self.cat_name = Some(cat_name.to_string());
        self
    }

    pub fn with_sds(mut self, sds: &str) -> Self {
        self.sds = Some(sds.to_string());
        self
    }

    /// Resolved column kind
    pub fn column_type(&self) -> ConfigResult<ColumnType> {
        ColumnType::parse(self.type_name.as_deref()).ok_or_else(|| {
            ConfigError::unknown_column_type(
                self.name.clone(),
                self.type_name.as_deref().unwrap_or(""),
            )
        })
    }

    /// Dataset read from the file for this column
    pub fn dataset_name(&self) -> &str {
        self.sds.as_deref().unwrap_or(&self.name)
    }

    /// Catalog column name; catalog columns default to their own name
    pub fn catalog_name(&self) -> Option<&str> {
        match (&self.cat_name, self.type_name.as_deref()) {
            (Some(c), _) => Some(c),
            (None, Some("catalog")) => Some(&self.name),
            _ => None,
        }
    }
}

/// Foreign table options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Catalog table listing the files to scan
    #[serde(default)]
    pub catalog: Option<String>,

    /// Single file to scan without a catalog
    #[serde(default)]
    pub filename: Option<String>,

    /// Fixed cost charged once per scan (default: 10)
    #[serde(default = "default_startup_cost")]
    pub startup_cost: f64,

    /// Cost of opening and reading one file (default: 10)
    #[serde(default = "default_file_read_cost")]
    pub file_read_cost: f64,

    /// Cost of evaluating predicates on one row (default: 0.001)
    #[serde(default = "default_predicate_cost")]
    pub predicate_cost: f64,

    /// Cost per byte of output (default: 0.001)
    #[serde(default = "default_byte_cost")]
    pub byte_cost: f64,

    /// Estimated rows in one file (default: 2030 lines x 1354 samples)
    #[serde(default = "default_rows_per_file")]
    pub rows_per_file: f64,

    /// Lines per instrument scan (default: 10)
    #[serde(default = "default_scan_size")]
    pub scan_size: usize,

    /// Catalog column holding the file footprint (default: "footprint")
    #[serde(default = "default_catalog_footprint")]
    pub catalog_footprint: String,

    /// Catalog column holding the file id (default: "file_id")
    #[serde(default = "default_file_id_column")]
    pub file_id_column: String,

    /// Catalog column holding the file path (default: "filename")
    #[serde(default = "default_filename_column")]
    pub filename_column: String,

    /// Catalog column holding the file start time (default: "starttime")
    #[serde(default = "default_starttime_column")]
    pub starttime_column: String,

    /// Latitude dataset name (default: "Latitude")
    #[serde(default = "default_latitude_dataset")]
    pub latitude_dataset: String,

    /// Longitude dataset name (default: "Longitude")
    #[serde(default = "default_longitude_dataset")]
    pub longitude_dataset: String,

    /// Table columns in attribute order
    #[serde(default)]
    pub columns: Vec<ColumnOptions>,
}

fn default_startup_cost() -> f64 {
    10.0
}

fn default_file_read_cost() -> f64 {
    10.0
}

fn default_predicate_cost() -> f64 {
    0.001
}

fn default_byte_cost() -> f64 {
    0.001
}

fn default_rows_per_file() -> f64 {
    2_748_620.0
}

fn default_scan_size() -> usize {
    10
}

fn default_catalog_footprint() -> String {
    "footprint".to_string()
}

fn default_file_id_column() -> String {
    "file_id".to_string()
}

fn default_filename_column() -> String {
    "filename".to_string()
}

fn default_starttime_column() -> String {
    "starttime".to_string()
}

fn default_latitude_dataset() -> String {
    "Latitude".to_string()
}

fn default_longitude_dataset() -> String {
    "Longitude".to_string()
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            catalog: None,
            filename: None,
            startup_cost: default_startup_cost(),
            file_read_cost: default_file_read_cost(),
            predicate_cost: default_predicate_cost(),
            byte_cost: default_byte_cost(),
            rows_per_file: default_rows_per_file(),
            scan_size: default_scan_size(),
            catalog_footprint: default_catalog_footprint(),
            file_id_column: default_file_id_column(),
            filename_column: default_filename_column(),
            starttime_column: default_starttime_column(),
            latitude_dataset: default_latitude_dataset(),
            longitude_dataset: default_longitude_dataset(),
            columns: Vec::new(),
        }
    }
}

/// Where the scanned files come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource<'a> {
    Catalog(&'a str),
    File(&'a str),
}

impl TableOptions {
    /// Options for a catalog-backed table
    pub fn with_catalog(catalog: &str, columns: Vec<ColumnOptions>) -> Self {
        Self {
            catalog: Some(catalog.to_string()),
            columns,
            ..Default::default()
        }
    }

    /// Options for a single-file table
    pub fn with_file(filename: &str, columns: Vec<ColumnOptions>) -> Self {
        Self {
            filename: Some(filename.to_string()),
            columns,
            ..Default::default()
        }
    }

    /// Loads and validates options from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        Self::from_json(&content)
    }

    /// Parses and validates options from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let options: TableOptions = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid(format!("Invalid JSON: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Checks option consistency
    pub fn validate(&self) -> ConfigResult<()> {
        // 1. Exactly one file source
        match (&self.catalog, &self.filename) {
            (None, None) => return Err(ConfigError::missing_option("catalog")),
            (Some(_), Some(_)) => {
                return Err(ConfigError::invalid(
                    "Options 'catalog' and 'filename' are mutually exclusive",
                ))
            }
            _ => {}
        }

        // 2. Costs and sizes
        for (name, value) in [
            ("startup_cost", self.startup_cost),
            ("file_read_cost", self.file_read_cost),
            ("predicate_cost", self.predicate_cost),
            ("byte_cost", self.byte_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid_option(name, "must be a non-negative number"));
            }
        }
        if !self.rows_per_file.is_finite() || self.rows_per_file < 1.0 {
            return Err(ConfigError::invalid_option("rows_per_file", "must be at least 1"));
        }
        if self.scan_size == 0 {
            return Err(ConfigError::invalid_option("scan_size", "must be positive"));
        }

        // 3. Columns
        for (i, col) in self.columns.iter().enumerate() {
            if col.name.is_empty() {
                return Err(ConfigError::invalid(format!("Column {} has no name", i)));
            }
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(ConfigError::invalid_option(
                    col.name.clone(),
                    "duplicate column",
                ));
            }
            col.column_type()?;
            if col.scale == 0.0 || !col.scale.is_finite() {
                return Err(ConfigError::invalid_option(
                    col.name.clone(),
                    "scale must be finite and non-zero",
                ));
            }
        }
        Ok(())
    }

    /// Source of the scanned files
    pub fn source(&self) -> ConfigResult<TableSource<'_>> {
        match (&self.catalog, &self.filename) {
            (Some(c), None) => Ok(TableSource::Catalog(c)),
            (None, Some(f)) => Ok(TableSource::File(f)),
            (None, None) => Err(ConfigError::missing_option("catalog")),
            (Some(_), Some(_)) => Err(ConfigError::invalid(
                "Options 'catalog' and 'filename' are mutually exclusive",
            )),
        }
    }

    /// Verifies the host SQL type of every column against its kind
    ///
    /// `host_types` lists the declared type of each column in attribute
    /// order. `geometry_available` reports whether the host has a geometry
    /// type installed.
    pub fn check_column_types(
        &self,
        host_types: &[&str],
        geometry_available: bool,
    ) -> ConfigResult<()> {
        if host_types.len() != self.columns.len() {
            return Err(ConfigError::invalid(format!(
                "Table declares {} columns, options describe {}",
                host_types.len(),
                self.columns.len()
            )));
        }

        for (col, host_type) in self.columns.iter().zip(host_types) {
            let kind = col.column_type()?;
            let expected = match kind.expected_host_type() {
                Some(t) => t,
                None => continue,
            };
            if expected == "geometry" && !geometry_available {
                return Err(ConfigError::geometry_unavailable(format!(
                    "Column '{}' requires the geometry type",
                    col.name
                )));
            }
            if *host_type != expected {
                return Err(ConfigError::column_type_mismatch(
                    col.name.clone(),
                    expected,
                    host_type,
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigErrorCode;

    #[test]
    fn test_defaults() {
        let opts = TableOptions::default();
        assert_eq!(opts.startup_cost, 10.0);
        assert_eq!(opts.predicate_cost, 0.001);
        assert_eq!(opts.rows_per_file, 2_748_620.0);
        assert_eq!(opts.scan_size, 10);
        assert_eq!(opts.catalog_footprint, "footprint");
        assert_eq!(opts.latitude_dataset, "Latitude");
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let opts = TableOptions::from_json(
            r#"{"catalog": "modis_files", "scan_size": 20,
                "columns": [{"name": "lat"}, {"name": "fp", "type": "footprint"}]}"#,
        )
        .unwrap();
        assert_eq!(opts.catalog.as_deref(), Some("modis_files"));
        assert_eq!(opts.scan_size, 20);
        assert_eq!(opts.file_read_cost, 10.0);
        assert_eq!(opts.columns[0].dataset_name(), "lat");
        assert_eq!(opts.columns[0].scale, 1.0);
        assert_eq!(opts.columns[1].column_type().unwrap(), ColumnType::Footprint);
    }

    #[test]
    fn test_source_required() {
        let err = TableOptions::from_json(r#"{"columns": []}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::HvaultConfigMissingOption);

        let err = TableOptions::from_json(r#"{"catalog": "c", "filename": "f"}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::HvaultConfigInvalid);
    }

    #[test]
    fn test_unknown_column_type_rejected() {
        let err = TableOptions::from_json(
            r#"{"catalog": "c", "columns": [{"name": "x", "type": "raster"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::HvaultConfigUnknownColumnType);
        assert_eq!(err.field(), Some("x"));
    }

    #[test]
    fn test_catalog_name_defaults() {
        let c = ColumnOptions::named("orbit").with_type("catalog");
        assert_eq!(c.catalog_name(), Some("orbit"));
        let d = ColumnOptions::named("sst").with_cat_name("has_sst");
        assert_eq!(d.catalog_name(), Some("has_sst"));
        assert_eq!(ColumnOptions::named("sst").catalog_name(), None);
    }

    #[test]
    fn test_check_column_types() {
        let opts = TableOptions::with_catalog(
            "c",
            vec![
                ColumnOptions::named("v"),
                ColumnOptions::named("fp").with_type("footprint"),
                ColumnOptions::named("line").with_type("line_index"),
                ColumnOptions::named("orbit").with_type("catalog"),
            ],
        );
        assert!(opts
            .check_column_types(&["float8", "geometry", "int4", "text"], true)
            .is_ok());

        let err = opts
            .check_column_types(&["float8", "geometry", "int8", "text"], true)
            .unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::HvaultConfigColumnTypeMismatch);

        let err = opts
            .check_column_types(&["float8", "geometry", "int4", "text"], false)
            .unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::HvaultConfigGeometryUnavailable);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        fs::write(&path, r#"{"filename": "/data/MOD021KM.hdf"}"#).unwrap();

        let opts = TableOptions::load(&path).unwrap();
        assert_eq!(opts.source().unwrap(), TableSource::File("/data/MOD021KM.hdf"));

        let missing = TableOptions::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(missing.code(), ConfigErrorCode::HvaultConfigIo);
    }
}

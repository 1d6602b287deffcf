//! Per-query table metadata

use crate::config::{ColumnOptions, ConfigError, ConfigResult, TableOptions, TableSource};
use crate::expr::{ColumnType, Relid, Var};

/// Table options plus the column kinds resolved for one query
///
/// Every column starts as [`ColumnType::Null`]; a column is resolved the
/// first time the query references it and never changes afterwards.
#[derive(Debug, Clone)]
pub struct TableInfo {
    relid: Relid,
    options: TableOptions,
    types: Vec<ColumnType>,
}

impl TableInfo {
    /// Validates `options` and creates table info for relation `relid`
    pub fn new(relid: Relid, options: TableOptions) -> ConfigResult<Self> {
        options.validate()?;
        let types = vec![ColumnType::Null; options.columns.len()];
        Ok(Self {
            relid,
            options,
            types,
        })
    }

    pub fn relid(&self) -> Relid {
        self.relid
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn source(&self) -> ConfigResult<TableSource<'_>> {
        self.options.source()
    }

    pub fn num_columns(&self) -> usize {
        self.types.len()
    }

    pub fn column(&self, attno: usize) -> Option<&ColumnOptions> {
        self.options.columns.get(attno)
    }

    /// Resolved kind of a column, `Null` if not referenced yet
    pub fn column_type(&self, attno: usize) -> ColumnType {
        self.types.get(attno).copied().unwrap_or(ColumnType::Null)
    }

    /// Resolved kinds of all columns in attribute order
    pub fn column_types(&self) -> &[ColumnType] {
        &self.types
    }

    /// True if `var` is a column of this relation
    pub fn is_local(&self, var: &Var) -> bool {
        var.relid == self.relid
    }

    /// Catalog column name a local column renders as
    pub fn catalog_column(&self, attno: usize) -> Option<&str> {
        self.column(attno).and_then(|c| c.catalog_name())
    }

    /// Resolves a column kind from its options; idempotent
    pub fn resolve_column(&mut self, attno: usize) -> ConfigResult<ColumnType> {
        let current = *self.types.get(attno).ok_or_else(|| {
            ConfigError::invalid(format!(
                "Attribute {} out of range for table with {} columns",
                attno,
                self.types.len()
            ))
        })?;
        if current != ColumnType::Null {
            return Ok(current);
        }
        let resolved = self.options.columns[attno].column_type()?;
        self.types[attno] = resolved;
        Ok(resolved)
    }
}

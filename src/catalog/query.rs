//! Catalog query builder
//!
//! Accumulates output columns, filter text, sort keys and a limit during
//! planning. A builder is cloned to explore sibling join paths; clones share
//! nothing.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::checksum::query_checksum;
use super::deparse::Deparser;
use super::errors::{CatalogError, CatalogResult, DeparseError};
use super::quote::{quote_identifier, quote_qualified};
use crate::analyze::{append_unique, Qual, QualKind, TableInfo};
use crate::config::TableSource;
use crate::expr::Expr;
use crate::geometry::Pushdown;

/// Catalog plan estimate returned by the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CatalogEstimate {
    pub startup_cost: f64,
    pub total_cost: f64,
    pub rows: f64,
    pub width: usize,
}

/// Plans trial catalog queries
pub trait CatalogEstimator {
    /// Estimates `query` whose placeholders have the given types
    fn estimate(&self, query: &str, param_types: &[&str]) -> CatalogResult<CatalogEstimate>;
}

/// Catalog query under construction
#[derive(Debug, Clone)]
pub struct CatalogQuery<'a> {
    table: &'a TableInfo,
    columns: Vec<String>,
    filter: String,
    sort: Vec<(String, bool)>,
    limit: Option<u64>,
    params: Vec<Expr>,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(table: &'a TableInfo) -> Self {
        Self {
            table,
            columns: Vec::new(),
            filter: String::new(),
            sort: Vec::new(),
            limit: None,
            params: Vec::new(),
        }
    }

    /// Adds an output column; adding the same name twice is a no-op
    pub fn add_column(&mut self, name: &str) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Appends a qual to the filter
    ///
    /// On error the query is left exactly as it was. A geometry qual that
    /// has no catalog rewrite adds no text, only its operand as a parameter,
    /// so the row-level check can still find it.
    pub fn add_qual(&mut self, qual: &Qual) -> Result<(), DeparseError> {
        let deparser = Deparser::new(self.table);
        let mut text = String::new();
        let mut params = self.params.clone();

        match &qual.kind {
            QualKind::Simple { .. } => {
                deparser.deparse(&qual.clause.expr, &mut text, &mut params)?;
            }
            QualKind::Geometry(g) => match g.catalog {
                Pushdown::Rewrite(pred) => {
                    deparser.deparse_footprint(pred, &g.arg, &mut text, &mut params)?;
                }
                Pushdown::NotRepresentable => {
                    append_unique(&mut self.params, &g.arg);
                    return Ok(());
                }
            },
        }

        self.filter
            .push_str(if self.filter.is_empty() { " WHERE " } else { " AND " });
        self.filter.push_str(&text);
        self.params = params;
        Ok(())
    }

    pub fn reset_sort(&mut self) {
        self.sort.clear();
    }

    /// Appends a sort key on a catalog column
    pub fn add_sort(&mut self, column: &str, descending: bool) {
        self.sort.push((column.to_string(), descending));
    }

    pub fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    /// Parameter expressions in placeholder order
    pub fn params(&self) -> &[Expr] {
        &self.params
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Renders the full `SELECT`
    pub fn build_query(&self) -> CatalogResult<String> {
        if self.columns.is_empty() {
            return Err(CatalogError::query_invalid(
                "At least one column must be added to query",
            ));
        }
        let catalog = match self.table.source() {
            Ok(TableSource::Catalog(name)) => name,
            Ok(TableSource::File(_)) => {
                return Err(CatalogError::query_invalid(
                    "Table has no catalog to query",
                ))
            }
            Err(e) => return Err(CatalogError::query_invalid(e.message())),
        };

        let columns: Vec<String> = self.columns.iter().map(|c| quote_identifier(c)).collect();
        let mut text = format!(
            "SELECT {} FROM {}{}",
            columns.join(", "),
            quote_qualified(catalog),
            self.filter
        );

        if !self.sort.is_empty() {
            text.push_str(" ORDER BY ");
            for (pos, (column, desc)) in self.sort.iter().enumerate() {
                if pos > 0 {
                    text.push_str(", ");
                }
                text.push_str(&quote_identifier(column));
                if *desc {
                    text.push_str(" DESC");
                }
            }
        }

        if let Some(limit) = self.limit {
            let _ = write!(text, " LIMIT {}", limit);
        }
        Ok(text)
    }

    /// Freezes the query for execution
    pub fn pack(&self) -> CatalogResult<PackedQuery> {
        Ok(PackedQuery::new(self.build_query()?, self.params.len()))
    }

    /// Asks the host to plan the query as it stands
    pub fn costs<E: CatalogEstimator + ?Sized>(&self, estimator: &E) -> CatalogResult<CatalogEstimate> {
        let text = self.build_query()?;
        let types: Vec<&str> = self.params.iter().map(|p| p.type_name()).collect();
        estimator.estimate(&text, &types)
    }
}

/// Catalog query in transport form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedQuery {
    pub text: String,
    pub param_count: usize,
    pub checksum: u32,
}

impl PackedQuery {
    pub fn new(text: String, param_count: usize) -> Self {
        let checksum = query_checksum(&text, param_count);
        Self {
            text,
            param_count,
            checksum,
        }
    }

    /// Fails if text or parameter count changed after packing
    pub fn verify(&self) -> CatalogResult<()> {
        let actual = query_checksum(&self.text, self.param_count);
        if actual != self.checksum {
            return Err(CatalogError::pack_corrupted(self.checksum, actual));
        }
        Ok(())
    }

    pub fn to_json(&self) -> CatalogResult<String> {
        serde_json::to_string(self).map_err(|e| CatalogError::query_invalid(e.to_string()))
    }

    /// Parses and verifies a packed query
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let packed: PackedQuery = serde_json::from_str(json)
            .map_err(|e| CatalogError::query_invalid(format!("Invalid packed query: {}", e)))?;
        packed.verify()?;
        Ok(packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{GeometryOperators, QualAnalyzer};
    use crate::catalog::CatalogErrorCode;
    use crate::config::{ColumnOptions, TableOptions};
    use crate::expr::{Clause, Datum};
    use crate::geometry::{GeoBox, GeomOperator};
    use std::cell::RefCell;

    fn table() -> TableInfo {
        let mut t = TableInfo::new(
            1,
            TableOptions::with_catalog(
                "public.modis_files",
                vec![
                    ColumnOptions::named("orbit").with_type("catalog"),
                    ColumnOptions::named("fp").with_type("footprint"),
                    ColumnOptions::named("sst"),
                ],
            ),
        )
        .unwrap();
        for attno in 0..3 {
            t.resolve_column(attno).unwrap();
        }
        t
    }

    fn operators() -> GeometryOperators {
        let mut ids = [0u32; 12];
        for (i, id) in ids.iter_mut().enumerate() {
            *id = 500 + i as u32;
        }
        GeometryOperators::from_ids(ids)
    }

    fn classify(table: &TableInfo, expr: Expr) -> Qual {
        let ops = operators();
        QualAnalyzer::new(table, &ops)
            .classify(&Clause::new(0, expr))
            .unwrap()
    }

    fn geom_op(op: GeomOperator, arg: Expr) -> Expr {
        Expr::op(500 + op.index() as u32, op.symbol(), Expr::var(1, 1, "geometry"), arg)
    }

    fn query_box() -> Expr {
        Expr::constant(Datum::Box(GeoBox::from_corners(0.0, 0.0, 10.0, 10.0)), "geometry")
    }

    #[test]
    fn test_no_quals_no_where() {
        let t = table();
        let mut q = CatalogQuery::new(&t);
        q.add_column("file_id");
        q.add_column("filename");
        q.add_column("file_id");
        assert_eq!(
            q.build_query().unwrap(),
            "SELECT file_id, filename FROM public.modis_files"
        );
    }

    #[test]
    fn test_no_columns_is_error() {
        let t = table();
        let q = CatalogQuery::new(&t);
        let err = q.build_query().unwrap_err();
        assert_eq!(err.code(), CatalogErrorCode::HvaultCatalogQueryInvalid);
        assert!(q.pack().is_err());
    }

    #[test]
    fn test_quals_joined_with_and() {
        let t = table();
        let mut q = CatalogQuery::new(&t);
        q.add_column("file_id");
        let orbit_eq = Expr::op(96, "=", Expr::var(1, 0, "int4"), Expr::var(2, 0, "int4"));
        q.add_qual(&classify(&t, orbit_eq)).unwrap();
        q.add_qual(&classify(&t, geom_op(GeomOperator::Overlaps, query_box())))
            .unwrap();
        assert_eq!(
            q.build_query().unwrap(),
            "SELECT file_id FROM public.modis_files WHERE (orbit = $1) AND \
             (footprint && 'BOX(0 0,10 10)'::geometry)"
        );
        assert_eq!(q.params().len(), 1);
    }

    #[test]
    fn test_unrepresentable_qual_adds_param_only() {
        let t = table();
        let mut q = CatalogQuery::new(&t);
        q.add_column("file_id");
        let outer = Expr::var(2, 3, "geometry");
        let qual = classify(&t, Expr::not(geom_op(GeomOperator::Contains, outer.clone())));
        assert_eq!(qual.geometry().unwrap().catalog, Pushdown::NotRepresentable);
        q.add_qual(&qual).unwrap();
        assert_eq!(q.filter(), "");
        assert_eq!(q.params(), &[outer]);
        assert_eq!(q.build_query().unwrap(), "SELECT file_id FROM public.modis_files");
    }

    #[test]
    fn test_failed_qual_leaves_query_untouched() {
        let t = table();
        let mut q = CatalogQuery::new(&t);
        q.add_column("file_id");
        let bad = Qual {
            clause: Clause::new(
                3,
                Expr::op(
                    96,
                    "=",
                    Expr::var(2, 0, "int4"),
                    Expr::Other("SubLink".into()),
                ),
            ),
            kind: QualKind::Simple { recheck: false },
        };
        assert!(q.add_qual(&bad).is_err());
        assert_eq!(q.filter(), "");
        assert!(q.params().is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let t = table();
        let mut q = CatalogQuery::new(&t);
        q.add_column("file_id");
        let before = q.pack().unwrap();

        let mut c = q.clone();
        c.add_qual(&classify(&t, geom_op(GeomOperator::Left, Expr::param(1, "geometry"))))
            .unwrap();
        c.add_sort("starttime", true);
        c.set_limit(Some(5));
        c.add_column("filename");

        assert_eq!(q.pack().unwrap(), before);
        assert_eq!(
            c.build_query().unwrap(),
            "SELECT file_id, filename FROM public.modis_files WHERE \
             NOT (footprint &> $1) ORDER BY starttime DESC LIMIT 5"
        );
    }

    #[test]
    fn test_sort_reset() {
        let t = table();
        let mut q = CatalogQuery::new(&t);
        q.add_column("file_id");
        q.add_sort("starttime", false);
        q.add_sort("Orbit", true);
        assert!(q
            .build_query()
            .unwrap()
            .ends_with(" ORDER BY starttime, \"Orbit\" DESC"));
        q.reset_sort();
        assert!(!q.build_query().unwrap().contains("ORDER BY"));
    }

    #[test]
    fn test_packed_round_trip_and_corruption() {
        let packed = PackedQuery::new("SELECT file_id FROM files WHERE orbit = $1".into(), 1);
        let json = packed.to_json().unwrap();
        assert_eq!(PackedQuery::from_json(&json).unwrap(), packed);

        let mut tampered = packed.clone();
        tampered.param_count = 2;
        let err = tampered.verify().unwrap_err();
        assert_eq!(err.code(), CatalogErrorCode::HvaultCatalogPackCorrupted);
    }

    struct RecordingEstimator {
        seen: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl CatalogEstimator for RecordingEstimator {
        fn estimate(&self, query: &str, param_types: &[&str]) -> CatalogResult<CatalogEstimate> {
            self.seen.borrow_mut().push((
                query.to_string(),
                param_types.iter().map(|s| s.to_string()).collect(),
            ));
            Ok(CatalogEstimate {
                startup_cost: 1.0,
                total_cost: 20.0,
                rows: 12.0,
                width: 16,
            })
        }
    }

    #[test]
    fn test_costs_pass_param_types() {
        let t = table();
        let mut q = CatalogQuery::new(&t);
        q.add_column("file_id");
        let orbit_eq = Expr::op(96, "=", Expr::var(1, 0, "int4"), Expr::param(4, "int8"));
        q.add_qual(&classify(&t, orbit_eq)).unwrap();

        let est = RecordingEstimator {
            seen: RefCell::new(Vec::new()),
        };
        let e = q.costs(&est).unwrap();
        assert_eq!(e.rows, 12.0);
        let seen = est.seen.borrow();
        assert_eq!(seen[0].1, vec!["int8".to_string()]);
        assert!(seen[0].0.contains("$1"));
    }
}

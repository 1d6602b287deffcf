//! Planner output

use serde::{Deserialize, Serialize};

use crate::analyze::PredicateDescriptor;
use crate::catalog::{CatalogError, CatalogResult, PackedQuery};
use crate::config::TableOptions;
use crate::expr::{Clause, ColumnType, Expr, Relid};

/// Relation size estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelSize {
    pub rows: f64,
    pub width: usize,
}

/// One candidate way to scan the table
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPath {
    /// Outer relations that must supply parameter values; empty for the
    /// unparameterized path
    pub req_outer: Vec<Relid>,
    pub rows: f64,
    pub startup_cost: f64,
    pub total_cost: f64,
    /// Ids of clauses the scan fully evaluates
    pub own_clauses: Vec<usize>,
    /// `None` in single-file mode
    pub query: Option<PackedQuery>,
    /// Catalog parameters followed by geometry operands
    pub params: Vec<Expr>,
    pub predicates: Vec<PredicateDescriptor>,
    /// Equalities synthesized from equivalence groups
    pub implied_clauses: Vec<Clause>,
}

impl ScanPath {
    pub fn is_parameterized(&self) -> bool {
        !self.req_outer.is_empty()
    }

    pub fn owns(&self, clause_id: usize) -> bool {
        self.own_clauses.contains(&clause_id)
    }
}

/// Everything execution needs, as handed from planning to the scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPlan {
    pub relid: Relid,
    pub options: TableOptions,
    pub query: Option<PackedQuery>,
    pub predicates: Vec<PredicateDescriptor>,
    /// Resolved kind of every column, `Null` for unused ones
    pub column_types: Vec<ColumnType>,
    /// Expressions the host evaluates and passes to the scan
    pub params: Vec<Expr>,
    /// Clauses the host must still check per row
    pub recheck: Vec<Clause>,
}

impl ScanPlan {
    /// Number of leading parameters bound to the catalog query
    pub fn catalog_param_count(&self) -> usize {
        self.query.as_ref().map_or(0, |q| q.param_count)
    }

    /// Host types of the parameter expressions
    pub fn param_types(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.type_name()).collect()
    }

    pub fn to_json(&self) -> CatalogResult<String> {
        serde_json::to_string(self).map_err(|e| CatalogError::query_invalid(e.to_string()))
    }

    /// Parses a plan and verifies its packed query
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let plan: ScanPlan = serde_json::from_str(json)
            .map_err(|e| CatalogError::query_invalid(format!("Invalid scan plan: {}", e)))?;
        if let Some(q) = &plan.query {
            q.verify()?;
        }
        Ok(plan)
    }
}

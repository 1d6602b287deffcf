//! What the host planner supplies

use crate::catalog::{CatalogEstimator, CatalogResult};
use crate::config::TableSource;
use crate::expr::{Clause, EquivalenceGroup, Expr, Relid};

/// Planner callbacks into the host
///
/// Catalog estimates come from the [`CatalogEstimator`] supertrait.
pub trait HostPlanner: CatalogEstimator {
    /// Combined selectivity of `clauses` on relation `relid`
    fn selectivity(&self, clauses: &[Clause], relid: Relid) -> f64;

    /// Number of files the table covers
    fn file_count(&self, source: TableSource<'_>) -> CatalogResult<u64>;
}

/// Host view of the scanned relation for one query
#[derive(Debug, Clone, Default)]
pub struct RelationInput {
    /// Expressions the host needs from this relation
    pub targets: Vec<Expr>,
    /// Restrictions mentioning only this relation
    pub base_clauses: Vec<Clause>,
    /// Join conditions mentioning this relation
    pub join_clauses: Vec<Clause>,
    pub groups: Vec<EquivalenceGroup>,
    /// Declared storage width of each column, `None` for variable width
    pub column_widths: Vec<Option<usize>>,
}

impl RelationInput {
    /// Every expression that can reference a column
    pub(crate) fn expressions(&self) -> impl Iterator<Item = &Expr> + '_ {
        self.targets
            .iter()
            .chain(self.base_clauses.iter().map(|c| &c.expr))
            .chain(self.join_clauses.iter().map(|c| &c.expr))
    }

    /// Largest clause id the host used
    pub(crate) fn max_clause_id(&self) -> Option<usize> {
        self.base_clauses
            .iter()
            .chain(&self.join_clauses)
            .map(|c| c.id)
            .max()
    }
}

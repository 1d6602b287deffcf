//! Clause analysis for one swath table
//!
//! Resolves column kinds, maps host operator ids to geometry operators and
//! classifies clauses and equivalence groups into what the catalog query
//! and the in-process geometry check can absorb.

mod operators;
mod qual;
mod table;

pub use operators::{GeometryOperators, OperatorResolver};
pub use qual::{
    append_unique, CatalogJoinGroup, GeometryQual, PredicateDescriptor, Qual, QualAnalyzer,
    QualKind,
};
pub use table::TableInfo;

use crate::expr::{EquivalenceGroup, Expr, Relid};

/// Attributes of `relid` referenced in `expr`, sorted and deduplicated
pub fn used_columns(expr: &Expr, relid: Relid) -> Vec<usize> {
    let mut out = Vec::new();
    expr.walk(&mut |node| {
        if let Expr::Var(v) = node {
            if v.relid == relid {
                out.push(v.attno);
            }
        }
    });
    out.sort_unstable();
    out.dedup();
    out
}

/// Attributes of `relid` referenced by a group's members; empty unless the
/// group mentions `relid`
pub fn group_used_columns(group: &EquivalenceGroup, relid: Relid) -> Vec<usize> {
    if !group.mentions(relid) {
        return Vec::new();
    }
    let mut out: Vec<usize> = group
        .members
        .iter()
        .flat_map(|m| used_columns(m, relid))
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Datum;

    #[test]
    fn test_used_columns() {
        let e = Expr::and(vec![
            Expr::op(96, "=", Expr::var(1, 3, "int4"), Expr::var(2, 0, "int4")),
            Expr::is_not_null(Expr::var(1, 1, "float8")),
            Expr::op(96, "=", Expr::var(1, 3, "int4"), Expr::constant(Datum::Int(1), "int4")),
        ]);
        assert_eq!(used_columns(&e, 1), vec![1, 3]);
        assert_eq!(used_columns(&e, 2), vec![0]);
        assert!(used_columns(&e, 9).is_empty());
    }

    #[test]
    fn test_group_used_columns() {
        let g = EquivalenceGroup::new(vec![Expr::var(1, 2, "int4"), Expr::var(2, 5, "int4")], 96);
        assert_eq!(group_used_columns(&g, 1), vec![2]);
        assert!(group_used_columns(&g, 3).is_empty());
    }
}

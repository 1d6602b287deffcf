use serde::{Deserialize, Serialize};

use super::node::{Expr, Relid};

/// A restriction or join condition offered by the host planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// Host identity, stable for the duration of planning
    pub id: usize,
    pub expr: Expr,
    /// Relations the clause references
    pub relids: Vec<Relid>,
}

impl Clause {
    /// Creates a clause, deriving the referenced relations from the tree
    pub fn new(id: usize, expr: Expr) -> Self {
        let relids = expr.relids();
        Self { id, expr, relids }
    }

    /// Relations other than `relid` this clause depends on
    pub fn outer_relids(&self, relid: Relid) -> Vec<Relid> {
        self.relids.iter().copied().filter(|r| *r != relid).collect()
    }
}

/// Expressions the host knows to be pairwise equal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceGroup {
    pub members: Vec<Expr>,
    /// Equality operator id used to synthesize join clauses
    pub eq_op: u32,
    pub eq_symbol: String,
}

impl EquivalenceGroup {
    pub fn new(members: Vec<Expr>, eq_op: u32) -> Self {
        Self {
            members,
            eq_op,
            eq_symbol: "=".to_string(),
        }
    }

    /// True if any member mentions `relid`
    pub fn mentions(&self, relid: Relid) -> bool {
        self.members.iter().any(|m| m.relids().contains(&relid))
    }
}

//! Host-side data model: expressions, clauses and column kinds

mod clause;
mod node;
mod types;

pub use clause::{Clause, EquivalenceGroup};
pub use node::{
    ArrayExpr, ArrayRef, BoolExpr, BoolOp, CallFormat, Const, Datum, Expr, FuncCall, NullTest,
    OpExpr, Param, Relabel, Relid, ScalarArrayOp, Var,
};
pub use types::{ColumnType, DatasetType};

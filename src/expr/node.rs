//! Host expression tree
//!
//! A closed sum type over the node kinds the scan understands. Anything the
//! host can express beyond these arrives as [`Expr::Other`] and is treated as
//! unsupported by every consumer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::geometry::GeoBox;

/// Range-table index of a relation in the host query
pub type Relid = u32;

/// Reference to a column of some relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub relid: Relid,
    /// Zero-based attribute index
    pub attno: usize,
    pub type_name: String,
}

/// Constant values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Arbitrary precision number in its text form
    Numeric(String),
    Text(String),
    /// Bit string, digits only
    Bits(String),
    Timestamp(NaiveDateTime),
    Box(GeoBox),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Datum::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Datum::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Const {
    pub value: Datum,
    pub type_name: String,
}

/// Externally supplied parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub id: u32,
    pub type_name: String,
}

/// How a function call was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallFormat {
    Call,
    ImplicitCast,
    ExplicitCast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub format: CallFormat,
    pub result_type: String,
}

/// Binary or unary operator application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpExpr {
    /// Host operator id
    pub op_id: u32,
    pub symbol: String,
    pub args: Vec<Expr>,
    pub result_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolExpr {
    pub op: BoolOp,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullTest {
    pub arg: Box<Expr>,
    /// `IS NULL` when true, `IS NOT NULL` otherwise
    pub is_null: bool,
}

/// `left op ANY (right)` or `left op ALL (right)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarArrayOp {
    pub symbol: String,
    pub use_or: bool,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub array_type: String,
}

/// Array subscript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayRef {
    pub array: Box<Expr>,
    pub indices: Vec<Expr>,
    pub element_type: String,
}

/// Binary-compatible type relabeling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relabel {
    pub arg: Box<Expr>,
    pub type_name: String,
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Var(Var),
    Const(Const),
    Param(Param),
    FuncCall(FuncCall),
    Relabel(Relabel),
    Op(OpExpr),
    /// `a IS DISTINCT FROM b`
    Distinct(OpExpr),
    ScalarArrayOp(ScalarArrayOp),
    Bool(BoolExpr),
    NullTest(NullTest),
    Array(ArrayExpr),
    ArrayRef(ArrayRef),
    /// Implicitly AND-ed list
    List(Vec<Expr>),
    /// Any node kind not listed above, by name
    Other(String),
}

impl Expr {
    pub fn var(relid: Relid, attno: usize, type_name: &str) -> Expr {
        Expr::Var(Var {
            relid,
            attno,
            type_name: type_name.to_string(),
        })
    }

    pub fn constant(value: Datum, type_name: &str) -> Expr {
        Expr::Const(Const {
            value,
            type_name: type_name.to_string(),
        })
    }

    pub fn param(id: u32, type_name: &str) -> Expr {
        Expr::Param(Param {
            id,
            type_name: type_name.to_string(),
        })
    }

    /// Boolean binary operator
    pub fn op(op_id: u32, symbol: &str, left: Expr, right: Expr) -> Expr {
        Expr::Op(OpExpr {
            op_id,
            symbol: symbol.to_string(),
            args: vec![left, right],
            result_type: "bool".to_string(),
        })
    }

    pub fn not(arg: Expr) -> Expr {
        Expr::Bool(BoolExpr {
            op: BoolOp::Not,
            args: vec![arg],
        })
    }

    pub fn and(args: Vec<Expr>) -> Expr {
        Expr::Bool(BoolExpr {
            op: BoolOp::And,
            args,
        })
    }

    pub fn or(args: Vec<Expr>) -> Expr {
        Expr::Bool(BoolExpr {
            op: BoolOp::Or,
            args,
        })
    }

    pub fn is_not_null(arg: Expr) -> Expr {
        Expr::NullTest(NullTest {
            arg: Box::new(arg),
            is_null: false,
        })
    }

    pub fn is_null(arg: Expr) -> Expr {
        Expr::NullTest(NullTest {
            arg: Box::new(arg),
            is_null: true,
        })
    }

    /// Direct children in evaluation order
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_) | Expr::Const(_) | Expr::Param(_) | Expr::Other(_) => Vec::new(),
            Expr::FuncCall(f) => f.args.iter().collect(),
            Expr::Relabel(r) => vec![r.arg.as_ref()],
            Expr::Op(o) | Expr::Distinct(o) => o.args.iter().collect(),
            Expr::ScalarArrayOp(s) => vec![s.left.as_ref(), s.right.as_ref()],
            Expr::Bool(b) => b.args.iter().collect(),
            Expr::NullTest(n) => vec![n.arg.as_ref()],
            Expr::Array(a) => a.elements.iter().collect(),
            Expr::ArrayRef(a) => {
                let mut out = vec![a.array.as_ref()];
                out.extend(a.indices.iter());
                out
            }
            Expr::List(items) => items.iter().collect(),
        }
    }

    /// Visits this node and every descendant, parents first
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Expr),
    {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Relations referenced anywhere in the tree, sorted and deduplicated
    pub fn relids(&self) -> Vec<Relid> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let Expr::Var(v) = e {
                out.push(v.relid);
            }
        });
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Result type name of the expression
    pub fn type_name(&self) -> &str {
        match self {
            Expr::Var(v) => &v.type_name,
            Expr::Const(c) => &c.type_name,
            Expr::Param(p) => &p.type_name,
            Expr::FuncCall(f) => &f.result_type,
            Expr::Relabel(r) => &r.type_name,
            Expr::Op(o) => &o.result_type,
            Expr::Array(a) => &a.array_type,
            Expr::ArrayRef(a) => &a.element_type,
            Expr::Distinct(_)
            | Expr::ScalarArrayOp(_)
            | Expr::Bool(_)
            | Expr::NullTest(_)
            | Expr::List(_) => "bool",
            Expr::Other(_) => "unknown",
        }
    }
}

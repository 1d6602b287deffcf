//! Qual classification
//!
//! Each clause the host offers is classified as one of:
//! - `Simple`: evaluable by the catalog query alone
//! - `Geometry`: a point/footprint column compared with a catalog-safe
//!   operand through a geometry operator, optionally negated
//! - unsupported: not returned, the host rechecks it per row
//!
//! Classification never fails; an unknown node kind only makes the clause
//! unsupported.

use serde::{Deserialize, Serialize};

use super::operators::GeometryOperators;
use super::table::TableInfo;
use crate::expr::{BoolOp, Clause, ColumnType, EquivalenceGroup, Expr, Var};
use crate::geometry::{GeomPredicate, Pushdown};
use crate::observability::{Event, Logger};

/// Footprint or point comparison
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryQual {
    /// Local point or footprint column
    pub var: Var,
    pub column: ColumnType,
    /// Operand the column is compared with
    pub arg: Expr,
    /// Row-level relation, column on the left
    pub pred: GeomPredicate,
    /// Relation the catalog footprint must satisfy
    pub catalog: Pushdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QualKind {
    Simple { recheck: bool },
    Geometry(GeometryQual),
}

/// A clause this scan can use
#[derive(Debug, Clone, PartialEq)]
pub struct Qual {
    pub clause: Clause,
    pub kind: QualKind,
}

/// Row-level geometry check carried into the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateDescriptor {
    pub column: ColumnType,
    /// Attribute the check applies to
    pub attno: usize,
    pub pred: GeomPredicate,
    /// Position of the query operand in the scan parameter list
    pub param_index: usize,
}

impl Qual {
    /// True if the host must still evaluate the clause per row
    pub fn recheck(&self) -> bool {
        match &self.kind {
            QualKind::Simple { recheck } => *recheck,
            QualKind::Geometry(_) => false,
        }
    }

    pub fn geometry(&self) -> Option<&GeometryQual> {
        match &self.kind {
            QualKind::Geometry(g) => Some(g),
            QualKind::Simple { .. } => None,
        }
    }

    /// Builds the row-level check for a geometry qual, appending its operand
    /// to `params` unless an identical expression is already there
    pub fn predicate_descriptor(&self, params: &mut Vec<Expr>) -> Option<PredicateDescriptor> {
        let g = self.geometry()?;
        let param_index = append_unique(params, &g.arg);
        Some(PredicateDescriptor {
            column: g.column,
            attno: g.var.attno,
            pred: g.pred,
            param_index,
        })
    }
}

/// Appends `expr` if absent and returns its position
pub fn append_unique(list: &mut Vec<Expr>, expr: &Expr) -> usize {
    match list.iter().position(|e| e == expr) {
        Some(pos) => pos,
        None => {
            list.push(expr.clone());
            list.len() - 1
        }
    }
}

/// Equivalence group joining one catalog column with outer expressions
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogJoinGroup {
    pub group: EquivalenceGroup,
    /// The single local catalog column in the group
    pub var: Var,
}

impl CatalogJoinGroup {
    /// Outer-relation members of the group
    pub fn outer_vars(&self) -> impl Iterator<Item = &Var> + '_ {
        self.group.members.iter().filter_map(move |m| match m {
            Expr::Var(v) if v.relid != self.var.relid => Some(v),
            _ => None,
        })
    }
}

/// Classifier bound to one table
pub struct QualAnalyzer<'a> {
    table: &'a TableInfo,
    operators: &'a GeometryOperators,
}

impl<'a> QualAnalyzer<'a> {
    /// Creates an analyzer; column kinds must already be resolved on `table`
    pub fn new(table: &'a TableInfo, operators: &'a GeometryOperators) -> Self {
        Self { table, operators }
    }

    /// True if every local column is a catalog column and every node is of
    /// a kind the catalog query can express
    pub fn is_catalog_expr(&self, expr: &Expr) -> bool {
        let mut safe = true;
        expr.walk(&mut |node| {
            if !safe {
                return;
            }
            match node {
                Expr::Var(v) => {
                    if self.table.is_local(v)
                        && self.table.column_type(v.attno) != ColumnType::Catalog
                    {
                        safe = false;
                    }
                }
                Expr::Const(_)
                | Expr::Param(_)
                | Expr::FuncCall(_)
                | Expr::Relabel(_)
                | Expr::Op(_)
                | Expr::Distinct(_)
                | Expr::ScalarArrayOp(_)
                | Expr::Bool(_)
                | Expr::NullTest(_)
                | Expr::Array(_)
                | Expr::ArrayRef(_)
                | Expr::List(_) => {}
                Expr::Other(_) => safe = false,
            }
        });
        safe
    }

    /// `dataset_column IS NOT NULL` where the column has a catalog flag
    fn is_not_null_qual(&self, expr: &Expr) -> bool {
        let test = match expr {
            Expr::NullTest(n) if !n.is_null => n,
            _ => return false,
        };
        match test.arg.as_ref() {
            Expr::Var(v) => {
                self.table.is_local(v)
                    && self.table.column_type(v.attno).is_dataset()
                    && self.table.catalog_column(v.attno).is_some()
            }
            _ => false,
        }
    }

    fn local_geometry_var(&self, expr: &Expr) -> Option<(Var, ColumnType)> {
        match expr {
            Expr::Var(v) if self.table.is_local(v) => {
                let column = self.table.column_type(v.attno);
                column.is_geometry().then(|| (v.clone(), column))
            }
            _ => None,
        }
    }

    fn geometry_op(&self, expr: &Expr, negated: bool) -> Option<GeometryQual> {
        let op_expr = match expr {
            Expr::Op(o) if o.args.len() == 2 => o,
            _ => return None,
        };
        let op = self.operators.lookup(op_expr.op_id)?;

        let (first, second) = (&op_expr.args[0], &op_expr.args[1]);
        let (var, column, arg, op) = if let Some((v, c)) = self.local_geometry_var(first) {
            (v, c, second, op)
        } else if let Some((v, c)) = self.local_geometry_var(second) {
            (v, c, first, op.commute())
        } else {
            return None;
        };

        if !self.is_catalog_expr(arg) {
            return None;
        }

        let pred = GeomPredicate::new(op, negated);
        Some(GeometryQual {
            var,
            column,
            arg: arg.clone(),
            pred,
            catalog: pred.pushdown(),
        })
    }

    /// Recognises `col <op> arg`, `arg <op> col` and their single negation
    pub fn geometry_qual(&self, expr: &Expr) -> Option<GeometryQual> {
        if let Some(q) = self.geometry_op(expr, false) {
            return Some(q);
        }
        match expr {
            Expr::Bool(b) if b.op == BoolOp::Not && b.args.len() == 1 => {
                self.geometry_op(&b.args[0], true)
            }
            _ => None,
        }
    }

    /// Classifies a single clause
    pub fn classify(&self, clause: &Clause) -> Option<Qual> {
        let id = clause.id.to_string();
        let not_null = self.is_not_null_qual(&clause.expr);
        if not_null || self.is_catalog_expr(&clause.expr) {
            Logger::event(
                Event::QualCatalogDetected,
                &[
                    ("clause", id.as_str()),
                    ("recheck", if not_null { "true" } else { "false" }),
                ],
            );
            return Some(Qual {
                clause: clause.clone(),
                kind: QualKind::Simple { recheck: not_null },
            });
        }

        let geom = self.geometry_qual(&clause.expr)?;
        let predicate = geom.pred.to_string();
        Logger::event(
            Event::QualFootprintDetected,
            &[("clause", id.as_str()), ("predicate", predicate.as_str())],
        );
        Some(Qual {
            clause: clause.clone(),
            kind: QualKind::Geometry(geom),
        })
    }

    /// Classifies clauses, dropping unsupported ones
    pub fn analyze_quals(&self, clauses: &[Clause]) -> Vec<Qual> {
        clauses.iter().filter_map(|c| self.classify(c)).collect()
    }

    /// Returns the catalog column if `group` can drive a join pushdown
    ///
    /// The group must hold exactly one local column, of catalog kind, and at
    /// least one outer column. Other members must be catalog-safe.
    pub fn catalog_join_var(&self, group: &EquivalenceGroup) -> Option<Var> {
        let mut catalog_var: Option<&Var> = None;
        let mut outer = 0;
        for member in &group.members {
            match member {
                Expr::Var(v) if self.table.is_local(v) => {
                    if self.table.column_type(v.attno) != ColumnType::Catalog
                        || catalog_var.is_some()
                    {
                        return None;
                    }
                    catalog_var = Some(v);
                }
                Expr::Var(_) => outer += 1,
                other => {
                    if !self.is_catalog_expr(other) {
                        return None;
                    }
                }
            }
        }
        if outer == 0 {
            return None;
        }
        catalog_var.cloned()
    }

    /// Selects equivalence groups usable for join pushdown
    pub fn analyze_groups(&self, groups: &[EquivalenceGroup]) -> Vec<CatalogJoinGroup> {
        groups
            .iter()
            .filter_map(|g| {
                let var = self.catalog_join_var(g)?;
                let attno = var.attno.to_string();
                Logger::event(Event::JoinGroupDetected, &[("attno", attno.as_str())]);
                Some(CatalogJoinGroup {
                    group: g.clone(),
                    var,
                })
            })
            .collect()
    }
}

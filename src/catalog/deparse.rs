//! Expression to catalog query text
//!
//! Local catalog columns render as their catalog names. Columns of other
//! relations and host parameters become positional placeholders `$n`; an
//! expression that appears twice reuses its placeholder. Constants always
//! carry an explicit cast.

use std::fmt::Write;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::errors::DeparseError;
use super::quote::{quote_identifier, quote_literal};
use crate::analyze::{append_unique, TableInfo};
use crate::expr::{BoolOp, CallFormat, Const, Datum, Expr};
use crate::geometry::{GeoBox, GeomPredicate};

/// Renders expressions of one table
#[derive(Debug, Clone, Copy)]
pub struct Deparser<'a> {
    table: &'a TableInfo,
}

type DeparseResult = Result<(), DeparseError>;

impl<'a> Deparser<'a> {
    pub fn new(table: &'a TableInfo) -> Self {
        Self { table }
    }

    /// Appends the text of `expr` to `out`, registering placeholders in
    /// `params`
    pub fn deparse(&self, expr: &Expr, out: &mut String, params: &mut Vec<Expr>) -> DeparseResult {
        match expr {
            Expr::Var(v) if self.table.is_local(v) => {
                let name = self
                    .table
                    .catalog_column(v.attno)
                    .ok_or(DeparseError::NoCatalogColumn(v.attno))?;
                out.push_str(&quote_identifier(name));
            }
            Expr::Var(_) | Expr::Param(_) => {
                let pos = append_unique(params, expr);
                let _ = write!(out, "${}", pos + 1);
            }
            Expr::Const(c) => deparse_const(c, out),
            Expr::FuncCall(f) => match f.format {
                CallFormat::Call => {
                    out.push_str(&f.name);
                    out.push('(');
                    self.deparse_list(&f.args, ", ", out, params)?;
                    out.push(')');
                }
                CallFormat::ImplicitCast => {
                    let inner = f
                        .args
                        .first()
                        .ok_or_else(|| DeparseError::MissingOperand(f.name.clone()))?;
                    self.deparse(inner, out, params)?;
                }
                CallFormat::ExplicitCast => {
                    let inner = f
                        .args
                        .first()
                        .ok_or_else(|| DeparseError::MissingOperand(f.name.clone()))?;
                    out.push('(');
                    self.deparse(inner, out, params)?;
                    let _ = write!(out, ")::{}", f.result_type);
                }
            },
            Expr::Relabel(r) => self.deparse(&r.arg, out, params)?,
            Expr::Op(o) => match o.args.as_slice() {
                [arg] => {
                    let _ = write!(out, "({} ", o.symbol);
                    self.deparse(arg, out, params)?;
                    out.push(')');
                }
                [left, right] => {
                    out.push('(');
                    self.deparse(left, out, params)?;
                    let _ = write!(out, " {} ", o.symbol);
                    self.deparse(right, out, params)?;
                    out.push(')');
                }
                _ => return Err(DeparseError::MissingOperand(o.symbol.clone())),
            },
            Expr::Distinct(o) => match o.args.as_slice() {
                [left, right] => {
                    out.push('(');
                    self.deparse(left, out, params)?;
                    out.push_str(" IS DISTINCT FROM ");
                    self.deparse(right, out, params)?;
                    out.push(')');
                }
                _ => return Err(DeparseError::MissingOperand("IS DISTINCT FROM".into())),
            },
            Expr::ScalarArrayOp(s) => {
                out.push('(');
                self.deparse(&s.left, out, params)?;
                let _ = write!(
                    out,
                    " {} {} (",
                    s.symbol,
                    if s.use_or { "ANY" } else { "ALL" }
                );
                self.deparse(&s.right, out, params)?;
                out.push_str("))");
            }
            Expr::Bool(b) => match b.op {
                BoolOp::Not => {
                    let arg = b
                        .args
                        .first()
                        .ok_or_else(|| DeparseError::MissingOperand("NOT".into()))?;
                    out.push_str("(NOT ");
                    self.deparse(arg, out, params)?;
                    out.push(')');
                }
                BoolOp::And | BoolOp::Or => {
                    if b.args.is_empty() {
                        return Err(DeparseError::MissingOperand(format!("{:?}", b.op)));
                    }
                    let sep = if b.op == BoolOp::And { " AND " } else { " OR " };
                    out.push('(');
                    self.deparse_list(&b.args, sep, out, params)?;
                    out.push(')');
                }
            },
            Expr::NullTest(n) => {
                out.push('(');
                self.deparse(&n.arg, out, params)?;
                out.push_str(if n.is_null { " IS NULL)" } else { " IS NOT NULL)" });
            }
            Expr::Array(a) => {
                out.push_str("ARRAY[");
                self.deparse_list(&a.elements, ", ", out, params)?;
                out.push(']');
                if a.elements.is_empty() {
                    let _ = write!(out, "::{}", a.array_type);
                }
            }
            Expr::ArrayRef(a) => {
                out.push('(');
                self.deparse(&a.array, out, params)?;
                out.push(')');
                for index in &a.indices {
                    out.push('[');
                    self.deparse(index, out, params)?;
                    out.push(']');
                }
            }
            Expr::List(items) => {
                if items.is_empty() {
                    return Err(DeparseError::MissingOperand("list".into()));
                }
                out.push('(');
                self.deparse_list(items, " AND ", out, params)?;
                out.push(')');
            }
            Expr::Other(kind) => return Err(DeparseError::UnsupportedNode(kind.clone())),
        }
        Ok(())
    }

    fn deparse_list(
        &self,
        items: &[Expr],
        sep: &str,
        out: &mut String,
        params: &mut Vec<Expr>,
    ) -> DeparseResult {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            self.deparse(item, out, params)?;
        }
        Ok(())
    }

    /// Renders a footprint relation on the catalog footprint column
    ///
    /// Commuted operators put the operand on the left.
    pub fn deparse_footprint(
        &self,
        pred: GeomPredicate,
        arg: &Expr,
        out: &mut String,
        params: &mut Vec<Expr>,
    ) -> DeparseResult {
        let footprint = quote_identifier(&self.table.options().catalog_footprint);
        if pred.negated {
            out.push_str("NOT ");
        }
        out.push('(');
        if pred.op.is_commuted() {
            self.deparse(arg, out, params)?;
            let _ = write!(out, " {} {}", pred.op.symbol(), footprint);
        } else {
            let _ = write!(out, "{} {} ", footprint, pred.op.symbol());
            self.deparse(arg, out, params)?;
        }
        out.push(')');
        Ok(())
    }
}

fn deparse_const(c: &Const, out: &mut String) {
    match &c.value {
        Datum::Null => out.push_str("NULL"),
        Datum::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Datum::Int(v) => push_number(out, &v.to_string()),
        Datum::Float(v) => {
            if v.is_finite() {
                push_number(out, &v.to_string());
            } else if v.is_nan() {
                out.push_str("'NaN'");
            } else if *v > 0.0 {
                out.push_str("'Infinity'");
            } else {
                out.push_str("'-Infinity'");
            }
        }
        Datum::Numeric(s) => {
            if is_finite_numeric(s) {
                push_number(out, s);
            } else {
                out.push_str(&quote_literal(s));
            }
        }
        Datum::Text(s) => out.push_str(&quote_literal(s)),
        Datum::Bits(s) => {
            if is_bit_string(s) {
                let _ = write!(out, "B'{}'", s);
            } else {
                out.push_str(&quote_literal(s));
            }
        }
        Datum::Timestamp(t) => out.push_str(&quote_literal(&format_timestamp(t))),
        Datum::Box(b) => out.push_str(&quote_literal(&format_box(b))),
    }
    let _ = write!(out, "::{}", c.type_name);
}

/// Signed numbers are parenthesised so the cast binds to the whole value
fn push_number(out: &mut String, text: &str) {
    if text.starts_with('-') || text.starts_with('+') {
        let _ = write!(out, "({})", text);
    } else {
        out.push_str(text);
    }
}

static NUMERIC_LITERAL: OnceLock<Option<Regex>> = OnceLock::new();
static BIT_LITERAL: OnceLock<Option<Regex>> = OnceLock::new();

fn matches_pattern(cell: &'static OnceLock<Option<Regex>>, pattern: &str, text: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(text))
}

/// Plain decimal or exponent notation; anything else goes out quoted
fn is_finite_numeric(text: &str) -> bool {
    matches_pattern(
        &NUMERIC_LITERAL,
        r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$",
        text,
    )
}

fn is_bit_string(text: &str) -> bool {
    matches_pattern(&BIT_LITERAL, r"^[01]*$", text)
}

fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

fn format_box(b: &GeoBox) -> String {
    format!("BOX({} {},{} {})", b.xmin, b.ymin, b.xmax, b.ymax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnOptions, TableOptions};
    use crate::expr::{ArrayExpr, ArrayRef, FuncCall, OpExpr, Relabel, ScalarArrayOp};
    use crate::geometry::GeomOperator;
    use chrono::NaiveDate;

    fn table() -> TableInfo {
        let mut t = TableInfo::new(
            1,
            TableOptions::with_catalog(
                "files",
                vec![
                    ColumnOptions::named("orbit").with_type("catalog"),
                    ColumnOptions::named("sst").with_cat_name("has_sst"),
                    ColumnOptions::named("Day").with_type("catalog"),
                    ColumnOptions::named("raw"),
                ],
            ),
        )
        .unwrap();
        for attno in 0..4 {
            t.resolve_column(attno).unwrap();
        }
        t
    }

    fn render(expr: &Expr) -> Result<(String, Vec<Expr>), DeparseError> {
        let t = table();
        let mut out = String::new();
        let mut params = Vec::new();
        Deparser::new(&t).deparse(expr, &mut out, &mut params)?;
        Ok((out, params))
    }

    fn text(expr: &Expr) -> String {
        render(expr).unwrap().0
    }

    fn c(value: Datum, ty: &str) -> Expr {
        Expr::constant(value, ty)
    }

    #[test]
    fn test_constants() {
        assert_eq!(text(&c(Datum::Int(42), "int4")), "42::int4");
        assert_eq!(text(&c(Datum::Int(-3), "int4")), "(-3)::int4");
        assert_eq!(text(&c(Datum::Float(1.5), "float8")), "1.5::float8");
        assert_eq!(text(&c(Datum::Float(f64::NAN), "float8")), "'NaN'::float8");
        assert_eq!(
            text(&c(Datum::Float(f64::NEG_INFINITY), "float8")),
            "'-Infinity'::float8"
        );
        assert_eq!(text(&c(Datum::Numeric("+1.25".into()), "numeric")), "(+1.25)::numeric");
        assert_eq!(text(&c(Datum::Numeric("NaN".into()), "numeric")), "'NaN'::numeric");
        assert_eq!(text(&c(Datum::Bool(true), "bool")), "true::bool");
        assert_eq!(text(&c(Datum::Bits("0101".into()), "bit")), "B'0101'::bit");
        assert_eq!(text(&c(Datum::Text("o'k".into()), "text")), "'o''k'::text");
        assert_eq!(text(&c(Datum::Null, "int4")), "NULL::int4");
    }

    #[test]
    fn test_malformed_numeric_is_quoted() {
        assert_eq!(text(&c(Datum::Numeric("1--".into()), "numeric")), "'1--'::numeric");
        assert_eq!(text(&c(Datum::Numeric("1e5e".into()), "numeric")), "'1e5e'::numeric");
        assert_eq!(text(&c(Datum::Numeric(".5".into()), "numeric")), ".5::numeric");
        assert_eq!(text(&c(Datum::Numeric("-2.5E-3".into()), "numeric")), "(-2.5E-3)::numeric");
        assert_eq!(text(&c(Datum::Numeric("1.".into()), "numeric")), "1.::numeric");
    }

    #[test]
    fn test_non_binary_bits_are_quoted() {
        assert_eq!(
            text(&c(Datum::Bits("1' OR true OR B'0".into()), "bit")),
            "'1'' OR true OR B''0'::bit"
        );
        assert_eq!(text(&c(Datum::Bits("X1F".into()), "varbit")), "'X1F'::varbit");
        assert_eq!(text(&c(Datum::Bits(String::new()), "varbit")), "B''::varbit");
    }

    /// A malformed constant can't end the filter early
    #[test]
    fn test_malformed_constant_keeps_following_filters() {
        let e = Expr::and(vec![
            Expr::op(
                1752,
                "=",
                Expr::var(1, 0, "numeric"),
                c(Datum::Numeric("1--".into()), "numeric"),
            ),
            Expr::op(96, "=", Expr::var(1, 0, "int4"), c(Datum::Int(7), "int4")),
        ]);
        assert_eq!(
            text(&e),
            "((orbit = '1--'::numeric) AND (orbit = 7::int4))"
        );
    }

    #[test]
    fn test_timestamp_and_box_constants() {
        let t = NaiveDate::from_ymd_opt(2012, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(
            text(&c(Datum::Timestamp(t), "timestamp")),
            "'2012-03-04 05:06:07'::timestamp"
        );
        let b = GeoBox { xmin: 10.0, xmax: 20.5, ymin: -5.0, ymax: 5.0 };
        assert_eq!(text(&c(Datum::Box(b), "box2d")), "'BOX(10 -5,20.5 5)'::box2d");
    }

    #[test]
    fn test_local_and_outer_vars() {
        let e = Expr::op(96, "=", Expr::var(1, 0, "int4"), Expr::var(2, 0, "int4"));
        let (s, params) = render(&e).unwrap();
        assert_eq!(s, "(orbit = $1)");
        assert_eq!(params, vec![Expr::var(2, 0, "int4")]);
    }

    #[test]
    fn test_catalog_names_are_quoted_and_mapped() {
        assert_eq!(text(&Expr::var(1, 2, "date")), "\"Day\"");
        assert_eq!(text(&Expr::is_not_null(Expr::var(1, 1, "float8"))), "(has_sst IS NOT NULL)");
        assert_eq!(
            render(&Expr::var(1, 3, "float8")).unwrap_err(),
            DeparseError::NoCatalogColumn(3)
        );
    }

    #[test]
    fn test_placeholders_reused() {
        let p = Expr::param(7, "int4");
        let e = Expr::and(vec![
            Expr::op(97, "<", Expr::var(1, 0, "int4"), p.clone()),
            Expr::op(521, ">", Expr::var(2, 1, "int4"), p.clone()),
            Expr::op(96, "=", Expr::var(1, 0, "int4"), p.clone()),
        ]);
        let (s, params) = render(&e).unwrap();
        assert_eq!(s, "((orbit < $1) AND ($2 > $1) AND (orbit = $1))");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_casts_and_calls() {
        let inner = Expr::var(1, 0, "int4");
        let implicit = Expr::FuncCall(FuncCall {
            name: "int8".into(),
            args: vec![inner.clone()],
            format: CallFormat::ImplicitCast,
            result_type: "int8".into(),
        });
        let explicit = Expr::FuncCall(FuncCall {
            name: "text".into(),
            args: vec![inner.clone()],
            format: CallFormat::ExplicitCast,
            result_type: "text".into(),
        });
        let call = Expr::FuncCall(FuncCall {
            name: "mod".into(),
            args: vec![inner.clone(), c(Datum::Int(2), "int4")],
            format: CallFormat::Call,
            result_type: "int4".into(),
        });
        let relabel = Expr::Relabel(Relabel {
            arg: Box::new(inner),
            type_name: "oid".into(),
        });
        assert_eq!(text(&implicit), "orbit");
        assert_eq!(text(&explicit), "(orbit)::text");
        assert_eq!(text(&call), "mod(orbit, 2::int4)");
        assert_eq!(text(&relabel), "orbit");
    }

    #[test]
    fn test_compound_nodes() {
        let orbit = Expr::var(1, 0, "int4");
        let arr = Expr::Array(ArrayExpr {
            elements: vec![c(Datum::Int(1), "int4"), c(Datum::Int(2), "int4")],
            array_type: "int4[]".into(),
        });
        let any = Expr::ScalarArrayOp(ScalarArrayOp {
            symbol: "=".into(),
            use_or: true,
            left: Box::new(orbit.clone()),
            right: Box::new(arr.clone()),
        });
        assert_eq!(text(&any), "(orbit = ANY (ARRAY[1::int4, 2::int4]))");

        let subscript = Expr::ArrayRef(ArrayRef {
            array: Box::new(arr),
            indices: vec![c(Datum::Int(1), "int4")],
            element_type: "int4".into(),
        });
        assert_eq!(text(&subscript), "(ARRAY[1::int4, 2::int4])[1::int4]");

        let distinct = Expr::Distinct(OpExpr {
            op_id: 96,
            symbol: "=".into(),
            args: vec![orbit.clone(), c(Datum::Null, "int4")],
            result_type: "bool".into(),
        });
        assert_eq!(text(&distinct), "(orbit IS DISTINCT FROM NULL::int4)");

        let list = Expr::List(vec![
            Expr::is_null(orbit.clone()),
            Expr::not(Expr::is_null(orbit)),
        ]);
        assert_eq!(text(&list), "((orbit IS NULL) AND (NOT (orbit IS NULL)))");

        let empty = Expr::Array(ArrayExpr {
            elements: vec![],
            array_type: "int4[]".into(),
        });
        assert_eq!(text(&empty), "ARRAY[]::int4[]");
    }

    #[test]
    fn test_unknown_node_fails() {
        let e = Expr::or(vec![
            Expr::op(96, "=", Expr::var(1, 0, "int4"), Expr::param(1, "int4")),
            Expr::Other("SubLink".into()),
        ]);
        assert_eq!(
            render(&e).unwrap_err(),
            DeparseError::UnsupportedNode("SubLink".into())
        );
    }

    #[test]
    fn test_footprint_rendering() {
        let t = table();
        let d = Deparser::new(&t);
        let arg = Expr::param(1, "geometry");

        let mut out = String::new();
        let mut params = Vec::new();
        d.deparse_footprint(GeomPredicate::positive(GeomOperator::Overlaps), &arg, &mut out, &mut params)
            .unwrap();
        assert_eq!(out, "(footprint && $1)");

        let mut out = String::new();
        d.deparse_footprint(GeomPredicate::negative(GeomOperator::Right), &arg, &mut out, &mut params)
            .unwrap();
        assert_eq!(out, "NOT (footprint >> $1)");

        let mut out = String::new();
        d.deparse_footprint(GeomPredicate::positive(GeomOperator::CommLeft), &arg, &mut out, &mut params)
            .unwrap();
        assert_eq!(out, "($1 &< footprint)");
        assert_eq!(params.len(), 1);
    }
}

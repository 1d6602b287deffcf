//! Row-level geometry evaluation
//!
//! Evaluates a [`GeomPredicate`] for a batch of footprints against one query
//! box and returns the indices that pass. Footprints come in three layouts:
//!
//! - `Corners`: four consecutive corners per row
//! - `Compact`: a `(rows + 1) x (stride + 1)` corner grid shared between
//!   neighbouring rows; row `i` owns the cell at `i + i / stride`
//! - `Points`: one coordinate per row, bounds collapse to a point
//!
//! The per-layout loop is monomorphised so the bounds computation stays
//! inlined in the hot path.

use super::bbox::{Bounds, GeoBox};
use super::operator::{GeomOperator, GeomPredicate};

/// Tests `row <op> query` on precomputed row bounds
#[inline]
pub fn eval_op(op: GeomOperator, b: &Bounds, q: &GeoBox) -> bool {
    match op {
        GeomOperator::Overlaps => {
            !(b.latmin > q.ymax || q.ymin > b.latmax || b.lonmin > q.xmax || q.xmin > b.lonmax)
        }
        GeomOperator::Contains => {
            !(b.latmin > q.ymin || b.latmax < q.ymax || b.lonmin > q.xmin || b.lonmax < q.xmax)
        }
        GeomOperator::Within => {
            !(q.ymin > b.latmin || q.ymax < b.latmax || q.xmin > b.lonmin || q.xmax < b.lonmax)
        }
        GeomOperator::Same => {
            b.latmin == q.ymin && b.latmax == q.ymax && b.lonmin == q.xmin && b.lonmax == q.xmax
        }
        GeomOperator::Overleft => b.latmax <= q.ymax,
        GeomOperator::Left => b.latmax < q.ymin,
        GeomOperator::Right => b.latmin > q.ymax,
        GeomOperator::Overright => b.latmin >= q.ymin,
        GeomOperator::Overbelow => b.lonmax <= q.xmax,
        GeomOperator::Below => b.lonmax < q.xmin,
        GeomOperator::Above => b.lonmin > q.xmax,
        GeomOperator::Overabove => b.lonmin >= q.xmin,
        GeomOperator::CommLeft => b.latmax >= q.ymax,
        GeomOperator::CommRight => b.latmin <= q.ymin,
        GeomOperator::CommBelow => b.lonmax >= q.xmax,
        GeomOperator::CommAbove => b.lonmin <= q.xmin,
    }
}

impl GeomPredicate {
    /// Tests the predicate, negation included, on one row
    #[inline]
    pub fn matches(&self, b: &Bounds, q: &GeoBox) -> bool {
        eval_op(self.op, b, q) ^ self.negated
    }
}

/// Borrowed footprint coordinates for one batch of rows
#[derive(Debug, Clone, Copy)]
pub enum FootprintLayout<'a> {
    Corners { lat: &'a [f64], lon: &'a [f64] },
    Compact { lat: &'a [f64], lon: &'a [f64], stride: usize },
    Points { lat: &'a [f64], lon: &'a [f64] },
}

impl<'a> FootprintLayout<'a> {
    /// Four corners per row; `None` if the slices disagree or are ragged
    pub fn corners(lat: &'a [f64], lon: &'a [f64]) -> Option<Self> {
        if lat.len() != lon.len() || lat.len() % 4 != 0 {
            return None;
        }
        Some(FootprintLayout::Corners { lat, lon })
    }

    /// Shared corner grid with `stride` rows per grid line
    pub fn compact(lat: &'a [f64], lon: &'a [f64], stride: usize) -> Option<Self> {
        if stride == 0 || lat.len() != lon.len() || lat.len() % (stride + 1) != 0 {
            return None;
        }
        if lat.len() / (stride + 1) < 2 {
            return None;
        }
        Some(FootprintLayout::Compact { lat, lon, stride })
    }

    /// One point per row
    pub fn points(lat: &'a [f64], lon: &'a [f64]) -> Option<Self> {
        if lat.len() != lon.len() {
            return None;
        }
        Some(FootprintLayout::Points { lat, lon })
    }

    /// Number of rows described
    pub fn len(&self) -> usize {
        match self {
            FootprintLayout::Corners { lat, .. } => lat.len() / 4,
            FootprintLayout::Compact { lat, stride, .. } => {
                (lat.len() / (stride + 1) - 1) * stride
            }
            FootprintLayout::Points { lat, .. } => lat.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounds of row `i`; caller guarantees `i < len()`
    #[inline]
    pub fn bounds(&self, i: usize) -> Bounds {
        match *self {
            FootprintLayout::Corners { lat, lon } => corner_bounds(lat, lon, i),
            FootprintLayout::Compact { lat, lon, stride } => compact_bounds(lat, lon, stride, i),
            FootprintLayout::Points { lat, lon } => Bounds::point(lat[i], lon[i]),
        }
    }
}

#[inline]
fn corner_bounds(lat: &[f64], lon: &[f64], i: usize) -> Bounds {
    let p = 4 * i;
    Bounds::quad(
        [lat[p], lat[p + 1], lat[p + 2], lat[p + 3]],
        [lon[p], lon[p + 1], lon[p + 2], lon[p + 3]],
    )
}

#[inline]
fn compact_bounds(lat: &[f64], lon: &[f64], stride: usize, i: usize) -> Bounds {
    let ul = i + i / stride;
    let ur = ul + 1;
    let ll = ul + stride + 1;
    let lr = ul + stride + 2;
    Bounds::quad(
        [lat[ul], lat[ur], lat[lr], lat[ll]],
        [lon[ul], lon[ur], lon[lr], lon[ll]],
    )
}

/// Rows to consider
#[derive(Debug, Clone, Copy)]
pub enum Candidates<'a> {
    /// Every row of the layout
    All,
    /// A preselected subset; out-of-range entries are ignored
    Subset(&'a [usize]),
}

/// Returns the indices of rows whose footprint satisfies `pred` against
/// `query`, in candidate order
pub fn filter_rows(
    layout: &FootprintLayout<'_>,
    candidates: Candidates<'_>,
    query: &GeoBox,
    pred: GeomPredicate,
) -> Vec<usize> {
    match *layout {
        FootprintLayout::Corners { lat, lon } => {
            select(layout.len(), candidates, query, pred, |i| corner_bounds(lat, lon, i))
        }
        FootprintLayout::Compact { lat, lon, stride } => {
            select(layout.len(), candidates, query, pred, |i| {
                compact_bounds(lat, lon, stride, i)
            })
        }
        FootprintLayout::Points { lat, lon } => {
            select(layout.len(), candidates, query, pred, |i| Bounds::point(lat[i], lon[i]))
        }
    }
}

#[inline]
fn select<F>(
    len: usize,
    candidates: Candidates<'_>,
    query: &GeoBox,
    pred: GeomPredicate,
    bounds: F,
) -> Vec<usize>
where
    F: Fn(usize) -> Bounds,
{
    match candidates {
        Candidates::All => (0..len)
            .filter(|&i| pred.matches(&bounds(i), query))
            .collect(),
        Candidates::Subset(indices) => indices
            .iter()
            .copied()
            .filter(|&i| i < len && pred.matches(&bounds(i), query))
            .collect(),
    }
}

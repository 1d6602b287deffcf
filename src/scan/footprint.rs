//! Pixel footprints from scan-line geolocation
//!
//! Each pixel of line `L` is bounded by two edges: the previous edge between
//! lines `L-1` and `L`, and the next edge between `L` and `L+1`. Inside an
//! instrument scan, an edge is the midpoint of the two lines it separates.
//! At the first and last line of a scan the outer edge is extrapolated as
//! `2 * cur - other`.
//!
//! The edges live in a two-slot ring indexed by line parity: the next edge
//! of line `L` is the previous edge of line `L + 1` and is not recomputed.
//!
//! Along a line, an edge has one corner more than the line has samples.
//! Inner corners are midpoints of neighbouring samples; the two end corners
//! are mirrored from their single neighbour.

use crate::geometry::GeoPoint;

/// One dataset line with its neighbours; missing neighbours are mirrored
#[derive(Debug, Clone, Copy)]
pub struct LineWindow<'a> {
    pub prev: Option<&'a [f64]>,
    pub cur: &'a [f64],
    pub next: Option<&'a [f64]>,
}

impl<'a> LineWindow<'a> {
    pub fn new(prev: Option<&'a [f64]>, cur: &'a [f64], next: Option<&'a [f64]>) -> Self {
        Self { prev, cur, next }
    }

    /// `(prev, cur, next)` at `i`, mirroring whichever neighbour is absent
    fn at(&self, i: usize) -> (f64, f64, f64) {
        let c = self.cur[i];
        let p = self.prev.and_then(|p| p.get(i).copied());
        let n = self.next.and_then(|n| n.get(i).copied());
        match (p, n) {
            (Some(p), Some(n)) => (p, c, n),
            (Some(p), None) => (p, c, 2.0 * c - p),
            (None, Some(n)) => (2.0 * c - n, c, n),
            (None, None) => (c, c, c),
        }
    }
}

/// Corner coordinates of one edge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edge {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

impl Edge {
    pub fn point(&self, corner: usize) -> GeoPoint {
        GeoPoint::new(self.lat[corner], self.lon[corner])
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Prev,
    Next,
}

/// Footprint state of one file
#[derive(Debug, Clone)]
pub struct FootprintEngine {
    scan_size: usize,
    samples: usize,
    ring: [Edge; 2],
    line: Option<usize>,
}

impl FootprintEngine {
    pub fn new(scan_size: usize, samples: usize) -> Self {
        Self {
            scan_size: scan_size.max(1),
            samples,
            ring: [Edge::default(), Edge::default()],
            line: None,
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Line the edges currently describe
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Computes the edges of `line`
    ///
    /// When `line` directly follows the previous call and is not the first
    /// of a scan, its previous edge is taken from the ring as is.
    pub fn advance(&mut self, line: usize, lat: LineWindow<'_>, lon: LineWindow<'_>) {
        let pos = line % self.scan_size;
        let prev_slot = line % 2;
        let next_slot = (line + 1) % 2;
        let follows = line > 0 && self.line == Some(line - 1);

        if pos == 0 {
            self.ring[prev_slot] = self.edge(Side::Prev, true, &lat, &lon);
        } else if !follows {
            self.ring[prev_slot] = self.edge(Side::Prev, false, &lat, &lon);
        }

        let last = pos == self.scan_size - 1;
        self.ring[next_slot] = self.edge(Side::Next, last, &lat, &lon);
        self.line = Some(line);
    }

    fn edge(&self, side: Side, extrapolate: bool, lat: &LineWindow<'_>, lon: &LineWindow<'_>) -> Edge {
        Edge {
            lat: corners(&edge_values(side, extrapolate, lat, self.samples)),
            lon: corners(&edge_values(side, extrapolate, lon, self.samples)),
        }
    }

    pub fn prev_edge(&self) -> Option<&Edge> {
        self.line.map(|l| &self.ring[l % 2])
    }

    pub fn next_edge(&self) -> Option<&Edge> {
        self.line.map(|l| &self.ring[(l + 1) % 2])
    }

    /// Closed footprint of `sample`: previous edge left and right, next
    /// edge right and left, then the first corner again
    pub fn polygon(&self, sample: usize) -> Option<[GeoPoint; 5]> {
        let prev = self.prev_edge()?;
        let next = self.next_edge()?;
        if sample + 1 >= prev.len() || sample + 1 >= next.len() {
            return None;
        }
        Some([
            prev.point(sample),
            prev.point(sample + 1),
            next.point(sample + 1),
            next.point(sample),
            prev.point(sample),
        ])
    }

    /// Both edges as one two-row corner grid, previous edge first
    pub fn corner_grid(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        let prev = self.prev_edge()?;
        let next = self.next_edge()?;
        let lat = prev.lat.iter().chain(&next.lat).copied().collect();
        let lon = prev.lon.iter().chain(&next.lon).copied().collect();
        Some((lat, lon))
    }
}

/// Per-sample edge position across the line direction
fn edge_values(side: Side, extrapolate: bool, w: &LineWindow<'_>, samples: usize) -> Vec<f64> {
    let n = samples.min(w.cur.len());
    (0..n)
        .map(|i| {
            let (p, c, nx) = w.at(i);
            let other = match side {
                Side::Prev => {
                    if extrapolate {
                        nx
                    } else {
                        p
                    }
                }
                Side::Next => {
                    if extrapolate {
                        p
                    } else {
                        nx
                    }
                }
            };
            if extrapolate {
                extrapolate_value(c, other)
            } else {
                interpolate_value(c, other)
            }
        })
        .collect()
}

#[inline]
fn extrapolate_value(cur: f64, other: f64) -> f64 {
    2.0 * cur - other
}

#[inline]
fn interpolate_value(cur: f64, other: f64) -> f64 {
    (cur + other) / 2.0
}

/// Corners along the line between and around `values`
fn corners(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![values[0], values[0]],
        _ => {
            let mut out = Vec::with_capacity(n + 1);
            out.push((3.0 * values[0] - values[1]) / 2.0);
            for j in 1..n {
                out.push((values[j - 1] + values[j]) / 2.0);
            }
            out.push((3.0 * values[n - 1] - values[n - 2]) / 2.0);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(engine: &mut FootprintEngine, lines: &[Vec<f64>], lons: &[Vec<f64>], line: usize) {
        let lat = LineWindow::new(
            line.checked_sub(1).map(|l| lines[l].as_slice()),
            &lines[line],
            lines.get(line + 1).map(|l| l.as_slice()),
        );
        let lon = LineWindow::new(
            line.checked_sub(1).map(|l| lons[l].as_slice()),
            &lons[line],
            lons.get(line + 1).map(|l| l.as_slice()),
        );
        engine.advance(line, lat, lon);
    }

    #[test]
    fn test_two_line_scan() {
        let lat = vec![vec![10.0; 3], vec![20.0; 3]];
        let lon = vec![vec![5.0; 3], vec![5.0; 3]];
        let mut engine = FootprintEngine::new(2, 3);

        run(&mut engine, &lat, &lon, 0);
        assert_eq!(engine.prev_edge().unwrap().lat, vec![0.0; 4]);
        assert_eq!(engine.next_edge().unwrap().lat, vec![15.0; 4]);

        run(&mut engine, &lat, &lon, 1);
        assert_eq!(engine.prev_edge().unwrap().lat, vec![15.0; 4]);
        assert_eq!(engine.next_edge().unwrap().lat, vec![30.0; 4]);
        assert_eq!(engine.next_edge().unwrap().lon, vec![5.0; 4]);
    }

    #[test]
    fn test_identical_lines() {
        let lat = vec![vec![42.0; 4]; 3];
        let lon = vec![vec![-7.0; 4]; 3];
        for scan_size in [1, 2, 3, 10] {
            let mut engine = FootprintEngine::new(scan_size, 4);
            for line in 0..3 {
                run(&mut engine, &lat, &lon, line);
                assert_eq!(engine.prev_edge().unwrap().lat, vec![42.0; 5]);
                assert_eq!(engine.next_edge().unwrap().lat, vec![42.0; 5]);
                assert_eq!(engine.next_edge().unwrap().lon, vec![-7.0; 5]);
            }
        }
    }

    #[test]
    fn test_single_line_scan_extrapolates_both_edges() {
        let lat = vec![vec![0.0; 2], vec![1.0; 2], vec![2.0; 2]];
        let lon = vec![vec![0.0; 2]; 3];
        let mut engine = FootprintEngine::new(1, 2);
        run(&mut engine, &lat, &lon, 1);
        assert_eq!(engine.prev_edge().unwrap().lat, vec![0.0; 3]);
        assert_eq!(engine.next_edge().unwrap().lat, vec![2.0; 3]);
    }

    #[test]
    fn test_scan_boundary_restarts_prev_edge() {
        let lat: Vec<Vec<f64>> = (0..4).map(|l| vec![l as f64 * 10.0; 2]).collect();
        let lon = vec![vec![0.0; 2]; 4];
        let mut engine = FootprintEngine::new(2, 2);
        run(&mut engine, &lat, &lon, 0);
        run(&mut engine, &lat, &lon, 1);
        assert_eq!(engine.next_edge().unwrap().lat, vec![20.0; 3]);
        run(&mut engine, &lat, &lon, 2);
        // first line of the second scan: extrapolated from line 3
        assert_eq!(engine.prev_edge().unwrap().lat, vec![10.0; 3]);
        assert_eq!(engine.next_edge().unwrap().lat, vec![25.0; 3]);
    }

    #[test]
    fn test_last_file_line_mirrors_missing_neighbour() {
        let lat = vec![vec![0.0; 2], vec![10.0; 2]];
        let lon = vec![vec![0.0; 2]; 2];
        let mut engine = FootprintEngine::new(10, 2);
        run(&mut engine, &lat, &lon, 0);
        run(&mut engine, &lat, &lon, 1);
        assert_eq!(engine.prev_edge().unwrap().lat, vec![5.0; 3]);
        assert_eq!(engine.next_edge().unwrap().lat, vec![15.0; 3]);
    }

    #[test]
    fn test_polygon_corners() {
        let lat = vec![vec![0.0, 0.0], vec![2.0, 2.0]];
        let lon = vec![vec![0.0, 2.0], vec![0.0, 2.0]];
        let mut engine = FootprintEngine::new(2, 2);
        run(&mut engine, &lat, &lon, 0);

        let poly = engine.polygon(0).unwrap();
        assert_eq!(poly[0], GeoPoint::new(-2.0, -1.0));
        assert_eq!(poly[1], GeoPoint::new(-2.0, 1.0));
        assert_eq!(poly[2], GeoPoint::new(1.0, 1.0));
        assert_eq!(poly[3], GeoPoint::new(1.0, -1.0));
        assert_eq!(poly[4], poly[0]);
        assert!(engine.polygon(2).is_none());
    }

    #[test]
    fn test_out_of_order_line_recomputes_prev() {
        let lat: Vec<Vec<f64>> = (0..3).map(|l| vec![l as f64 * 10.0; 2]).collect();
        let lon = vec![vec![0.0; 2]; 3];
        let mut engine = FootprintEngine::new(10, 2);
        run(&mut engine, &lat, &lon, 2);
        assert_eq!(engine.prev_edge().unwrap().lat, vec![15.0; 3]);
    }

    #[test]
    fn test_corner_grid_layout() {
        let lat = vec![vec![10.0; 3], vec![20.0; 3]];
        let lon = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]];
        let mut engine = FootprintEngine::new(2, 3);
        run(&mut engine, &lat, &lon, 0);
        let (glat, glon) = engine.corner_grid().unwrap();
        assert_eq!(glat.len(), 8);
        assert_eq!(&glat[..4], &[0.0; 4]);
        assert_eq!(&glat[4..], &[15.0; 4]);
        assert_eq!(glon[..4], [0.5, 1.5, 2.5, 3.5]);
    }
}

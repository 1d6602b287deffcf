//! Geographic primitives
//!
//! A query box is stored in planar `x`/`y` form as the catalog database
//! stores it. Row bounds are computed from footprint corners in latitude and
//! longitude. Latitude is compared against `y` and longitude against `x`.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned query box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl GeoBox {
    /// Builds a box from two opposite corners in any order
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            xmin: x1.min(x2),
            xmax: x1.max(x2),
            ymin: y1.min(y2),
            ymax: y1.max(y2),
        }
    }
}

/// Extent of a single row footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub latmin: f64,
    pub latmax: f64,
    pub lonmin: f64,
    pub lonmax: f64,
}

impl Bounds {
    /// Bounds of a degenerate footprint at one point
    #[inline]
    pub fn point(lat: f64, lon: f64) -> Self {
        Self {
            latmin: lat,
            latmax: lat,
            lonmin: lon,
            lonmax: lon,
        }
    }

    /// Bounds of a quadrilateral given its four corner coordinates
    #[inline]
    pub fn quad(lat: [f64; 4], lon: [f64; 4]) -> Self {
        Self {
            latmin: lat[0].min(lat[1]).min(lat[2]).min(lat[3]),
            latmax: lat[0].max(lat[1]).max(lat[2]).max(lat[3]),
            lonmin: lon[0].min(lon[1]).min(lon[2]).min(lon[3]),
            lonmax: lon[0].max(lon[1]).max(lon[2]).max(lon[3]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_bounds() {
        let b = Bounds::quad([1.0, 3.0, 2.0, 0.5], [10.0, 11.0, 9.0, 12.0]);
        assert_eq!(b.latmin, 0.5);
        assert_eq!(b.latmax, 3.0);
        assert_eq!(b.lonmin, 9.0);
        assert_eq!(b.lonmax, 12.0);
    }

    #[test]
    fn test_box_from_corners_normalises() {
        let b = GeoBox::from_corners(5.0, -1.0, 2.0, 3.0);
        assert_eq!(b, GeoBox { xmin: 2.0, xmax: 5.0, ymin: -1.0, ymax: 3.0 });
    }
}

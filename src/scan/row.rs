//! Output rows

use chrono::NaiveDateTime;

use crate::expr::Datum;
use crate::geometry::GeoPoint;

/// Value of one output column
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Point(GeoPoint),
    /// Closed ring, first corner repeated last
    Polygon([GeoPoint; 5]),
    Timestamp(NaiveDateTime),
    /// Catalog column copied as fetched
    Datum(Datum),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Datum(Datum::Null))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Datum(d) => d.as_i64(),
            _ => None,
        }
    }
}

/// One pixel, values in table column order; unused columns are null
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, attno: usize) -> Option<&Value> {
        self.values.get(attno)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

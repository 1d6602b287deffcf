//! Column kinds of a swath table

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric storage type of a raw dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetType {
    Float,
    Byte,
    Int2,
    Int4,
    Int8,
}

/// What a table column is backed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Not referenced by the query, or not resolved yet
    Null,
    FileIndex,
    LineIndex,
    SampleIndex,
    Point,
    Footprint,
    Time,
    Catalog,
    Dataset(DatasetType),
}

impl ColumnType {
    /// Parses a column `type` option; `None` selects a float dataset
    pub fn parse(name: Option<&str>) -> Option<ColumnType> {
        let name = match name {
            None => return Some(ColumnType::Dataset(DatasetType::Float)),
            Some(n) => n,
        };
        let kind = match name {
            "float" => ColumnType::Dataset(DatasetType::Float),
            "byte" => ColumnType::Dataset(DatasetType::Byte),
            "int2" => ColumnType::Dataset(DatasetType::Int2),
            "int4" => ColumnType::Dataset(DatasetType::Int4),
            "int8" => ColumnType::Dataset(DatasetType::Int8),
            "point" => ColumnType::Point,
            "footprint" => ColumnType::Footprint,
            "file_index" => ColumnType::FileIndex,
            "line_index" => ColumnType::LineIndex,
            "sample_index" => ColumnType::SampleIndex,
            "time" => ColumnType::Time,
            "catalog" => ColumnType::Catalog,
            _ => return None,
        };
        Some(kind)
    }

    /// Option spelling of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Null => "null",
            ColumnType::FileIndex => "file_index",
            ColumnType::LineIndex => "line_index",
            ColumnType::SampleIndex => "sample_index",
            ColumnType::Point => "point",
            ColumnType::Footprint => "footprint",
            ColumnType::Time => "time",
            ColumnType::Catalog => "catalog",
            ColumnType::Dataset(DatasetType::Float) => "float",
            ColumnType::Dataset(DatasetType::Byte) => "byte",
            ColumnType::Dataset(DatasetType::Int2) => "int2",
            ColumnType::Dataset(DatasetType::Int4) => "int4",
            ColumnType::Dataset(DatasetType::Int8) => "int8",
        }
    }

    /// Host SQL type the column must be declared with; `None` if unrestricted
    pub fn expected_host_type(&self) -> Option<&'static str> {
        match self {
            ColumnType::Dataset(_) => Some("float8"),
            ColumnType::Point | ColumnType::Footprint => Some("geometry"),
            ColumnType::FileIndex | ColumnType::LineIndex | ColumnType::SampleIndex => {
                Some("int4")
            }
            ColumnType::Time => Some("timestamp"),
            ColumnType::Catalog | ColumnType::Null => None,
        }
    }

    /// Estimated tuple width in bytes
    pub fn width(&self, host_width: Option<usize>) -> usize {
        match self {
            ColumnType::Null => 0,
            ColumnType::FileIndex | ColumnType::LineIndex | ColumnType::SampleIndex => 4,
            ColumnType::Point => 32,
            ColumnType::Footprint => 120,
            ColumnType::Time => 8,
            ColumnType::Catalog | ColumnType::Dataset(_) => host_width.unwrap_or(8),
        }
    }

    /// Point or footprint
    pub fn is_geometry(&self) -> bool {
        matches!(self, ColumnType::Point | ColumnType::Footprint)
    }

    pub fn is_dataset(&self) -> bool {
        matches!(self, ColumnType::Dataset(_))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

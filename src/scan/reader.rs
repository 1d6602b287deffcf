//! Swath file access provided by the host

use super::errors::ReadError;

/// One scan line of a dataset in its stored numeric type
#[derive(Debug, Clone, PartialEq)]
pub enum LineBuffer {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl LineBuffer {
    pub fn len(&self) -> usize {
        match self {
            LineBuffer::Int8(v) => v.len(),
            LineBuffer::UInt8(v) => v.len(),
            LineBuffer::Int16(v) => v.len(),
            LineBuffer::UInt16(v) => v.len(),
            LineBuffer::Int32(v) => v.len(),
            LineBuffer::Int64(v) => v.len(),
            LineBuffer::Float32(v) => v.len(),
            LineBuffer::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw value at `sample` widened to `f64`
    pub fn value(&self, sample: usize) -> Option<f64> {
        match self {
            LineBuffer::Int8(v) => v.get(sample).map(|&x| f64::from(x)),
            LineBuffer::UInt8(v) => v.get(sample).map(|&x| f64::from(x)),
            LineBuffer::Int16(v) => v.get(sample).map(|&x| f64::from(x)),
            LineBuffer::UInt16(v) => v.get(sample).map(|&x| f64::from(x)),
            LineBuffer::Int32(v) => v.get(sample).map(|&x| f64::from(x)),
            LineBuffer::Int64(v) => v.get(sample).map(|&x| x as f64),
            LineBuffer::Float32(v) => v.get(sample).map(|&x| f64::from(x)),
            LineBuffer::Float64(v) => v.get(sample).copied(),
        }
    }

    /// Whole line widened to `f64`
    pub fn to_f64(&self) -> Vec<f64> {
        (0..self.len()).filter_map(|i| self.value(i)).collect()
    }
}

/// Shape and attributes of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub lines: usize,
    pub samples: usize,
    /// Raw value marking missing data
    pub fill_value: Option<f64>,
    pub scale: Option<f64>,
    pub offset: Option<f64>,
}

impl DatasetInfo {
    pub fn new(lines: usize, samples: usize) -> Self {
        Self {
            lines,
            samples,
            fill_value: None,
            scale: None,
            offset: None,
        }
    }
}

/// An open swath file
pub trait SwathFile {
    /// Looks up a dataset by name
    fn dataset(&self, name: &str) -> Result<DatasetInfo, ReadError>;

    /// Reads `samples` values of one line
    fn read_line(&mut self, name: &str, line: usize, samples: usize)
        -> Result<LineBuffer, ReadError>;

    /// Acquisition start time stored in the file, if any
    fn start_time(&self) -> Option<chrono::NaiveDateTime> {
        None
    }
}

/// Opens swath files by path
pub trait FileReader {
    type File: SwathFile;

    fn open(&mut self, path: &str) -> Result<Self::File, ReadError>;
}

impl<R: FileReader + ?Sized> FileReader for &mut R {
    type File = R::File;

    fn open(&mut self, path: &str) -> Result<Self::File, ReadError> {
        (**self).open(path)
    }
}

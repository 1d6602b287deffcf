//! Per-file scan state
//!
//! Owns the open file and one buffer set per dataset the scan needs.
//! Geolocation datasets feeding footprints are windowed: the previous,
//! current and next line are kept so both footprint edges can be computed.
//! Moving to the following line rotates the window and reads only the new
//! next line.

use chrono::NaiveDateTime;

use super::errors::ReadError;
use super::footprint::{FootprintEngine, LineWindow};
use super::reader::SwathFile;
use crate::config::TableOptions;
use crate::expr::ColumnType;
use crate::geometry::GeoPoint;
use crate::planner::ScanPlan;

/// Line buffers of one dataset
#[derive(Debug, Clone)]
struct DatasetBuffer {
    name: String,
    windowed: bool,
    fill_value: Option<f64>,
    scale: f64,
    offset: f64,
    prev: Option<Vec<f64>>,
    cur: Vec<f64>,
    next: Option<Vec<f64>>,
}

impl DatasetBuffer {
    fn window(&self) -> LineWindow<'_> {
        LineWindow::new(self.prev.as_deref(), &self.cur, self.next.as_deref())
    }
}

/// What the scan needs from each file, derived once per plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLayout {
    /// Dataset name for each dataset column, by attno
    pub columns: Vec<Option<String>>,
    pub latitude: String,
    pub longitude: String,
    pub needs_points: bool,
    pub needs_footprints: bool,
    pub scan_size: usize,
}

impl FileLayout {
    pub fn from_plan(plan: &ScanPlan) -> Self {
        let opts: &TableOptions = &plan.options;
        let columns = plan
            .column_types
            .iter()
            .enumerate()
            .map(|(attno, kind)| match kind {
                ColumnType::Dataset(_) => opts
                    .columns
                    .get(attno)
                    .map(|c| c.dataset_name().to_string()),
                _ => None,
            })
            .collect();
        let uses = |kind: ColumnType| {
            plan.column_types.contains(&kind) || plan.predicates.iter().any(|p| p.column == kind)
        };
        Self {
            columns,
            latitude: opts.latitude_dataset.clone(),
            longitude: opts.longitude_dataset.clone(),
            needs_points: uses(ColumnType::Point),
            needs_footprints: uses(ColumnType::Footprint),
            scan_size: opts.scan_size,
        }
    }
}

/// An open file positioned on one line
pub struct FileScanState<F: SwathFile> {
    file: F,
    path: String,
    file_index: i64,
    start_time: Option<NaiveDateTime>,
    lines: usize,
    samples: usize,
    line: Option<usize>,
    datasets: Vec<DatasetBuffer>,
    /// Index into `datasets` for each dataset column
    column_buffers: Vec<Option<usize>>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    footprint: Option<FootprintEngine>,
}

impl<F: SwathFile> FileScanState<F> {
    /// Looks up every needed dataset and checks they share one shape
    ///
    /// Dataset columns take fill value, scale and offset from the file
    /// attributes, falling back to the column options.
    pub fn open(
        file: F,
        path: &str,
        file_index: i64,
        start_time: Option<NaiveDateTime>,
        layout: &FileLayout,
        opts: &TableOptions,
    ) -> Result<Self, ReadError> {
        let mut state = Self {
            start_time: start_time.or_else(|| file.start_time()),
            file,
            path: path.to_string(),
            file_index,
            lines: 0,
            samples: 0,
            line: None,
            datasets: Vec::new(),
            column_buffers: vec![None; layout.columns.len()],
            latitude: None,
            longitude: None,
            footprint: None,
        };

        for (attno, name) in layout.columns.iter().enumerate() {
            if let Some(name) = name {
                let column = opts.columns.get(attno);
                let idx = state.add_dataset(
                    name,
                    false,
                    column.and_then(|c| c.fill_value),
                    column.map_or(1.0, |c| c.scale),
                    column.map_or(0.0, |c| c.offset),
                )?;
                state.column_buffers[attno] = Some(idx);
            }
        }

        if layout.needs_points || layout.needs_footprints {
            let windowed = layout.needs_footprints;
            state.latitude = Some(state.add_dataset(&layout.latitude, windowed, None, 1.0, 0.0)?);
            state.longitude = Some(state.add_dataset(&layout.longitude, windowed, None, 1.0, 0.0)?);
        }

        // the file size still comes from geolocation when no dataset is read
        if state.datasets.is_empty() {
            state.add_dataset(&layout.latitude, false, None, 1.0, 0.0)?;
        }

        if layout.needs_footprints {
            state.footprint = Some(FootprintEngine::new(layout.scan_size, state.samples));
        }
        Ok(state)
    }

    fn add_dataset(
        &mut self,
        name: &str,
        windowed: bool,
        fill_value: Option<f64>,
        scale: f64,
        offset: f64,
    ) -> Result<usize, ReadError> {
        if let Some(idx) = self.datasets.iter().position(|d| d.name == name) {
            self.datasets[idx].windowed |= windowed;
            return Ok(idx);
        }

        let info = self.file.dataset(name)?;
        if self.datasets.is_empty() {
            self.lines = info.lines;
            self.samples = info.samples;
        } else if info.lines != self.lines || info.samples != self.samples {
            return Err(ReadError::Shape {
                dataset: name.to_string(),
                expected: format!("{}x{}", self.lines, self.samples),
                found: format!("{}x{}", info.lines, info.samples),
            });
        }

        self.datasets.push(DatasetBuffer {
            name: name.to_string(),
            windowed,
            fill_value: info.fill_value.or(fill_value),
            scale: info.scale.unwrap_or(scale),
            offset: info.offset.unwrap_or(offset),
            prev: None,
            cur: Vec::new(),
            next: None,
        });
        Ok(self.datasets.len() - 1)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file_index(&self) -> i64 {
        self.file_index
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Line currently loaded
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    fn read(&mut self, idx: usize, line: usize) -> Result<Vec<f64>, ReadError> {
        let name = &self.datasets[idx].name;
        let buf = self.file.read_line(name, line, self.samples)?;
        if buf.len() != self.samples {
            return Err(ReadError::Line {
                dataset: name.clone(),
                line,
                reason: format!("got {} samples, expected {}", buf.len(), self.samples),
            });
        }
        Ok(buf.to_f64())
    }

    /// Loads `line` into every buffer and updates the footprint edges
    pub fn fetch_line(&mut self, line: usize) -> Result<(), ReadError> {
        if line >= self.lines {
            return Err(ReadError::Line {
                dataset: self.path.clone(),
                line,
                reason: format!("file has {} lines", self.lines),
            });
        }
        let follows = line > 0 && self.line == Some(line - 1);

        for idx in 0..self.datasets.len() {
            if !self.datasets[idx].windowed {
                self.datasets[idx].cur = self.read(idx, line)?;
                continue;
            }

            let rotated = follows && self.datasets[idx].next.is_some();
            if rotated {
                let ds = &mut self.datasets[idx];
                let cur = std::mem::take(&mut ds.cur);
                ds.prev = Some(cur);
                ds.cur = ds.next.take().unwrap_or_default();
            } else {
                let prev = if line > 0 { Some(self.read(idx, line - 1)?) } else { None };
                let cur = self.read(idx, line)?;
                let ds = &mut self.datasets[idx];
                ds.prev = prev;
                ds.cur = cur;
            }

            let next = if line + 1 < self.lines {
                Some(self.read(idx, line + 1)?)
            } else {
                None
            };
            self.datasets[idx].next = next;
        }

        if let (Some(engine), Some(lat), Some(lon)) =
            (self.footprint.as_mut(), self.latitude, self.longitude)
        {
            engine.advance(line, self.datasets[lat].window(), self.datasets[lon].window());
        }
        self.line = Some(line);
        Ok(())
    }

    /// Scaled value of a dataset column, `None` on the fill value
    pub fn dataset_value(&self, attno: usize, sample: usize) -> Option<f64> {
        let ds = &self.datasets[(*self.column_buffers.get(attno)?)?];
        let raw = *ds.cur.get(sample)?;
        if ds.fill_value == Some(raw) {
            return None;
        }
        Some(raw / ds.scale - ds.offset)
    }

    /// Geolocation of the current line
    pub fn geolocation(&self) -> Option<(&[f64], &[f64])> {
        let lat = &self.datasets[self.latitude?].cur;
        let lon = &self.datasets[self.longitude?].cur;
        Some((lat, lon))
    }

    pub fn point(&self, sample: usize) -> Option<GeoPoint> {
        let (lat, lon) = self.geolocation()?;
        Some(GeoPoint::new(*lat.get(sample)?, *lon.get(sample)?))
    }

    pub fn polygon(&self, sample: usize) -> Option<[GeoPoint; 5]> {
        self.footprint.as_ref()?.polygon(sample)
    }

    /// Corner grid of the current line's footprints, previous edge first
    pub fn footprint_grid(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        self.footprint.as_ref()?.corner_grid()
    }
}

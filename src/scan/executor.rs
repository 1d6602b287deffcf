//! Scan execution
//!
//! [`SwathScan`] pulls one row per call:
//! 1. take the next file from the catalog cursor (or the single configured
//!    file) and open it
//! 2. load the next line and run the geometry checks over its samples
//! 3. emit the surviving samples one by one
//!
//! Catalog rows missing a file id or filename and files that cannot be
//! opened or read are logged and skipped. Catalog failures end the scan
//! with an error.

use super::errors::{ScanError, ScanResult};
use super::file::{FileLayout, FileScanState};
use super::reader::FileReader;
use super::row::{Row, Value};
use crate::analyze::PredicateDescriptor;
use crate::catalog::{CatalogConnection, CatalogCursor, CursorStatus};
use crate::config::TableSource;
use crate::expr::{ColumnType, Datum};
use crate::geometry::{filter_rows, Candidates, FootprintLayout, GeoBox};
use crate::observability::{Event, Logger, MetricsSnapshot, ScanMetrics};
use crate::planner::ScanPlan;

/// Row producer for one execution of a [`ScanPlan`]
pub struct SwathScan<C: CatalogConnection, R: FileReader> {
    plan: ScanPlan,
    layout: FileLayout,
    cursor: Option<CatalogCursor<C>>,
    reader: R,
    params: Vec<Datum>,
    /// Query box per predicate, `None` when the operand is null
    boxes: Vec<Option<GeoBox>>,
    file: Option<FileScanState<R::File>>,
    /// Single-file mode: the file has been handed out
    file_taken: bool,
    /// Samples of the current line that passed the geometry checks
    selected: Vec<usize>,
    position: usize,
    exhausted: bool,
    ended: bool,
    metrics: ScanMetrics,
}

impl<C: CatalogConnection, R: FileReader> SwathScan<C, R> {
    /// Starts a scan
    ///
    /// `params` holds the values of the plan's parameter expressions; the
    /// leading ones bind the catalog query. A catalog-backed table needs
    /// `conn`.
    pub fn begin(plan: ScanPlan, conn: Option<C>, reader: R, params: Vec<Datum>) -> ScanResult<Self> {
        check_param_count(&plan, &params)?;
        let boxes = query_boxes(&plan.predicates, &params)?;

        let cursor = match plan.options.source() {
            Ok(TableSource::Catalog(_)) => {
                let conn = conn.ok_or_else(|| ScanError::failed("Catalog connection required"))?;
                let query = plan
                    .query
                    .clone()
                    .ok_or_else(|| ScanError::failed("Plan has no catalog query"))?;
                let mut cursor = CatalogCursor::new(conn, query)?;
                start_cursor(&mut cursor, &plan, &params)?;
                Some(cursor)
            }
            Ok(TableSource::File(_)) => None,
            Err(e) => return Err(ScanError::failed(e.message())),
        };

        let layout = FileLayout::from_plan(&plan);
        let relid = plan.relid.to_string();
        let predicates = plan.predicates.len().to_string();
        Logger::event(
            Event::ScanBegin,
            &[
                ("relid", relid.as_str()),
                ("predicates", predicates.as_str()),
            ],
        );

        Ok(Self {
            plan,
            layout,
            cursor,
            reader,
            params,
            boxes,
            file: None,
            file_taken: false,
            selected: Vec::new(),
            position: 0,
            exhausted: false,
            ended: false,
            metrics: ScanMetrics::new(),
        })
    }

    pub fn plan(&self) -> &ScanPlan {
        &self.plan
    }

    pub fn params(&self) -> &[Datum] {
        &self.params
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Produces the next row, `None` once every file is consumed
    pub fn next_row(&mut self) -> ScanResult<Option<Row>> {
        if self.ended {
            return Err(ScanError::failed("Scan already ended"));
        }
        loop {
            if self.file.is_none() {
                if self.exhausted || !self.open_next_file()? {
                    if !self.exhausted {
                        self.exhausted = true;
                        let rows = self.metrics.snapshot().rows_returned.to_string();
                        Logger::event(Event::ScanExhausted, &[("rows", rows.as_str())]);
                    }
                    return Ok(None);
                }
                continue;
            }

            if self.position < self.selected.len() {
                let sample = self.selected[self.position];
                self.position += 1;
                let row = self.build_row(sample);
                self.metrics.increment_rows_returned();
                return Ok(Some(row));
            }

            self.advance_line()?;
        }
    }

    /// Loads the next line of the current file, closing it at the end or on
    /// a read failure
    fn advance_line(&mut self) -> ScanResult<()> {
        let file = match self.file.as_mut() {
            Some(f) => f,
            None => return Ok(()),
        };
        let line = file.line().map_or(0, |l| l + 1);
        if line >= file.lines() {
            self.close_file();
            return Ok(());
        }

        if let Err(e) = file.fetch_line(line) {
            let reason = e.to_string();
            Logger::event(
                Event::FileReadFailed,
                &[("path", file.path()), ("reason", reason.as_str())],
            );
            let err = ScanError::file_read_failed(file.path(), &e);
            self.metrics.increment_files_skipped();
            self.close_file();
            return if self.cursor.is_some() { Ok(()) } else { Err(err) };
        }
        self.metrics.increment_lines_read();

        self.selected = select_samples(file, &self.plan.predicates, &self.boxes);
        self.position = 0;
        let rejected = file.samples().saturating_sub(self.selected.len());
        self.metrics.add_rows_rejected(rejected as u64);
        Ok(())
    }

    /// Opens the next usable file; `false` when there is none
    fn open_next_file(&mut self) -> ScanResult<bool> {
        let cursor = match self.cursor.as_mut() {
            Some(c) => c,
            None => return self.open_single_file(),
        };

        let opts = &self.plan.options;
        loop {
            match cursor.advance()? {
                CursorStatus::Ok => {}
                CursorStatus::Eof => return Ok(false),
                CursorStatus::NotStarted => {
                    return Err(ScanError::failed("Catalog cursor not started"))
                }
            }
            self.metrics.increment_catalog_rows();

            let file_id = cursor.value(&opts.file_id_column).and_then(Datum::as_i64);
            let path = cursor.text(&opts.filename_column).map(str::to_string);
            let (file_id, path) = match (file_id, path) {
                (Some(id), Some(path)) => (id, path),
                _ => {
                    Logger::event(
                        Event::CatalogRowSkipped,
                        &[("reason", "file_id or filename is null")],
                    );
                    self.metrics.increment_files_skipped();
                    continue;
                }
            };
            let start_time = cursor
                .value(&opts.starttime_column)
                .and_then(Datum::as_timestamp);

            let opened = self
                .reader
                .open(&path)
                .and_then(|f| FileScanState::open(f, &path, file_id, start_time, &self.layout, opts));
            match opened {
                Ok(state) => {
                    self.on_file_opened(state);
                    return Ok(true);
                }
                Err(e) => {
                    let reason = e.to_string();
                    Logger::event(
                        Event::FileOpenFailed,
                        &[("path", path.as_str()), ("reason", reason.as_str())],
                    );
                    self.metrics.increment_files_skipped();
                }
            }
        }
    }

    /// The configured file is opened once; failing to open it is an error
    fn open_single_file(&mut self) -> ScanResult<bool> {
        if self.file_taken {
            return Ok(false);
        }
        self.file_taken = true;
        let path = match &self.plan.options.filename {
            Some(p) => p.clone(),
            None => return Err(ScanError::failed("Table has no file to scan")),
        };
        let opened = self.reader.open(&path).and_then(|f| {
            FileScanState::open(f, &path, 0, None, &self.layout, &self.plan.options)
        });
        match opened {
            Ok(state) => {
                self.on_file_opened(state);
                Ok(true)
            }
            Err(e) => {
                let reason = e.to_string();
                Logger::event(
                    Event::FileOpenFailed,
                    &[("path", path.as_str()), ("reason", reason.as_str())],
                );
                Err(ScanError::file_read_failed(&path, &e))
            }
        }
    }

    fn on_file_opened(&mut self, state: FileScanState<R::File>) {
        let id = state.file_index().to_string();
        let lines = state.lines().to_string();
        Logger::event(
            Event::FileOpened,
            &[
                ("path", state.path()),
                ("file_id", id.as_str()),
                ("lines", lines.as_str()),
            ],
        );
        self.metrics.increment_files_opened();
        self.file = Some(state);
        self.selected.clear();
        self.position = 0;
    }

    fn close_file(&mut self) {
        self.file = None;
        self.selected.clear();
        self.position = 0;
    }

    fn build_row(&self, sample: usize) -> Row {
        let file = match &self.file {
            Some(f) => f,
            None => return Row::new(vec![Value::Null; self.plan.column_types.len()]),
        };
        let values = self
            .plan
            .column_types
            .iter()
            .enumerate()
            .map(|(attno, kind)| match kind {
                ColumnType::Null => Value::Null,
                ColumnType::FileIndex => Value::Int(file.file_index()),
                ColumnType::LineIndex => file.line().map_or(Value::Null, |l| Value::Int(l as i64)),
                ColumnType::SampleIndex => Value::Int(sample as i64),
                ColumnType::Point => file.point(sample).map_or(Value::Null, Value::Point),
                ColumnType::Footprint => file.polygon(sample).map_or(Value::Null, Value::Polygon),
                ColumnType::Time => file.start_time().map_or(Value::Null, Value::Timestamp),
                ColumnType::Catalog => self.catalog_value(attno),
                ColumnType::Dataset(_) => file
                    .dataset_value(attno, sample)
                    .map_or(Value::Null, Value::Float),
            })
            .collect();
        Row::new(values)
    }

    fn catalog_value(&self, attno: usize) -> Value {
        let name = self
            .plan
            .options
            .columns
            .get(attno)
            .and_then(|c| c.catalog_name());
        match (&self.cursor, name) {
            (Some(cursor), Some(name)) => cursor
                .value(name)
                .cloned()
                .map_or(Value::Null, Value::Datum),
            _ => Value::Null,
        }
    }

    /// Restarts the scan with new parameter values
    ///
    /// The prepared catalog statement is reused.
    pub fn rescan(&mut self, params: Vec<Datum>) -> ScanResult<()> {
        if self.ended {
            return Err(ScanError::failed("Scan already ended"));
        }
        check_param_count(&self.plan, &params)?;
        self.boxes = query_boxes(&self.plan.predicates, &params)?;
        self.close_file();
        self.file_taken = false;
        self.exhausted = false;
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.reset();
            start_cursor(cursor, &self.plan, &params)?;
        }
        self.params = params;
        let count = self.params.len().to_string();
        Logger::event(Event::ScanRescan, &[("params", count.as_str())]);
        Ok(())
    }

    /// Releases the file, the cursor and the catalog statement
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.close_file();
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.free();
        }
        self.ended = true;
        let snap = self.metrics.snapshot();
        let files = snap.files_opened.to_string();
        let rows = snap.rows_returned.to_string();
        Logger::event(
            Event::ScanEnd,
            &[("files", files.as_str()), ("rows", rows.as_str())],
        );
    }
}

impl<C: CatalogConnection, R: FileReader> Drop for SwathScan<C, R> {
    fn drop(&mut self) {
        self.end();
    }
}

fn check_param_count(plan: &ScanPlan, params: &[Datum]) -> ScanResult<()> {
    if params.len() != plan.params.len() {
        return Err(ScanError::parameter_invalid(format!(
            "Plan has {} parameters, got {} values",
            plan.params.len(),
            params.len()
        )));
    }
    Ok(())
}

fn start_cursor<C: CatalogConnection>(
    cursor: &mut CatalogCursor<C>,
    plan: &ScanPlan,
    params: &[Datum],
) -> ScanResult<()> {
    let count = plan.catalog_param_count();
    let types = plan.param_types();
    cursor.start(&types[..count], &params[..count])?;
    Ok(())
}

/// Query box of every predicate; a null operand matches nothing
fn query_boxes(predicates: &[PredicateDescriptor], params: &[Datum]) -> ScanResult<Vec<Option<GeoBox>>> {
    predicates
        .iter()
        .map(|p| match params.get(p.param_index) {
            Some(Datum::Box(b)) => Ok(Some(*b)),
            Some(Datum::Null) => Ok(None),
            Some(other) => Err(ScanError::parameter_invalid(format!(
                "Parameter {} is not a geometry: {:?}",
                p.param_index + 1,
                other
            ))),
            None => Err(ScanError::parameter_invalid(format!(
                "Parameter {} missing",
                p.param_index + 1
            ))),
        })
        .collect()
}

/// Samples of the loaded line passing every geometry predicate
fn select_samples<F: super::reader::SwathFile>(
    file: &FileScanState<F>,
    predicates: &[PredicateDescriptor],
    boxes: &[Option<GeoBox>],
) -> Vec<usize> {
    let samples = file.samples();
    let mut selected: Option<Vec<usize>> = None;
    for (pred, qbox) in predicates.iter().zip(boxes) {
        let qbox = match qbox {
            Some(b) => b,
            None => return Vec::new(),
        };
        let candidates = match &selected {
            Some(rows) => Candidates::Subset(rows),
            None => Candidates::All,
        };
        let rows = match pred.column {
            ColumnType::Footprint => match file.footprint_grid() {
                Some((lat, lon)) => match FootprintLayout::compact(&lat, &lon, samples) {
                    Some(layout) => filter_rows(&layout, candidates, qbox, pred.pred),
                    None => Vec::new(),
                },
                None => Vec::new(),
            },
            ColumnType::Point => match file
                .geolocation()
                .and_then(|(lat, lon)| FootprintLayout::points(lat, lon))
            {
                Some(layout) => filter_rows(&layout, candidates, qbox, pred.pred),
                None => Vec::new(),
            },
            _ => continue,
        };
        selected = Some(rows);
    }
    selected.unwrap_or_else(|| (0..samples).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeomOperator, GeomPredicate};

    fn descriptor(param_index: usize) -> PredicateDescriptor {
        PredicateDescriptor {
            column: ColumnType::Footprint,
            attno: 1,
            pred: GeomPredicate { op: GeomOperator::Overlaps, negated: false },
            param_index,
        }
    }

    #[test]
    fn test_query_boxes() {
        let b = GeoBox::from_corners(0.0, 0.0, 1.0, 1.0);
        let boxes = query_boxes(
            &[descriptor(1), descriptor(0)],
            &[Datum::Null, Datum::Box(b)],
        )
        .unwrap();
        assert_eq!(boxes, vec![Some(b), None]);
    }

    #[test]
    fn test_query_box_wrong_type() {
        let err = query_boxes(&[descriptor(0)], &[Datum::Int(3)]).unwrap_err();
        assert_eq!(err.code(), crate::scan::ScanErrorCode::HvaultScanParameterInvalid);
        assert!(query_boxes(&[descriptor(2)], &[]).is_err());
    }
}

//! Catalog cursor
//!
//! Streams catalog rows one at a time over a connection owned by the
//! cursor. The prepared statement survives `reset` so re-scans with new
//! parameter values do not prepare again; `free` and `Drop` release
//! everything.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::errors::{CatalogError, CatalogResult};
use super::query::PackedQuery;
use super::quote::quote_qualified;
use crate::config::TableSource;
use crate::expr::Datum;
use crate::observability::{Event, Logger};

/// Host handle of a prepared catalog statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementHandle(pub u64);

/// One value of a fetched catalog row
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogField {
    pub name: String,
    pub value: Datum,
    /// Text form, `None` for null
    pub text: Option<String>,
}

impl CatalogField {
    pub fn new(name: impl Into<String>, value: Datum) -> Self {
        let text = datum_text(&value);
        Self {
            name: name.into(),
            value,
            text,
        }
    }
}

fn datum_text(value: &Datum) -> Option<String> {
    match value {
        Datum::Null => None,
        Datum::Bool(b) => Some(if *b { "t" } else { "f" }.to_string()),
        Datum::Int(v) => Some(v.to_string()),
        Datum::Float(v) => Some(v.to_string()),
        Datum::Numeric(s) | Datum::Text(s) | Datum::Bits(s) => Some(s.clone()),
        Datum::Timestamp(t) => Some(t.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        Datum::Box(b) => Some(format!("BOX({} {},{} {})", b.xmin, b.ymin, b.xmax, b.ymax)),
    }
}

/// Catalog database access provided by the host
pub trait CatalogConnection {
    /// Prepares `query` with placeholders of the given types
    fn prepare(&mut self, query: &str, param_types: &[&str]) -> CatalogResult<StatementHandle>;

    /// Opens a named cursor over a prepared statement
    fn open_cursor(
        &mut self,
        name: &str,
        statement: StatementHandle,
        params: &[Datum],
    ) -> CatalogResult<()>;

    /// Fetches the next row of a cursor, `None` at the end
    fn fetch(&mut self, name: &str) -> CatalogResult<Option<Vec<CatalogField>>>;

    fn close_cursor(&mut self, name: &str);

    fn free_statement(&mut self, statement: StatementHandle);

    /// Runs a single-value count query
    fn count(&mut self, query: &str) -> CatalogResult<i64>;
}

impl<C: CatalogConnection + ?Sized> CatalogConnection for &mut C {
    fn prepare(&mut self, query: &str, param_types: &[&str]) -> CatalogResult<StatementHandle> {
        (**self).prepare(query, param_types)
    }

    fn open_cursor(
        &mut self,
        name: &str,
        statement: StatementHandle,
        params: &[Datum],
    ) -> CatalogResult<()> {
        (**self).open_cursor(name, statement, params)
    }

    fn fetch(&mut self, name: &str) -> CatalogResult<Option<Vec<CatalogField>>> {
        (**self).fetch(name)
    }

    fn close_cursor(&mut self, name: &str) {
        (**self).close_cursor(name)
    }

    fn free_statement(&mut self, statement: StatementHandle) {
        (**self).free_statement(statement)
    }

    fn count(&mut self, query: &str) -> CatalogResult<i64> {
        (**self).count(query)
    }
}

/// Outcome of [`CatalogCursor::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStatus {
    /// A row was fetched
    Ok,
    /// No more rows; repeated calls keep returning `Eof`
    Eof,
    /// `start` has not been called
    NotStarted,
}

/// Paginated stream over the catalog query
pub struct CatalogCursor<C: CatalogConnection> {
    conn: C,
    query: PackedQuery,
    statement: Option<StatementHandle>,
    /// Name of the open server-side cursor
    name: Option<String>,
    exhausted: bool,
    row: BTreeMap<String, CatalogField>,
}

impl<C: CatalogConnection> CatalogCursor<C> {
    /// Binds a verified packed query to a connection
    pub fn new(conn: C, query: PackedQuery) -> CatalogResult<Self> {
        query.verify()?;
        Ok(Self {
            conn,
            query,
            statement: None,
            name: None,
            exhausted: false,
            row: BTreeMap::new(),
        })
    }

    pub fn param_count(&self) -> usize {
        self.query.param_count
    }

    pub fn query(&self) -> &PackedQuery {
        &self.query
    }

    pub fn is_started(&self) -> bool {
        self.name.is_some()
    }

    pub fn is_prepared(&self) -> bool {
        self.statement.is_some()
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Opens the stream with `params`, preparing the statement on first use
    ///
    /// An already open stream is closed first.
    pub fn start(&mut self, param_types: &[&str], params: &[Datum]) -> CatalogResult<()> {
        if params.len() != self.query.param_count || param_types.len() != params.len() {
            return Err(CatalogError::query_invalid(format!(
                "Catalog query expects {} parameters, got {} values and {} types",
                self.query.param_count,
                params.len(),
                param_types.len()
            )));
        }
        if self.name.is_some() {
            self.reset();
        }

        let statement = match self.statement {
            Some(s) => s,
            None => {
                let s = self.conn.prepare(&self.query.text, param_types)?;
                Logger::event(Event::CatalogPrepared, &[("query", self.query.text.as_str())]);
                self.statement = Some(s);
                s
            }
        };

        let name = format!("hvault_{}", Uuid::new_v4().simple());
        self.conn.open_cursor(&name, statement, params)?;
        let count = params.len().to_string();
        Logger::event(
            Event::CatalogCursorStarted,
            &[("cursor", name.as_str()), ("params", count.as_str())],
        );
        self.name = Some(name);
        self.exhausted = false;
        Ok(())
    }

    /// Fetches exactly one row
    pub fn advance(&mut self) -> CatalogResult<CursorStatus> {
        let name = match &self.name {
            Some(n) => n,
            None => return Ok(CursorStatus::NotStarted),
        };
        if self.exhausted {
            return Ok(CursorStatus::Eof);
        }
        match self.conn.fetch(name)? {
            Some(fields) => {
                self.row.clear();
                for field in fields {
                    self.row.insert(field.name.clone(), field);
                }
                Ok(CursorStatus::Ok)
            }
            None => {
                self.exhausted = true;
                self.row.clear();
                Ok(CursorStatus::Eof)
            }
        }
    }

    /// Typed value of a column in the current row
    pub fn value(&self, name: &str) -> Option<&Datum> {
        self.row.get(name).map(|f| &f.value)
    }

    /// Text value of a column in the current row, `None` for null or absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.row.get(name).and_then(|f| f.text.as_deref())
    }

    pub fn field(&self, name: &str) -> Option<&CatalogField> {
        self.row.get(name)
    }

    /// Closes the stream, keeping the prepared statement
    pub fn reset(&mut self) {
        if let Some(name) = self.name.take() {
            self.conn.close_cursor(&name);
            Logger::event(Event::CatalogCursorReset, &[("cursor", name.as_str())]);
        }
        self.exhausted = false;
        self.row.clear();
    }

    /// Releases the stream and the statement
    pub fn free(&mut self) {
        self.reset();
        if let Some(statement) = self.statement.take() {
            self.conn.free_statement(statement);
            let id = statement.0.to_string();
            Logger::event(Event::CatalogCursorFreed, &[("statement", id.as_str())]);
        }
    }
}

impl<C: CatalogConnection> Drop for CatalogCursor<C> {
    fn drop(&mut self) {
        self.free();
    }
}

/// Number of files the table scans
pub fn count_files<C: CatalogConnection + ?Sized>(
    conn: &mut C,
    source: TableSource<'_>,
) -> CatalogResult<u64> {
    match source {
        TableSource::File(_) => Ok(1),
        TableSource::Catalog(catalog) => {
            let query = format!("SELECT COUNT(*) FROM {}", quote_qualified(catalog));
            let n = conn.count(&query)?;
            Ok(n.max(0) as u64)
        }
    }
}

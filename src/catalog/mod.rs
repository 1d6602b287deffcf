//! Catalog query construction and access
//!
//! Planning builds a [`CatalogQuery`] from classified quals and packs it;
//! execution streams the packed query's rows through a [`CatalogCursor`].
//!
//! Filter text uses `$1`, `$2`, ... placeholders in the order of
//! [`CatalogQuery::params`].

mod checksum;
mod cursor;
mod deparse;
mod errors;
mod query;
mod quote;

pub use checksum::query_checksum;
pub use cursor::{
    count_files, CatalogConnection, CatalogCursor, CatalogField, CursorStatus, StatementHandle,
};
pub use deparse::Deparser;
pub use errors::{CatalogError, CatalogErrorCode, CatalogResult, DeparseError, Severity};
pub use query::{CatalogEstimate, CatalogEstimator, CatalogQuery, PackedQuery};
pub use quote::{quote_identifier, quote_literal, quote_qualified};

//! A small columnar table engine: row-oriented CSV tables go in, a
//! self-describing binary `.iyx` column file comes out, and back again.
//!
//! Data streams through fixed-size [`Batch`]es so a table never has to fit
//! in memory: the [`CsvReader`] fills a batch, the [`FormatWriter`] emits it
//! as one row group, and on the way back the [`FormatReader`] hands batches
//! to the [`CsvWriter`].

pub mod batch;
pub mod column;
pub mod csv;
pub mod error;
pub mod format;
pub mod row_group;
pub mod schema;
pub mod types;
pub mod value;

pub use batch::{Batch, BATCH_CAPACITY};
pub use column::{Column, ColumnData};
pub use csv::{load_schema, save_schema, CsvReader, CsvWriter};
pub use error::{Error, Result};
pub use format::{FormatReader, FormatWriter, HEADER_SIZE, MAGIC, MAGIC_SIZE};
pub use row_group::{RowGroup, RowGroupMeta};
pub use schema::{ColumnSchema, Schema};
pub use types::LogicalType;
pub use value::Value;

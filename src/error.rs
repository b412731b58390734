use std::{io, path::PathBuf};

use thiserror::Error;

use crate::types::LogicalType;

pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the crate. Binaries wrap this in `anyhow::Error` at
/// the boundary; the library never swallows or retries, with the single
/// exception of `FormatWriter::end` during drop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not hold well-formed `.iyx` data: bad magic, impossible
    /// offsets, or data ending mid-payload.
    #[error("invalid .iyx data: {0}")]
    Format(String),

    #[error("cannot parse '{raw}' as {ty}")]
    Parse { ty: LogicalType, raw: String },

    #[error("malformed CSV: {0}")]
    Csv(String),

    #[error("unknown type name: '{0}'")]
    UnknownType(String),

    #[error("duplicate column name: '{0}'")]
    DuplicateColumn(String),

    #[error("column name must not be empty")]
    EmptyName,

    #[error("schema contains no columns")]
    EmptySchema,

    #[error("row has wrong number of fields: expected {expected}, got {got}")]
    ColumnCountMismatch { expected: usize, got: usize },

    #[error("index out of range: {index} >= {len}")]
    OutOfRange { index: usize, len: usize },

    /// An operation was invoked in the wrong lifecycle state, e.g. writing a
    /// row group before `begin` or after `end`.
    #[error("{0}")]
    State(&'static str),

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

//! Textual collaborators around the binary format: the CSV record grammar,
//! the batched CSV reader and writer, and the schema text form.

mod line;
mod reader;
mod schema_file;
mod writer;

pub use line::{join_record, split_record};
pub use reader::CsvReader;
pub use schema_file::{load_schema, save_schema};
pub use writer::CsvWriter;

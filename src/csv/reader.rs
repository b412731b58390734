use std::{fs::File, io::BufReader, path::Path};

use crate::{
    batch::{Batch, BATCH_CAPACITY},
    csv::line::{read_record, split_record},
    error::{Error, Result},
    schema::Schema,
};

/// Streams a CSV file into consecutive batches of at most `BATCH_CAPACITY`
/// rows. Empty records are skipped; fields are parsed per the schema's
/// column types.
pub struct CsvReader {
    input: BufReader<File>,
    schema: Schema,
    total_rows_read: u64,
    line_number: usize,
    exhausted: bool,
}

impl CsvReader {
    pub fn new(path: &Path, schema: Schema) -> Result<Self> {
        if schema.is_empty() {
            return Err(Error::EmptySchema);
        }
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        Ok(CsvReader {
            input: BufReader::new(file),
            schema,
            total_rows_read: 0,
            line_number: 0,
            exhausted: false,
        })
    }

    /// Next batch of rows, or `None` once the input is exhausted.
    pub fn read_batch(&mut self) -> Result<Option<Batch>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut batch = Batch::empty_from(&self.schema);
        batch.reserve(BATCH_CAPACITY);

        while !batch.is_full() {
            let Some(record) = read_record(&mut self.input, &mut self.line_number)? else {
                self.exhausted = true;
                break;
            };
            if record.is_empty() {
                continue;
            }
            batch.append_row(split_record(&record)?)?;
            self.total_rows_read += 1;
        }

        if batch.is_empty() {
            return Ok(None);
        }
        Ok(Some(batch))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn total_rows_read(&self) -> u64 {
        self.total_rows_read
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::LogicalType;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.add_column("id", LogicalType::Int32).unwrap();
        schema.add_column("name", LogicalType::String).unwrap();
        schema
    }

    fn write_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_rows_and_skips_empty_lines() {
        let (_dir, path) = write_file("1,Alice\n\n2,Bob\n");
        let mut reader = CsvReader::new(&path, schema()).unwrap();
        let batch = reader.read_batch().unwrap().unwrap();
        assert_eq!(batch.row_count(), 2);
        assert_eq!(reader.total_rows_read(), 2);
        assert!(reader.read_batch().unwrap().is_none());
    }

    #[test]
    fn splits_input_into_capacity_sized_batches() {
        let mut content = String::new();
        for i in 0..BATCH_CAPACITY + 1 {
            content.push_str(&format!("{i},row\n"));
        }
        let (_dir, path) = write_file(&content);
        let mut reader = CsvReader::new(&path, schema()).unwrap();
        assert_eq!(reader.read_batch().unwrap().unwrap().row_count(), BATCH_CAPACITY);
        assert_eq!(reader.read_batch().unwrap().unwrap().row_count(), 1);
        assert!(reader.read_batch().unwrap().is_none());
    }

    #[test]
    fn empty_schema_is_rejected() {
        let (_dir, path) = write_file("");
        assert!(matches!(
            CsvReader::new(&path, Schema::new()),
            Err(Error::EmptySchema)
        ));
    }

    #[test]
    fn bad_field_aborts_the_batch() {
        let (_dir, path) = write_file("1,Alice\nnot-a-number,Bob\n");
        let mut reader = CsvReader::new(&path, schema()).unwrap();
        assert!(matches!(reader.read_batch(), Err(Error::Parse { .. })));
    }
}

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{batch::Batch, csv::line::join_record, error::{Error, Result}};

/// Renders batches back into CSV, one line per row in row order.
pub struct CsvWriter {
    output: BufWriter<File>,
    rows_written: u64,
}

impl CsvWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        Ok(CsvWriter {
            output: BufWriter::new(file),
            rows_written: 0,
        })
    }

    pub fn write_batch(&mut self, batch: &Batch) -> Result<()> {
        let mut fields = Vec::with_capacity(batch.column_count());
        for row in 0..batch.row_count() {
            fields.clear();
            for column in batch.columns() {
                fields.push(column.value_as_string(row)?);
            }
            self.output.write_all(join_record(&fields).as_bytes())?;
            self.output.write_all(b"\n")?;
            self.rows_written += 1;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

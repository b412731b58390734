use std::path::Path;

use log::debug;

use crate::{
    column::{Column, ColumnData},
    error::{Error, Result},
    format::{ByteWriter, HEADER_SIZE, MAGIC, MAGIC_SIZE},
    row_group::{RowGroup, RowGroupMeta},
    schema::Schema,
};

/// Streams row groups into a `.iyx` file.
///
/// The header is emitted first with zeroed counts, then the schema table,
/// then one payload per `write_row_group` call. `end` appends the footer and
/// the magic, and seeks back to patch the header with the final counts and
/// the footer offset. Lifecycle is `begin` → any number of
/// `write_row_group` → `end`; calls outside that order fail. If a begun
/// writer is dropped without `end`, the file is finished best-effort so the
/// groups written so far stay readable.
pub struct FormatWriter {
    writer: ByteWriter,
    schema: Schema,
    metas: Vec<RowGroupMeta>,
    total_row_count: u64,
    begun: bool,
    ended: bool,
}

impl FormatWriter {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(FormatWriter {
            writer: ByteWriter::create(path)?,
            schema: Schema::new(),
            metas: Vec::new(),
            total_row_count: 0,
            begun: false,
            ended: false,
        })
    }

    /// Write the placeholder header and the schema table.
    pub fn begin(&mut self, schema: &Schema) -> Result<()> {
        if self.begun {
            return Err(Error::State("begin called twice"));
        }
        if schema.is_empty() {
            return Err(Error::EmptySchema);
        }
        self.schema = schema.clone();
        self.begun = true;

        self.write_header()?;
        self.write_schema()?;
        Ok(())
    }

    /// Emit the row group's payload at the current position and fill in its
    /// meta (offset, byte size, row count).
    pub fn write_row_group(&mut self, row_group: &mut RowGroup) -> Result<()> {
        if !self.begun {
            return Err(Error::State("write_row_group called before begin"));
        }
        if self.ended {
            return Err(Error::State("write_row_group called after end"));
        }

        let batch = row_group.batch();
        let offset = self.writer.position()?;
        let row_count = batch.row_count() as u32;

        self.writer.write_u32(row_count)?;
        for index in 0..batch.column_count() {
            self.write_column(batch.column(index)?)?;
        }

        let meta = RowGroupMeta {
            offset,
            size: self.writer.position()? - offset,
            row_count,
        };
        debug!(
            "row group {} written: {} rows, {} bytes at offset {}",
            self.metas.len(),
            meta.row_count,
            meta.size,
            meta.offset
        );
        row_group.set_meta(meta);
        self.metas.push(meta);
        self.total_row_count += u64::from(row_count);
        Ok(())
    }

    /// Write the footer and the magic, patch the header, and flush.
    pub fn end(&mut self) -> Result<()> {
        if !self.begun {
            return Err(Error::State("end called before begin"));
        }
        if self.ended {
            return Err(Error::State("end called twice"));
        }

        self.write_footer()?;
        self.writer.write_bytes(&MAGIC)?;
        self.finalize_header()?;
        self.writer.flush()?;
        self.ended = true;
        debug!(
            "file finished: {} row groups, {} rows",
            self.metas.len(),
            self.total_row_count
        );
        Ok(())
    }

    pub fn row_group_count(&self) -> usize {
        self.metas.len()
    }

    pub fn total_rows_written(&self) -> u64 {
        self.total_row_count
    }

    fn write_header(&mut self) -> Result<()> {
        self.writer.write_u32(self.schema.column_count() as u32)?;
        self.writer.write_u32(0)?; // row group count, patched by finalize_header
        self.writer.write_u64(0)?; // total row count, patched by finalize_header
        self.writer.write_u64(HEADER_SIZE as u64)?; // schema offset
        self.writer.write_u64(0)?; // footer offset, patched by finalize_header
        self.writer.write_bytes(&[0u8; 32])?; // reserved
        Ok(())
    }

    fn write_schema(&mut self) -> Result<()> {
        for column in &self.schema {
            self.writer.write_u8(column.ty.tag())?;
            self.writer.write_string(&column.name)?;
        }
        Ok(())
    }

    /// Values of one column, contiguous, in row order. No per-column header,
    /// alignment, or checksum.
    fn write_column(&mut self, column: &Column) -> Result<()> {
        match column.data() {
            ColumnData::Int16(values) => {
                for value in values {
                    self.writer.write_i16(*value)?;
                }
            }
            ColumnData::Int32(values) => {
                for value in values {
                    self.writer.write_i32(*value)?;
                }
            }
            ColumnData::Int64(values) => {
                for value in values {
                    self.writer.write_i64(*value)?;
                }
            }
            ColumnData::Bool(values) => {
                for value in values {
                    self.writer.write_u8(u8::from(*value))?;
                }
            }
            ColumnData::String(values) => {
                for value in values {
                    self.writer.write_string(value)?;
                }
            }
        }
        Ok(())
    }

    /// Meta entries in write order, each serialized field by field into its
    /// packed 20 bytes.
    fn write_footer(&mut self) -> Result<()> {
        for meta in &self.metas {
            self.writer.write_u64(meta.offset)?;
            self.writer.write_u64(meta.size)?;
            self.writer.write_u32(meta.row_count)?;
        }
        Ok(())
    }

    fn finalize_header(&mut self) -> Result<()> {
        let end_position = self.writer.position()?;
        let footer_size = (self.metas.len() * RowGroupMeta::SERIALIZED_SIZE) as u64;
        let footer_offset = end_position - MAGIC_SIZE as u64 - footer_size;

        self.writer.seek(4)?;
        self.writer.write_u32(self.metas.len() as u32)?;
        self.writer.write_u64(self.total_row_count)?;

        self.writer.seek(24)?;
        self.writer.write_u64(footer_offset)?;

        self.writer.seek(end_position)?;
        Ok(())
    }
}

impl Drop for FormatWriter {
    fn drop(&mut self) {
        if self.begun && !self.ended {
            let _ = self.end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogicalType;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.add_column("id", LogicalType::Int32).unwrap();
        schema
    }

    #[test]
    fn operations_outside_lifecycle_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FormatWriter::create(&dir.path().join("state.iyx")).unwrap();

        let mut row_group = RowGroup::new(crate::batch::Batch::empty_from(&schema()));
        assert!(matches!(
            writer.write_row_group(&mut row_group),
            Err(Error::State(_))
        ));
        assert!(matches!(writer.end(), Err(Error::State(_))));

        writer.begin(&schema()).unwrap();
        assert!(matches!(writer.begin(&schema()), Err(Error::State(_))));

        writer.end().unwrap();
        assert!(matches!(
            writer.write_row_group(&mut row_group),
            Err(Error::State(_))
        ));
        assert!(matches!(writer.end(), Err(Error::State(_))));
    }

    #[test]
    fn empty_schema_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FormatWriter::create(&dir.path().join("empty.iyx")).unwrap();
        assert!(matches!(
            writer.begin(&Schema::new()),
            Err(Error::EmptySchema)
        ));
    }

    #[test]
    fn dropping_a_begun_writer_finishes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.iyx");
        {
            let mut writer = FormatWriter::create(&path).unwrap();
            writer.begin(&schema()).unwrap();
            // No end(); drop must append footer and magic.
        }
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[bytes.len() - MAGIC_SIZE..], &MAGIC);
    }
}

use std::path::Path;

use log::debug;

use crate::{
    batch::Batch,
    column::{Column, ColumnData},
    error::{Error, Result},
    format::{ByteReader, HEADER_SIZE, MAGIC, MAGIC_SIZE},
    row_group::{RowGroup, RowGroupMeta},
    schema::Schema,
    types::LogicalType,
};

/// Decodes a `.iyx` file back into batches.
///
/// `open` validates the trailing magic, loads the header, the schema table,
/// and the footer index. After that, `read_batch` streams row groups in
/// write order while `read_row_group` jumps to any group by index.
pub struct FormatReader {
    reader: ByteReader,
    opened: bool,
    total_row_count: u64,
    schema: Schema,
    metas: Vec<RowGroupMeta>,
    next_row_group: usize,
}

impl FormatReader {
    pub fn new(path: &Path) -> Result<Self> {
        Ok(FormatReader {
            reader: ByteReader::open(path)?,
            opened: false,
            total_row_count: 0,
            schema: Schema::new(),
            metas: Vec::new(),
            next_row_group: 0,
        })
    }

    /// Validate the file and load its index. Idempotent.
    pub fn open(&mut self) -> Result<()> {
        if self.opened {
            return Ok(());
        }

        self.validate_magic()?;
        let (column_count, footer_offset) = self.read_header()?;
        self.read_schema(column_count)?;
        self.read_footer(footer_offset)?;

        self.opened = true;
        debug!(
            "opened .iyx file: {} columns, {} row groups, {} rows",
            self.schema.column_count(),
            self.metas.len(),
            self.total_row_count
        );
        Ok(())
    }

    /// Next row group's batch in write order, or `None` when exhausted.
    /// Opens the file first if needed.
    pub fn read_batch(&mut self) -> Result<Option<Batch>> {
        if !self.opened {
            self.open()?;
        }
        if self.next_row_group >= self.metas.len() {
            return Ok(None);
        }
        let index = self.next_row_group;
        self.next_row_group += 1;
        Ok(Some(self.read_row_group(index)?.into_batch()))
    }

    pub fn has_more(&self) -> bool {
        self.next_row_group < self.metas.len()
    }

    /// Decode the row group at `index`, returning its batch together with
    /// its footer meta entry.
    pub fn read_row_group(&mut self, index: usize) -> Result<RowGroup> {
        if !self.opened {
            return Err(Error::State("read_row_group called before open"));
        }
        let meta = *self.metas.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.metas.len(),
        })?;

        self.reader.seek(meta.offset)?;
        let row_count = self.reader.read_u32()?;
        if row_count != meta.row_count {
            return Err(Error::Format(format!(
                "row group {index}: payload row count {row_count} disagrees with footer entry {}",
                meta.row_count
            )));
        }

        let mut columns = Vec::with_capacity(self.schema.column_count());
        for column in &self.schema {
            columns.push(read_column(
                &mut self.reader,
                &column.name,
                column.ty,
                row_count as usize,
            )?);
        }

        let batch = Batch::from_columns(self.schema.clone(), columns);
        Ok(RowGroup::with_meta(batch, meta))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_group_count(&self) -> usize {
        self.metas.len()
    }

    pub fn row_group_meta(&self, index: usize) -> Result<&RowGroupMeta> {
        self.metas.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.metas.len(),
        })
    }

    pub fn total_row_count(&self) -> u64 {
        self.total_row_count
    }

    fn validate_magic(&mut self) -> Result<()> {
        let file_size = self.reader.file_size();
        if file_size <= (MAGIC_SIZE + HEADER_SIZE) as u64 {
            return Err(Error::Format(format!(
                "file too small to hold a header and magic: {file_size} bytes"
            )));
        }

        self.reader.seek(file_size - MAGIC_SIZE as u64)?;
        let mut magic = [0u8; MAGIC_SIZE];
        self.reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(Error::Format(format!("invalid magic bytes: {magic:02x?}")));
        }

        self.reader.seek(0)?;
        Ok(())
    }

    fn read_header(&mut self) -> Result<(u32, u64)> {
        let column_count = self.reader.read_u32()?;
        let _row_group_count = self.reader.read_u32()?;
        self.total_row_count = self.reader.read_u64()?;
        let _schema_offset = self.reader.read_u64()?;
        let footer_offset = self.reader.read_u64()?;

        self.reader.seek(HEADER_SIZE as u64)?;
        Ok((column_count, footer_offset))
    }

    fn read_schema(&mut self, column_count: u32) -> Result<()> {
        for _ in 0..column_count {
            let tag = self.reader.read_u8()?;
            let ty = LogicalType::from_tag(tag)?;
            let name = self.reader.read_string()?;
            self.schema.add_column(name, ty)?;
        }
        Ok(())
    }

    fn read_footer(&mut self, footer_offset: u64) -> Result<()> {
        // The cursor sits right behind the schema table here, which bounds
        // the smallest offset the footer could legally start at.
        let schema_end = self.reader.position()?;
        let footer_end = self.reader.file_size() - MAGIC_SIZE as u64;

        if footer_offset < schema_end || footer_offset > footer_end {
            return Err(Error::Format(format!(
                "footer offset {footer_offset} outside valid range [{schema_end}, {footer_end}]"
            )));
        }
        let footer_bytes = footer_end - footer_offset;
        if footer_bytes % RowGroupMeta::SERIALIZED_SIZE as u64 != 0 {
            return Err(Error::Format(format!(
                "footer region of {footer_bytes} bytes is not a whole number of meta entries"
            )));
        }

        self.reader.seek(footer_offset)?;
        let count = footer_bytes / RowGroupMeta::SERIALIZED_SIZE as u64;
        self.metas.reserve(count as usize);
        for _ in 0..count {
            self.metas.push(RowGroupMeta {
                offset: self.reader.read_u64()?,
                size: self.reader.read_u64()?,
                row_count: self.reader.read_u32()?,
            });
        }
        Ok(())
    }
}

/// One column's values, read contiguously per the type's physical slot.
fn read_column(
    reader: &mut ByteReader,
    name: &str,
    ty: LogicalType,
    row_count: usize,
) -> Result<Column> {
    let data = match ty {
        LogicalType::Int16 => {
            let mut values = Vec::with_capacity(row_count);
            for _ in 0..row_count {
                values.push(reader.read_i16()?);
            }
            ColumnData::Int16(values)
        }
        LogicalType::Int32 | LogicalType::Date => {
            let mut values = Vec::with_capacity(row_count);
            for _ in 0..row_count {
                values.push(reader.read_i32()?);
            }
            ColumnData::Int32(values)
        }
        LogicalType::Int64 | LogicalType::Int128 | LogicalType::Timestamp => {
            let mut values = Vec::with_capacity(row_count);
            for _ in 0..row_count {
                values.push(reader.read_i64()?);
            }
            ColumnData::Int64(values)
        }
        LogicalType::Bool => {
            let mut values = Vec::with_capacity(row_count);
            for _ in 0..row_count {
                values.push(reader.read_u8()? != 0);
            }
            ColumnData::Bool(values)
        }
        LogicalType::String => {
            let mut values = Vec::with_capacity(row_count);
            for _ in 0..row_count {
                values.push(reader.read_string()?);
            }
            ColumnData::String(values)
        }
    };
    Ok(Column::from_parts(name.to_owned(), ty, data))
}

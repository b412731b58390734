use crate::{
    column::Column,
    error::{Error, Result},
    schema::Schema,
    value,
};

/// Maximum number of rows a batch may hold; one batch becomes one row group
/// on disk.
pub const BATCH_CAPACITY: usize = 2048;

/// A bounded in-memory table slice: one schema and one column per schema
/// entry, all columns holding the same number of rows.
#[derive(Debug)]
pub struct Batch {
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Batch {
    /// Empty batch with one empty column per schema entry.
    pub fn empty_from(schema: &Schema) -> Self {
        let columns = schema
            .iter()
            .map(|column| Column::new(column.name.clone(), column.ty))
            .collect();
        Batch {
            schema: schema.clone(),
            columns,
            row_count: 0,
        }
    }

    /// Assemble a batch from decoded columns. Columns must be in schema
    /// order and of equal length.
    pub(crate) fn from_columns(schema: Schema, columns: Vec<Column>) -> Self {
        debug_assert_eq!(schema.column_count(), columns.len());
        debug_assert!(columns.windows(2).all(|pair| pair[0].len() == pair[1].len()));
        let row_count = columns.first().map_or(0, Column::len);
        Batch {
            schema,
            columns,
            row_count,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn is_full(&self) -> bool {
        self.row_count >= BATCH_CAPACITY
    }

    pub fn column(&self, index: usize) -> Result<&Column> {
        self.columns.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.columns.len(),
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.schema
            .find_column(name)
            .map(|index| &self.columns[index])
    }

    /// Parse one row of textual fields into the columns. Returns `false`
    /// without touching anything when the batch is already full. The append
    /// is atomic: arity is checked and every field parsed before any column
    /// is mutated, so a bad field cannot leave columns with unequal lengths.
    pub fn append_row(&mut self, values: Vec<String>) -> Result<bool> {
        if self.is_full() {
            return Ok(false);
        }
        if values.len() != self.columns.len() {
            return Err(Error::ColumnCountMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }

        let mut parsed = Vec::with_capacity(values.len());
        for (column, raw) in self.columns.iter().zip(&values) {
            parsed.push(value::parse_value(raw, column.logical_type())?);
        }
        for (column, value) in self.columns.iter_mut().zip(parsed) {
            column.push_value(value);
        }

        self.row_count += 1;
        Ok(true)
    }

    pub fn reserve(&mut self, additional: usize) {
        for column in &mut self.columns {
            column.reserve(additional);
        }
    }

    pub fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
        self.row_count = 0;
    }

    /// All columns hold the same number of rows.
    pub fn is_valid(&self) -> bool {
        self.columns
            .iter()
            .all(|column| column.len() == self.row_count)
    }
}

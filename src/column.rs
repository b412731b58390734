use crate::{
    error::{Error, Result},
    types::LogicalType,
    value::{self, Value},
};

/// Storage for one column's values. Each logical type maps onto exactly one
/// of these physical slots: `Date` shares `Int32`, `Timestamp` (and the
/// reserved `Int128`) share `Int64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnData {
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

impl ColumnData {
    /// Empty storage for the physical slot of `ty`.
    pub fn new(ty: LogicalType) -> Self {
        match ty {
            LogicalType::Int16 => ColumnData::Int16(Vec::new()),
            LogicalType::Int32 | LogicalType::Date => ColumnData::Int32(Vec::new()),
            LogicalType::Int64 | LogicalType::Int128 | LogicalType::Timestamp => {
                ColumnData::Int64(Vec::new())
            }
            LogicalType::Bool => ColumnData::Bool(Vec::new()),
            LogicalType::String => ColumnData::String(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int16(values) => values.len(),
            ColumnData::Int32(values) => values.len(),
            ColumnData::Int64(values) => values.len(),
            ColumnData::Bool(values) => values.len(),
            ColumnData::String(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            ColumnData::Int16(values) => values.clear(),
            ColumnData::Int32(values) => values.clear(),
            ColumnData::Int64(values) => values.clear(),
            ColumnData::Bool(values) => values.clear(),
            ColumnData::String(values) => values.clear(),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        match self {
            ColumnData::Int16(values) => values.reserve(additional),
            ColumnData::Int32(values) => values.reserve(additional),
            ColumnData::Int64(values) => values.reserve(additional),
            ColumnData::Bool(values) => values.reserve(additional),
            ColumnData::String(values) => values.reserve(additional),
        }
    }

    fn push(&mut self, value: Value) {
        match (self, value) {
            (ColumnData::Int16(values), Value::Int16(v)) => values.push(v),
            (ColumnData::Int32(values), Value::Int32(v)) => values.push(v),
            (ColumnData::Int64(values), Value::Int64(v)) => values.push(v),
            (ColumnData::Bool(values), Value::Bool(v)) => values.push(v),
            (ColumnData::String(values), Value::String(v)) => values.push(v),
            (_, value) => panic!("value {value:?} does not match column storage"),
        }
    }
}

/// A named, typed sequence of values. The active `ColumnData` variant is
/// fixed at construction by the logical type and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    ty: LogicalType,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: LogicalType) -> Self {
        Column {
            name: name.into(),
            ty,
            data: ColumnData::new(ty),
        }
    }

    pub(crate) fn from_parts(name: String, ty: LogicalType, data: ColumnData) -> Self {
        Column { name, ty, data }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical_type(&self) -> LogicalType {
        self.ty
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Parse `raw` per the column's logical type and append it.
    pub fn append_from_string(&mut self, raw: &str) -> Result<()> {
        let value = value::parse_value(raw, self.ty)?;
        self.data.push(value);
        Ok(())
    }

    /// Append an already parsed value. The caller guarantees the value was
    /// parsed for this column's logical type.
    pub(crate) fn push_value(&mut self, value: Value) {
        self.data.push(value);
    }

    /// Render the value at `row` in its textual form: decimal for integers,
    /// `true`/`false` for bool, `YYYY-MM-DD` for dates, and
    /// `YYYY-MM-DD HH:MM:SS` for timestamps.
    pub fn value_as_string(&self, row: usize) -> Result<String> {
        if row >= self.len() {
            return Err(Error::OutOfRange {
                index: row,
                len: self.len(),
            });
        }
        match &self.data {
            ColumnData::Int16(values) => Ok(values[row].to_string()),
            ColumnData::Int32(values) if self.ty == LogicalType::Date => {
                value::format_date(values[row])
            }
            ColumnData::Int32(values) => Ok(values[row].to_string()),
            ColumnData::Int64(values) if self.ty == LogicalType::Timestamp => {
                value::format_timestamp(values[row])
            }
            ColumnData::Int64(values) => Ok(values[row].to_string()),
            ColumnData::Bool(values) => Ok(if values[row] { "true" } else { "false" }.to_owned()),
            ColumnData::String(values) => Ok(values[row].clone()),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

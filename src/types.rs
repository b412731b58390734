use std::fmt;

use crate::error::{Error, Result};

/// The closed set of column types a table may declare. The discriminant is
/// the tag byte stored in the on-disk schema table.
///
/// `Int128` is reserved: schemas may declare it and the column buffer
/// allocates its 64-bit slot, but ingesting a value fails until real 128-bit
/// support lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogicalType {
    Int16 = 0,
    Int32 = 1,
    Int64 = 2,
    Int128 = 3,
    Bool = 4,
    String = 5,
    Date = 6,
    Timestamp = 7,
}

impl LogicalType {
    /// Name used in the textual schema form.
    pub fn name(self) -> &'static str {
        match self {
            LogicalType::Int16 => "int16",
            LogicalType::Int32 => "int32",
            LogicalType::Int64 => "int64",
            LogicalType::Int128 => "int128",
            LogicalType::Bool => "bool",
            LogicalType::String => "string",
            LogicalType::Date => "date",
            LogicalType::Timestamp => "timestamp",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let ty = match name {
            "int16" => LogicalType::Int16,
            "int32" => LogicalType::Int32,
            "int64" => LogicalType::Int64,
            "int128" => LogicalType::Int128,
            "bool" => LogicalType::Bool,
            "string" => LogicalType::String,
            "date" => LogicalType::Date,
            "timestamp" => LogicalType::Timestamp,
            _ => return Err(Error::UnknownType(name.to_owned())),
        };
        Ok(ty)
    }

    /// Tag byte written into the on-disk schema table.
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        let ty = match tag {
            0 => LogicalType::Int16,
            1 => LogicalType::Int32,
            2 => LogicalType::Int64,
            3 => LogicalType::Int128,
            4 => LogicalType::Bool,
            5 => LogicalType::String,
            6 => LogicalType::Date,
            7 => LogicalType::Timestamp,
            _ => return Err(Error::Format(format!("unknown type tag: {tag}"))),
        };
        Ok(ty)
    }

    /// Bytes one value occupies on the wire; 0 for the variable-width
    /// `String`. `Int128` claims 8 bytes while it shares the 64-bit slot.
    pub fn fixed_size(self) -> usize {
        match self {
            LogicalType::Bool => 1,
            LogicalType::Int16 => 2,
            LogicalType::Int32 | LogicalType::Date => 4,
            LogicalType::Int64 | LogicalType::Int128 | LogicalType::Timestamp => 8,
            LogicalType::String => 0,
        }
    }

    pub fn is_fixed_size(self) -> bool {
        !matches!(self, LogicalType::String)
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::LogicalType;

    #[test]
    fn names_round_trip() {
        for ty in [
            LogicalType::Int16,
            LogicalType::Int32,
            LogicalType::Int64,
            LogicalType::Int128,
            LogicalType::Bool,
            LogicalType::String,
            LogicalType::Date,
            LogicalType::Timestamp,
        ] {
            assert_eq!(ty, LogicalType::from_name(ty.name()).unwrap());
            assert_eq!(ty, LogicalType::from_tag(ty.tag()).unwrap());
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(LogicalType::from_name("float64").is_err());
        assert!(LogicalType::from_tag(8).is_err());
    }

    #[test]
    fn date_and_timestamp_share_integer_slots() {
        assert_eq!(LogicalType::Date.fixed_size(), LogicalType::Int32.fixed_size());
        assert_eq!(
            LogicalType::Timestamp.fixed_size(),
            LogicalType::Int64.fixed_size()
        );
    }
}

//! Textual parsing and rendering of single cell values.
//!
//! Numeric and bool input is stripped of surrounding whitespace before
//! parsing; string input is taken verbatim. Dates and timestamps are pinned
//! to UTC so a file carries the same values on every host.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::{
    error::{Error, Result},
    types::LogicalType,
};

/// One parsed cell, tagged by the physical slot it occupies. `Date` values
/// arrive as `Int32` (days since epoch) and `Timestamp` values as `Int64`
/// (seconds since epoch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Bool(bool),
    String(String),
}

/// Parse `raw` according to `ty`. The returned variant is determined by the
/// type's physical slot.
pub fn parse_value(raw: &str, ty: LogicalType) -> Result<Value> {
    let value = match ty {
        LogicalType::Int16 => Value::Int16(parse_int(raw, ty)?),
        LogicalType::Int32 => Value::Int32(parse_int(raw, ty)?),
        LogicalType::Int64 => Value::Int64(parse_int(raw, ty)?),
        LogicalType::Int128 => return Err(Error::NotImplemented("int128 values")),
        LogicalType::Bool => Value::Bool(parse_bool(raw)?),
        LogicalType::String => Value::String(raw.to_owned()),
        LogicalType::Date => Value::Int32(parse_date(raw)?),
        LogicalType::Timestamp => Value::Int64(parse_timestamp(raw)?),
    };
    Ok(value)
}

fn parse_int<T: FromStr>(raw: &str, ty: LogicalType) -> Result<T> {
    raw.trim().parse().map_err(|_| Error::Parse {
        ty,
        raw: raw.to_owned(),
    })
}

fn parse_bool(raw: &str) -> Result<bool> {
    let stripped = raw.trim();
    if stripped.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if stripped.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::Parse {
            ty: LogicalType::Bool,
            raw: raw.to_owned(),
        })
    }
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

/// `YYYY-MM-DD` to days since the Unix epoch.
pub fn parse_date(raw: &str) -> Result<i32> {
    let parse_error = || Error::Parse {
        ty: LogicalType::Date,
        raw: raw.to_owned(),
    };
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| parse_error())?;
    let days = date.signed_duration_since(unix_epoch()).num_days();
    i32::try_from(days).map_err(|_| parse_error())
}

/// Days since the Unix epoch back to `YYYY-MM-DD`.
pub fn format_date(days: i32) -> Result<String> {
    let date = unix_epoch()
        .checked_add_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| Error::Format(format!("date out of range: {days} days since epoch")))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// `YYYY-MM-DD HH:MM:SS` to seconds since the Unix epoch.
pub fn parse_timestamp(raw: &str) -> Result<i64> {
    let datetime =
        NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S").map_err(|_| Error::Parse {
            ty: LogicalType::Timestamp,
            raw: raw.to_owned(),
        })?;
    Ok(datetime.and_utc().timestamp())
}

/// Seconds since the Unix epoch back to `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(seconds: i64) -> Result<String> {
    let datetime = DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| Error::Format(format!("timestamp out of range: {seconds}")))?;
    Ok(datetime.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
}

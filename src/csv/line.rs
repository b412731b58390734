//! The CSV record grammar: comma-delimited fields, double-quote quoting,
//! inner quotes doubled. A quoted field may contain commas, quotes, and
//! newlines; carriage returns outside quotes are discarded so CRLF input is
//! tolerated.

use std::io::BufRead;

use crate::error::{Error, Result};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split one record into its fields. The record may span what used to be
/// several physical lines as long as every newline sits inside quotes.
pub fn split_record(record: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = record.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == QUOTE {
            in_quotes = true;
        } else if c == DELIMITER {
            fields.push(std::mem::take(&mut field));
        } else if c != '\r' {
            field.push(c);
        }
    }

    if in_quotes {
        return Err(Error::Csv("unclosed quote".to_owned()));
    }
    fields.push(field);
    Ok(fields)
}

/// Join fields into one record, quoting exactly the fields that need it.
pub fn join_record<S: AsRef<str>>(fields: &[S]) -> String {
    let mut record = String::new();
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            record.push(DELIMITER);
        }
        push_escaped(&mut record, field.as_ref());
    }
    record
}

fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r')
}

fn push_escaped(record: &mut String, field: &str) {
    if !needs_quoting(field) {
        record.push_str(field);
        return;
    }
    record.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            record.push(QUOTE);
        }
        record.push(c);
    }
    record.push(QUOTE);
}

/// Whether the quotes of a partial record balance out. Used to decide if
/// another physical line belongs to the same record.
fn record_is_complete(record: &str) -> bool {
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
        } else if c == QUOTE {
            in_quotes = true;
        }
    }
    !in_quotes
}

/// Read the next record from `input`, pulling additional physical lines
/// while a quoted field keeps a newline open. Returns `None` at end of
/// input. `line_number` counts physical lines for diagnostics.
pub(crate) fn read_record(
    input: &mut impl BufRead,
    line_number: &mut usize,
) -> Result<Option<String>> {
    let mut record = String::new();
    let mut started = false;

    loop {
        let mut line = String::new();
        let bytes_read = input.read_line(&mut line)?;
        if bytes_read == 0 {
            if !started {
                return Ok(None);
            }
            if !record_is_complete(&record) {
                return Err(Error::Csv(format!(
                    "unclosed quote at end of input (line {line_number})"
                )));
            }
            return Ok(Some(record));
        }

        *line_number += 1;
        started = true;
        if line.ends_with('\n') {
            line.pop();
        }
        record.push_str(&line);

        if record_is_complete(&record) {
            return Ok(Some(record));
        }
        // The open quote swallows the line break.
        record.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields() {
        assert_eq!(split_record("a,b,c").unwrap(), ["a", "b", "c"]);
        assert_eq!(split_record("").unwrap(), [""]);
        assert_eq!(split_record("a,,c").unwrap(), ["a", "", "c"]);
    }

    #[test]
    fn quoted_fields() {
        assert_eq!(split_record("\"a,b\",c").unwrap(), ["a,b", "c"]);
        assert_eq!(split_record("\"he said \"\"hi\"\"\"").unwrap(), ["he said \"hi\""]);
        assert_eq!(split_record("\"line\nbreak\"").unwrap(), ["line\nbreak"]);
    }

    #[test]
    fn carriage_return_outside_quotes_is_dropped() {
        assert_eq!(split_record("a,b\r").unwrap(), ["a", "b"]);
        assert_eq!(split_record("\"kept\rinside\"").unwrap(), ["kept\rinside"]);
    }

    #[test]
    fn unclosed_quote_is_an_error() {
        assert!(split_record("\"dangling").is_err());
    }

    #[test]
    fn join_quotes_only_what_needs_it() {
        assert_eq!(join_record(&["a", "b"]), "a,b");
        assert_eq!(join_record(&["a,b", "c\"d", "e\nf"]), "\"a,b\",\"c\"\"d\",\"e\nf\"");
    }

    #[test]
    fn join_then_split_is_identity() {
        let fields = ["plain", "with,comma", "with\"quote", "with\nnewline", ""];
        let record = join_record(&fields);
        assert_eq!(split_record(&record).unwrap(), fields);
    }

    #[test]
    fn records_spanning_lines_are_reassembled() {
        let mut input = "1,\"multi\nline\"\n2,simple\n".as_bytes();
        let mut line_number = 0;
        assert_eq!(
            read_record(&mut input, &mut line_number).unwrap().unwrap(),
            "1,\"multi\nline\""
        );
        assert_eq!(
            read_record(&mut input, &mut line_number).unwrap().unwrap(),
            "2,simple"
        );
        assert!(read_record(&mut input, &mut line_number).unwrap().is_none());
        assert_eq!(line_number, 3);
    }

    #[test]
    fn last_record_without_trailing_newline() {
        let mut input = "a,b".as_bytes();
        let mut line_number = 0;
        assert_eq!(
            read_record(&mut input, &mut line_number).unwrap().unwrap(),
            "a,b"
        );
        assert!(read_record(&mut input, &mut line_number).unwrap().is_none());
    }
}

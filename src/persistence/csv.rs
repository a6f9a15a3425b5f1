//! Tabular codec for the index file.
//!
//! Layout: one header line `id,v0,v1,...,v{D-1}` followed by one row per
//! entry in insertion order. Rows end with `\n`. Components are written with
//! the shortest decimal text that round-trips the `f64` exactly, always with
//! `.` as the decimal separator. Ids that contain `,`, `"`, `\r` or `\n` are
//! quoted, with inner quotes doubled.
//!
//! On read, `\r\n` line endings and a missing final newline are accepted.

use crate::error::{IndexError, Result};
use crate::table::Entry;
use crate::vector::Vector;
use std::fmt::Write as _;
use std::path::Path;

const ID_COLUMN: &str = "id";

/// Decoded file contents.
#[derive(Debug)]
pub struct DecodedTable {
    pub entries: Vec<Entry>,
    /// Component count declared by the header; `None` for a header-only
    /// `id` line.
    pub dimension: Option<usize>,
}

/// Build the header line (without newline) for the given dimension.
pub fn header(dimension: usize) -> String {
    let mut line = String::from(ID_COLUMN);
    for i in 0..dimension {
        let _ = write!(line, ",v{}", i);
    }
    line
}

/// Serialize entries into the file format.
pub fn encode(entries: &[Entry], dimension: Option<usize>) -> String {
    let mut out = header(dimension.unwrap_or(0));
    out.push('\n');
    for entry in entries {
        write_field(&mut out, &entry.id);
        for x in entry.vector.as_slice() {
            // Display for f64 is shortest round-trip and never uses exponents
            let _ = write!(out, ",{}", x);
        }
        out.push('\n');
    }
    out
}

/// Parse the file format. `path` is only used for error context.
pub fn decode(text: &str, path: &Path) -> Result<DecodedTable> {
    let records = split_records(text).map_err(|(line, reason)| IndexError::corrupt(path, line, reason))?;
    let mut records = records.into_iter();

    let (header_line, header_fields) = records
        .next()
        .ok_or_else(|| IndexError::corrupt(path, 1, "missing header line"))?;
    let dimension = parse_header(&header_fields).map_err(|reason| IndexError::corrupt(path, header_line, reason))?;
    let width = dimension + 1;

    let mut entries = Vec::new();
    for (line, fields) in records {
        if fields.len() != width {
            return Err(IndexError::corrupt(
                path,
                line,
                format!("expected {} columns, found {}", width, fields.len()),
            ));
        }
        let mut fields = fields.into_iter();
        let id = fields.next().unwrap_or_default();
        if id.is_empty() {
            return Err(IndexError::corrupt(path, line, "empty id"));
        }
        if dimension == 0 {
            return Err(IndexError::corrupt(path, line, "header declares no vector columns"));
        }
        let mut data = Vec::with_capacity(dimension);
        for (col, raw) in fields.enumerate() {
            let value: f64 = raw.parse().map_err(|_| {
                IndexError::corrupt(path, line, format!("column v{} is not a number: {:?}", col, raw))
            })?;
            if !value.is_finite() {
                return Err(IndexError::corrupt(
                    path,
                    line,
                    format!("column v{} is not finite: {:?}", col, raw),
                ));
            }
            data.push(value);
        }
        entries.push(Entry::new(id, Vector::new(data)));
    }

    Ok(DecodedTable {
        entries,
        dimension: (dimension > 0).then_some(dimension),
    })
}

fn parse_header(fields: &[String]) -> std::result::Result<usize, String> {
    match fields.first() {
        Some(first) if first == ID_COLUMN => {}
        Some(first) => return Err(format!("first header column must be 'id', found {:?}", first)),
        None => return Err("empty header".to_string()),
    }
    for (i, name) in fields[1..].iter().enumerate() {
        let expected = format!("v{}", i);
        if *name != expected {
            return Err(format!("header column {} must be '{}', found {:?}", i + 1, expected, name));
        }
    }
    Ok(fields.len() - 1)
}

fn write_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Split text into records of fields, tracking the 1-based line each record
/// starts on. Quoted fields may span lines.
fn split_records(text: &str) -> std::result::Result<Vec<(usize, Vec<String>)>, (usize, String)> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut line = 1;
    let mut record_line = 1;
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut at_field_start = true;
    let mut record_started = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
                after_quote = false;
                record_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
                at_field_start = true;
                after_quote = false;
                record_started = false;
            }
            _ if after_quote => {
                return Err((line, "unexpected character after closing quote".to_string()));
            }
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
                record_started = true;
            }
            '"' => return Err((line, "unexpected quote inside unquoted field".to_string())),
            _ => {
                field.push(c);
                at_field_start = false;
                record_started = true;
            }
        }
    }

    if in_quotes {
        return Err((record_line, "unterminated quoted field".to_string()));
    }
    if record_started {
        fields.push(field);
        records.push((record_line, fields));
    }
    Ok(records)
}

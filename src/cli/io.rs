//! JSON I/O handling for CLI
//!
//! - Input: one JSON object, or one per line in batch mode
//! - Output: one JSON object per line
//! - UTF-8 only

use std::io::{BufRead, Read, Write};

use serde_json::{json, Value};

use crate::record::Record;
use crate::schema::SchemaError;

use super::errors::{CliError, CliResult};

/// Read a single JSON request, which may span several lines
pub fn read_request<R: Read>(reader: &mut R) -> CliResult<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Read one JSON request per line, skipping blank lines
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Value>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(CliError::from)),
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Write a success response
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    write_line(writer, &json!({ "status": "ok", "data": data }))
}

/// Write a validated record
pub fn write_record<W: Write>(writer: &mut W, record: &Record) -> CliResult<()> {
    write_line(
        writer,
        &json!({
            "status": "ok",
            "kind": record.kind(),
            "collection": record.collection(),
            "data": record.to_document(),
        }),
    )
}

/// Write a schema error, listing field violations when there are any
pub fn write_rejection<W: Write>(writer: &mut W, error: &SchemaError) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": error.code().code(),
        "message": error.message(),
    });
    if let Some(validation) = error.validation() {
        response["errors"] = serde_json::to_value(validation.violations())?;
    }
    write_line(writer, &response)
}

/// Write an error response
pub fn write_error<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    write_line(
        writer,
        &json!({ "status": "error", "code": code, "message": message }),
    )
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

//! Output handling for the CLI
//!
//! - Output: pretty-printed JSON or plain text, one document per command
//! - UTF-8 only

use std::io::Write;

use serde::Serialize;

use crate::planner::{CompileError, ErrorResponse};

use super::errors::CliResult;

/// Write a value as pretty JSON followed by a newline
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write text verbatim
pub fn write_text<W: Write>(out: &mut W, text: &str) -> CliResult<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Write a compilation error as an error response body
pub fn write_error<W: Write>(out: &mut W, err: &CompileError) -> CliResult<()> {
    write_json(out, &ErrorResponse::from(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_body() {
        let mut out: Vec<u8> = Vec::new();
        let err = CompileError::InvalidSortField {
            path: "height".into(),
            reason: "unknown".into(),
        };
        write_error(&mut out, &err).unwrap();

        let body: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(body["code"], "QUERY_INVALID_SORT_FIELD");
        assert_eq!(body["status"], 400);
    }

    #[test]
    fn test_write_text_adds_newline() {
        let mut out: Vec<u8> = Vec::new();
        write_text(&mut out, "hello").unwrap();
        assert_eq!(out, b"hello\n");
    }
}

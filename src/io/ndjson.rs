//! NDJSON (Newline Delimited JSON) processing utilities.
//!
//! Each non-empty line is one JSON object. Parse failures report the 1-based
//! line number so broken exports can be located quickly.

use super::DatasetError;
use serde::de::DeserializeOwned;
use std::io::{BufRead, BufReader, Read};

/// Parse NDJSON from any reader, skipping blank lines.
pub fn parse_ndjson_reader<T, R>(reader: R) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    R: Read,
{
    let reader = BufReader::new(reader);
    let mut entries = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let entry: T = serde_json::from_str(&line).map_err(|e| DatasetError::JsonParse {
            line: line_number + 1,
            source: e,
        })?;

        entries.push(entry);
    }

    Ok(entries)
}

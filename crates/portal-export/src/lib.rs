//! Parser for files downloaded through the portal's export feature.
//!
//! The backend exports either JSON or CSV. JSON goes through serde_json
//! untouched; CSV goes through a hand-rolled tokenizer because the portal's
//! CSV dialect is loose: either comma or semicolon delimited, optionally
//! BOM-prefixed, with quoted fields and doubled-quote escapes. Values are
//! kept as trimmed strings, never type-coerced, so tests compare exactly
//! what the file said.

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when parsing an exported file.
#[derive(Debug, Error)]
pub enum ExportError {
	/// The file extension maps to no supported export format.
	#[error("Unsupported export format: {0}")]
	UnsupportedExtension(String),
	/// The file content is not valid UTF-8.
	#[error("Export file is not valid UTF-8: {0}")]
	Encoding(String),
	/// A `.json` export did not contain valid JSON.
	#[error("Invalid JSON export: {0}")]
	Json(String),
}

/// A parsed export file.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportedFile {
	/// Records from a CSV export, one map per data row keyed by header.
	Csv(Vec<HashMap<String, String>>),
	/// The parsed document of a JSON export.
	Json(serde_json::Value),
}

/// Parses an exported file's bytes based on its file name extension.
pub fn parse_export(file_name: &str, bytes: &[u8]) -> Result<ExportedFile, ExportError> {
	let extension = file_name
		.rsplit_once('.')
		.map(|(_, ext)| ext.to_ascii_lowercase())
		.unwrap_or_default();
	match extension.as_str() {
		"json" => {
			let text = std::str::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))?;
			let value = serde_json::from_str(text).map_err(|e| ExportError::Json(e.to_string()))?;
			Ok(ExportedFile::Json(value))
		}
		"csv" => {
			let text = std::str::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))?;
			Ok(ExportedFile::Csv(parse_csv(text)))
		}
		other => Err(ExportError::UnsupportedExtension(other.to_string())),
	}
}

/// Parses the portal's CSV dialect into one map per data row.
///
/// Empty or whitespace-only input yields no records.
pub fn parse_csv(text: &str) -> Vec<HashMap<String, String>> {
	let text = text.strip_prefix('\u{feff}').unwrap_or(text);
	if text.trim().is_empty() {
		return Vec::new();
	}

	let delimiter = detect_delimiter(text);
	let mut rows = tokenize(text, delimiter);

	// Exports end with a newline, which scans as one final blank row.
	if rows
		.last()
		.is_some_and(|row| row.iter().all(|field| field.trim().is_empty()))
	{
		rows.pop();
	}
	if rows.is_empty() {
		return Vec::new();
	}

	let headers = header_names(&rows[0]);
	rows.iter()
		.skip(1)
		.filter(|row| !row.iter().all(|field| field.trim().is_empty()))
		.map(|row| {
			headers
				.iter()
				.enumerate()
				.map(|(i, header)| {
					let value = row.get(i).map(|f| f.trim()).unwrap_or_default();
					(header.clone(), value.to_string())
				})
				.collect()
		})
		.collect()
}

/// Picks the delimiter from the header line: semicolon only when it is
/// strictly more frequent than the comma.
fn detect_delimiter(text: &str) -> char {
	let header_line = text.lines().next().unwrap_or_default();
	let commas = header_line.matches(',').count();
	let semicolons = header_line.matches(';').count();
	if semicolons > commas {
		';'
	} else {
		','
	}
}

/// Splits the text into rows of raw fields, honoring quoted fields.
///
/// Inside quotes a doubled quote is a literal quote, and delimiters and
/// newlines are data. `\r` is dropped everywhere.
fn tokenize(text: &str, delimiter: char) -> Vec<Vec<String>> {
	let mut rows = Vec::new();
	let mut fields = Vec::new();
	let mut field = String::new();
	let mut in_quotes = false;

	let mut chars = text.chars().peekable();
	while let Some(c) = chars.next() {
		match c {
			'"' => {
				if in_quotes && chars.peek() == Some(&'"') {
					field.push('"');
					chars.next();
				} else {
					in_quotes = !in_quotes;
				}
			}
			'\r' => {}
			_ if c == delimiter && !in_quotes => {
				fields.push(std::mem::take(&mut field));
			}
			'\n' if !in_quotes => {
				fields.push(std::mem::take(&mut field));
				rows.push(std::mem::take(&mut fields));
			}
			_ => field.push(c),
		}
	}
	if !field.is_empty() || !fields.is_empty() {
		fields.push(field);
		rows.push(fields);
	}
	rows
}

/// Trims header cells, names blank ones positionally, and disambiguates
/// duplicates with a numeric suffix.
fn header_names(raw: &[String]) -> Vec<String> {
	let mut seen: HashMap<String, usize> = HashMap::new();
	raw.iter()
		.enumerate()
		.map(|(i, cell)| {
			let name = cell.trim();
			let name = if name.is_empty() {
				format!("__col_{}", i + 1)
			} else {
				name.to_string()
			};
			let count = seen.entry(name.clone()).or_insert(0);
			*count += 1;
			if *count > 1 {
				format!("{}__{}", name, count)
			} else {
				name
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn csv(bytes: &[u8]) -> Vec<HashMap<String, String>> {
		match parse_export("orders.csv", bytes).unwrap() {
			ExportedFile::Csv(records) => records,
			other => panic!("expected CSV records, got {other:?}"),
		}
	}

	#[test]
	fn test_plain_rows() {
		let records = csv(b"a,b\n1,2\n");
		assert_eq!(records.len(), 1);
		assert_eq!(records[0]["a"], "1");
		assert_eq!(records[0]["b"], "2");
	}

	#[test]
	fn test_quoted_field_keeps_embedded_delimiter() {
		let records = csv(b"name,pair\norder,\"x,y\"\n");
		assert_eq!(records[0]["pair"], "x,y");
	}

	#[test]
	fn test_doubled_quote_is_literal() {
		let records = csv(b"quote\n\"He said \"\"hi\"\"\"\n");
		assert_eq!(records[0]["quote"], r#"He said "hi""#);
	}

	#[test]
	fn test_duplicate_headers_get_suffix() {
		let records = csv(b"Name,Name,Name\na,b,c\n");
		assert_eq!(records[0]["Name"], "a");
		assert_eq!(records[0]["Name__2"], "b");
		assert_eq!(records[0]["Name__3"], "c");
	}

	#[test]
	fn test_blank_header_is_named_by_position() {
		let records = csv(b"a,,c\n1,2,3\n");
		assert_eq!(records[0]["__col_2"], "2");
	}

	#[test]
	fn test_bom_is_stripped() {
		let records = csv("\u{feff}a,b\n1,2\n".as_bytes());
		assert_eq!(records[0]["a"], "1");
	}

	#[test]
	fn test_semicolon_delimiter_detected() {
		let records = csv(b"a;b\n1;2\n");
		assert_eq!(records[0]["b"], "2");
	}

	#[test]
	fn test_comma_wins_ties() {
		// One of each on the header line: comma stays the delimiter.
		let records = csv(b"a,\"b;c\"\n1,2\n");
		assert_eq!(records[0]["b;c"], "2");
	}

	#[test]
	fn test_crlf_and_trailing_blank_row() {
		let records = csv(b"a,b\r\n1,2\r\n\r\n");
		assert_eq!(records.len(), 1);
		assert_eq!(records[0]["b"], "2");
	}

	#[test]
	fn test_values_trimmed_and_missing_cells_empty() {
		let records = csv(b"a,b,c\n 1 ,2\n");
		assert_eq!(records[0]["a"], "1");
		assert_eq!(records[0]["c"], "");
	}

	#[test]
	fn test_empty_input_yields_no_records() {
		assert!(csv(b"").is_empty());
		assert!(csv(b"  \n  \n").is_empty());
	}

	#[test]
	fn test_json_export() {
		let parsed = parse_export("orders.json", br#"{"orders": []}"#).unwrap();
		match parsed {
			ExportedFile::Json(value) => assert!(value["orders"].is_array()),
			other => panic!("expected JSON document, got {other:?}"),
		}
	}

	#[test]
	fn test_unsupported_extension_rejected() {
		let err = parse_export("orders.xlsx", b"").unwrap_err();
		assert!(matches!(err, ExportError::UnsupportedExtension(ext) if ext == "xlsx"));
	}

	#[test]
	fn test_invalid_utf8_rejected() {
		let err = parse_export("orders.csv", &[0xff, 0xfe, 0x00]).unwrap_err();
		assert!(matches!(err, ExportError::Encoding(_)));
	}

	#[test]
	fn test_malformed_json_rejected() {
		let err = parse_export("orders.json", b"{not json").unwrap_err();
		assert!(matches!(err, ExportError::Json(_)));
	}
}

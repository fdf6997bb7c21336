//! Amazon order history CSV
//!
//! Header-named columns, commonly exported with a byte-order mark and quoted
//! headers. Every column is kept verbatim; only the required ones are checked.

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::import::{decode_utf8, single_file};
use crate::models::{field, Fields, ParsedUpload, SourceFile, SourceType};
use crate::normalize::normalize_rows;

/// Columns an Amazon order export must have
pub const REQUIRED_COLUMNS: [&str; 4] = [
    field::ORDER_ID,
    field::ORDER_DATE,
    field::PRODUCT_NAME,
    field::TOTAL_OWED,
];

/// Strip a byte-order mark and surrounding quotes from a header cell
pub fn normalize_header(value: &str) -> String {
    let value = value.strip_prefix('\u{feff}').unwrap_or(value);
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    value.trim().to_string()
}

/// Required columns absent from `headers`, in required order
pub(crate) fn missing_columns(headers: &[String], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|col| !headers.iter().any(|h| h.as_str() == **col))
        .map(|col| col.to_string())
        .collect()
}

/// Read a header-named CSV into field maps keyed by normalized header
///
/// Fails with `MissingColumns` before reading any data row.
pub(crate) fn read_named_rows(text: &str, required: &[&str]) -> Result<(Vec<String>, Vec<Fields>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    let missing = missing_columns(&headers, required);
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let fields: Fields = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(fields);
    }

    Ok((headers, rows))
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.get(0).map_or(true, str::is_empty)
}

/// Parse an Amazon order history export
pub fn parse_amazon_files(files: &[SourceFile]) -> Result<Vec<ParsedUpload>> {
    let file = single_file(files, SourceType::Amazon)?;
    let text = decode_utf8(file)?;
    let (headers, rows) =
        read_named_rows(&text, &REQUIRED_COLUMNS).map_err(|e| e.in_file(&file.name))?;

    let rows = normalize_rows(rows);
    debug!("Parsed {} Amazon orders from {}", rows.len(), file.name);

    Ok(vec![ParsedUpload {
        name: file.name.clone(),
        rows,
        fields: headers,
    }])
}

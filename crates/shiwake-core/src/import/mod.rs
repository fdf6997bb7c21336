//! Source parsers for Amazon order exports and card statements
//!
//! Each source turns raw uploaded files into `TransactionRecord`s sharing the
//! field names in [`crate::models::field`]:
//! - `amazon` - Amazon order history CSV (header-named columns)
//! - `amazon_digital` - Amazon digital orders CSV
//! - `jcb` - MyJCB statement CSV (Shift-JIS, banner/footer around the table)
//! - `orico` - Orico statement CSV (Shift-JIS, Japanese date and yen literals)

pub mod amazon;
pub mod amazon_digital;
pub mod jcb;
pub mod orico;
pub mod statement;

use csv::ReaderBuilder;
use encoding_rs::{SHIFT_JIS, UTF_8};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{ParsedData, ParsedUpload, SourceFile, SourceType};
use crate::normalize::normalize_rows;

pub use amazon::parse_amazon_files;
pub use amazon_digital::parse_amazon_digital_files;
pub use jcb::{parse_jcb_files, parse_jcb_rows};
pub use orico::{parse_orico_files, parse_orico_rows};

/// Signature shared by every source parser
pub type SourceFilesParser = fn(&[SourceFile]) -> Result<Vec<ParsedUpload>>;

impl SourceType {
    /// Parser for this source
    pub fn parser(&self) -> SourceFilesParser {
        match self {
            Self::Amazon => parse_amazon_files,
            Self::AmazonDigital => parse_amazon_digital_files,
            Self::Jcb => parse_jcb_files,
            Self::Orico => parse_orico_files,
        }
    }
}

/// Parse uploaded files with the parser for `source`
pub fn parse_files(source: SourceType, files: &[SourceFile]) -> Result<Vec<ParsedUpload>> {
    if files.is_empty() {
        return Err(Error::Import("No files provided".into()));
    }
    let uploads = (source.parser())(files)?;
    debug!(
        "Parsed {} file(s) as {} into {} record(s)",
        uploads.len(),
        source,
        uploads.iter().map(|u| u.rows.len()).sum::<usize>()
    );
    Ok(uploads)
}

impl ParsedData {
    /// Combine the uploads of one batch
    ///
    /// Multi-file statement uploads are concatenated in upload order.
    pub fn from_uploads(source_type: SourceType, uploads: Vec<ParsedUpload>) -> Self {
        let file_name = uploads
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let header_fields = uploads.first().map(|u| u.fields.clone()).unwrap_or_default();
        let rows = normalize_rows(uploads.into_iter().flat_map(|u| u.rows));
        let fields = match source_type {
            SourceType::Amazon => header_fields,
            _ => rows
                .first()
                .map(|r| r.fields.keys().cloned().collect())
                .unwrap_or_default(),
        };

        Self {
            rows,
            fields,
            file_name,
            source_type,
        }
    }
}

/// Guess the source of a file from its header row
///
/// Returns None if the format is not recognized.
pub fn detect_source_format(bytes: &[u8]) -> Option<SourceType> {
    let text = decode_lossy(bytes);

    for line in text.lines().take(64) {
        let header = amazon::normalize_header(line);

        // Amazon digital: "OrderId,...,OrderDate,...,OurPrice,..."
        if header.contains("OrderId") && header.contains("OurPrice") {
            return Some(SourceType::AmazonDigital);
        }

        // Amazon retail: "Website","Order ID","Order Date",...,"Total Owed",...
        if header.contains("Order ID") && header.contains("Total Owed") {
            return Some(SourceType::Amazon);
        }

        // Card statements share ご利用日/ご利用先など; the amount column tells them apart
        if header.contains(statement::USAGE_DATE) && header.contains(statement::MERCHANT) {
            if header.contains(orico::BILLED_AMOUNT) {
                return Some(SourceType::Orico);
            }
            if header.contains("(￥)") {
                return Some(SourceType::Jcb);
            }
        }
    }

    None
}

/// Decode a UTF-8 export, dropping a leading byte-order mark
pub(crate) fn decode_utf8(file: &SourceFile) -> Result<String> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(&file.bytes);
    if had_errors {
        return Err(Error::Decode {
            file: file.name.clone(),
            encoding: "UTF-8",
        });
    }
    Ok(text.into_owned())
}

/// Decode a card statement
///
/// Statements are exported as Shift-JIS, but a re-saved file may be UTF-8.
/// UTF-8 is accepted only when it already shows the statement header.
pub(crate) fn decode_statement(file: &SourceFile) -> Result<String> {
    let bytes = file
        .bytes
        .strip_prefix(&[0xEF, 0xBB, 0xBF])
        .unwrap_or(&file.bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        if text.contains(statement::USAGE_DATE) {
            return Ok(text.to_string());
        }
    }

    let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(Error::Decode {
            file: file.name.clone(),
            encoding: "Shift_JIS",
        });
    }
    Ok(text.into_owned())
}

/// Best-effort decode used only for format sniffing
fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _) = SHIFT_JIS.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Read delimited text into raw rows, without treating any row as a header
///
/// Blank lines are skipped. Rows may have differing lengths.
pub(crate) fn read_table(text: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(|c| c.is_empty()) && row.len() <= 1 {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Use only the first file of a single-file source
pub(crate) fn single_file(files: &[SourceFile], source: SourceType) -> Result<&SourceFile> {
    let (first, rest) = files
        .split_first()
        .ok_or_else(|| Error::Import("No files provided".into()))?;
    if !rest.is_empty() {
        warn!(
            "{} accepts one file per batch; ignoring {} extra file(s)",
            source,
            rest.len()
        );
    }
    Ok(first)
}

//! Shared extraction for card statement tables (MyJCB, Orico)
//!
//! Statement exports wrap the transaction table in a banner (card name,
//! billing month, ...) and a summary footer. The table starts at the first
//! row containing both `ご利用日` and `ご利用先など`.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::import::{decode_statement, read_table};
use crate::models::{field, Fields, ParsedUpload, SourceFile, TransactionRecord};
use crate::normalize::{new_record_id, normalize_rows};

/// Usage date column
pub const USAGE_DATE: &str = "ご利用日";
/// Merchant column
pub const MERCHANT: &str = "ご利用先など";

/// How one card issuer lays out its statement
pub struct StatementFormat {
    /// Value of the `Website` field
    pub website: &'static str,
    /// Value of the `Payment Instrument Type` field
    pub payment_instrument: &'static str,
    /// Rows whose first cell starts with this are summaries, not purchases
    pub footer_marker: &'static str,
    /// Amount columns in order of preference
    pub amount_columns: &'static [&'static str],
    pub normalize_date: fn(&str) -> String,
    pub normalize_amount: fn(&str) -> String,
}

/// Index of the statement header row, if any
pub fn find_header_row(rows: &[Vec<String>]) -> Option<usize> {
    rows.iter().position(|row| {
        let has = |name: &str| row.iter().any(|cell| cell.trim() == name);
        has(USAGE_DATE) && has(MERCHANT)
    })
}

/// Extract records from raw statement rows
///
/// A missing header row yields no records: banner-only content is common and
/// not an error at this level.
pub fn parse_statement_rows(rows: &[Vec<String>], format: &StatementFormat) -> Vec<TransactionRecord> {
    let Some(header_index) = find_header_row(rows) else {
        warn!("{} statement header row not found", format.website);
        return Vec::new();
    };

    let headers: Vec<&str> = rows[header_index].iter().map(|h| h.trim()).collect();
    let mut records = Vec::new();

    for row in &rows[header_index + 1..] {
        if row.is_empty() {
            continue;
        }
        if row[0].trim_start().starts_with(format.footer_marker) {
            continue;
        }

        let cells: HashMap<&str, &str> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (*h, row.get(i).map(String::as_str).unwrap_or("")))
            .collect();

        let usage_date = (format.normalize_date)(cells.get(USAGE_DATE).copied().unwrap_or(""));
        let merchant = cells.get(MERCHANT).copied().unwrap_or("").trim().to_string();
        let amount = format
            .amount_columns
            .iter()
            .filter_map(|col| cells.get(col))
            .map(|raw| (format.normalize_amount)(raw))
            .find(|a| !a.is_empty())
            .unwrap_or_default();

        if usage_date.is_empty() && merchant.is_empty() && amount.is_empty() {
            continue;
        }

        records.push(TransactionRecord {
            id: new_record_id(),
            fields: statement_fields(format, usage_date, merchant, amount),
        });
    }

    debug!("Parsed {} {} statement rows", records.len(), format.website);
    records
}

fn statement_fields(
    format: &StatementFormat,
    usage_date: String,
    merchant: String,
    amount: String,
) -> Fields {
    let mut fields = Fields::new();
    let mut put = |key: &str, value: String| {
        fields.insert(key.to_string(), value);
    };
    put(field::WEBSITE, format.website.to_string());
    put(field::ORDER_ID, String::new());
    put(field::ORDER_DATE, usage_date.clone());
    put(field::SHIP_DATE, usage_date);
    put(field::PRODUCT_NAME, merchant);
    put(field::QUANTITY, "1".to_string());
    put(field::CURRENCY, "JPY".to_string());
    put(field::TOTAL_OWED, amount.clone());
    put(field::UNIT_PRICE, amount.clone());
    put(field::SUBTOTAL, amount);
    // Statements carry no tax breakdown
    put(field::SUBTOTAL_TAX, String::new());
    put(field::UNIT_PRICE_TAX, String::new());
    put(field::PAYMENT_INSTRUMENT, format.payment_instrument.to_string());
    put(field::ORDER_STATUS, String::new());
    put(field::SHIPMENT_STATUS, String::new());
    fields
}

/// Parse every statement file of a batch, one upload per file
///
/// A file without a statement header row is reported as an error so that a
/// wrong upload is not mistaken for an empty month.
pub fn parse_statement_files(
    files: &[SourceFile],
    format: &StatementFormat,
) -> Result<Vec<ParsedUpload>> {
    let mut uploads = Vec::with_capacity(files.len());

    for file in files {
        let text = decode_statement(file)?;
        let rows = read_table(&text).map_err(|e| e.in_file(&file.name))?;
        if find_header_row(&rows).is_none() {
            return Err(Error::HeaderNotFound {
                file: file.name.clone(),
            });
        }
        let records = normalize_rows(parse_statement_rows(&rows, format));
        uploads.push(ParsedUpload::from_rows(file.name.clone(), records));
    }

    Ok(uploads)
}

/// Trim surrounding whitespace
pub fn trim_cell(value: &str) -> String {
    value.trim().to_string()
}

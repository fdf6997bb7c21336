//! Orico statement CSV
//!
//! Same banner/table/footer shape as MyJCB, but dates are written as
//! `2025年1月2日`, amounts carry a yen sign and thousands separators, and
//! summary rows start with `<`.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::import::statement::{parse_statement_files, parse_statement_rows, StatementFormat};
use crate::models::{ParsedUpload, SourceFile, TransactionRecord};

/// Amount billed this month
pub const BILLED_AMOUNT: &str = "当月ご請求額";
/// Amount of the original purchase
pub const USAGE_AMOUNT: &str = "ご利用金額";

pub const ORICO_FORMAT: StatementFormat = StatementFormat {
    website: "Orico",
    payment_instrument: "Orico",
    footer_marker: "<",
    amount_columns: &[BILLED_AMOUNT, USAGE_AMOUNT],
    normalize_date: normalize_orico_date,
    normalize_amount: normalize_yen_amount,
};

fn orico_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日$").expect("valid regex")
    })
}

/// `2025年1月2日` → `2025/01/02`; anything else is only trimmed
///
/// Only the shape is checked, so `2025年2月30日` becomes `2025/02/30`.
pub fn normalize_orico_date(value: &str) -> String {
    let trimmed = value.trim();
    match orico_date_re().captures(trimmed) {
        Some(caps) => format!("{}/{:0>2}/{:0>2}", &caps[1], &caps[2], &caps[3]),
        None => trimmed.to_string(),
    }
}

/// Strip yen signs (including the Shift-JIS backslash) and thousands separators
pub fn normalize_yen_amount(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\\' | '¥' | '￥' | ','))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extract purchases from already-split Orico rows
pub fn parse_orico_rows(rows: &[Vec<String>]) -> Vec<TransactionRecord> {
    parse_statement_rows(rows, &ORICO_FORMAT)
}

/// Parse one or more Orico statement files
pub fn parse_orico_files(files: &[SourceFile]) -> Result<Vec<ParsedUpload>> {
    parse_statement_files(files, &ORICO_FORMAT)
}

//! MyJCB statement CSV
//!
//! Format: Shift-JIS text, banner rows, then a table with
//! ご利用者,カテゴリ,ご利用日,ご利用先など,ご利用金額(￥),支払区分,...,お支払い金額(￥),...
//! and `【...】` summary rows at the end.

use crate::error::Result;
use crate::import::statement::{parse_statement_files, parse_statement_rows, trim_cell, StatementFormat};
use crate::models::{ParsedUpload, SourceFile, TransactionRecord};

/// Amount actually billed this month
pub const PAYMENT_AMOUNT: &str = "お支払い金額(￥)";
/// Amount of the original purchase
pub const USAGE_AMOUNT: &str = "ご利用金額(￥)";

pub const JCB_FORMAT: StatementFormat = StatementFormat {
    website: "MyJCB",
    payment_instrument: "JCB",
    footer_marker: "【",
    amount_columns: &[PAYMENT_AMOUNT, USAGE_AMOUNT],
    normalize_date: trim_cell,
    normalize_amount: trim_cell,
};

/// Extract purchases from already-split MyJCB rows
pub fn parse_jcb_rows(rows: &[Vec<String>]) -> Vec<TransactionRecord> {
    parse_statement_rows(rows, &JCB_FORMAT)
}

/// Parse one or more MyJCB statement files
pub fn parse_jcb_files(files: &[SourceFile]) -> Result<Vec<ParsedUpload>> {
    parse_statement_files(files, &JCB_FORMAT)
}

//! Search, year partitioning, and selection counting over a record batch
//!
//! All functions are pure: the selection set is owned by the caller and
//! passed in per call.

use std::collections::{BTreeSet, HashSet};

use chrono::Datelike;

use crate::models::{field, TransactionRecord};
use crate::values::safe_date;

/// Year filter value that disables year filtering
pub const ALL_YEARS: &str = "all";

/// Offset between full-width ASCII variants (U+FF01..U+FF5E) and ASCII
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

/// Fold full-width letters, digits, and spaces to half-width, then lowercase
pub fn normalize_search_text(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
                char::from_u32(c as u32 - FULL_WIDTH_OFFSET).unwrap_or(c)
            }
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Calendar year of a record's order date, if it parses
pub fn order_year(record: &TransactionRecord) -> Option<i32> {
    safe_date(record.get(field::ORDER_DATE)).map(|dt| dt.year())
}

/// Count records whose id is selected
///
/// Ids in the selection that are not in `records` (filtered out, or from an
/// older batch) are ignored.
pub fn count_selected(records: &[TransactionRecord], selected: &HashSet<String>) -> usize {
    records.iter().filter(|r| selected.contains(&r.id)).count()
}

/// Distinct order-date years, newest first
pub fn extract_years(records: &[TransactionRecord]) -> Vec<String> {
    let years: BTreeSet<i32> = records.iter().filter_map(order_year).collect();
    years.into_iter().rev().map(|y| y.to_string()).collect()
}

/// Whether any field value contains the (already normalized) query
fn matches_query(record: &TransactionRecord, normalized_query: &str) -> bool {
    normalized_query.is_empty()
        || record
            .fields
            .values()
            .any(|v| normalize_search_text(v).contains(normalized_query))
}

/// Records matching the search query and then the year filter
///
/// An empty query matches everything; `year_filter == "all"` keeps every
/// year. Records with an unparseable order date never match a specific year.
pub fn filter_rows(
    records: &[TransactionRecord],
    year_filter: &str,
    query: &str,
) -> Vec<TransactionRecord> {
    let normalized_query = normalize_search_text(query.trim());
    let year_filter = year_filter.trim();

    records
        .iter()
        .filter(|r| matches_query(r, &normalized_query))
        .filter(|r| {
            year_filter == ALL_YEARS
                || order_year(r).is_some_and(|y| y.to_string() == year_filter)
        })
        .cloned()
        .collect()
}

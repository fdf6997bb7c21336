//! Amazon digital orders CSV (Kindle, video, apps)
//!
//! Column names differ from the retail export (`OrderId`, `OurPrice`, ...),
//! so each row is mapped onto the shared record fields. `OurPriceTax` is the
//! tax-inclusive price; the tax amount is what it adds on top of `OurPrice`.

use tracing::debug;

use crate::error::Result;
use crate::import::amazon::read_named_rows;
use crate::import::{decode_utf8, single_file};
use crate::models::{field, Fields, ParsedUpload, SourceFile, SourceType, TransactionRecord};
use crate::normalize::new_record_id;
use crate::values::{format_floor, parse_number};

/// Columns an Amazon digital export must have
pub const REQUIRED_COLUMNS: [&str; 4] = ["OrderId", "OrderDate", "ProductName", "OurPrice"];

/// Value of a column, or "" when missing
fn col<'a>(row: &'a Fields, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

/// First non-empty value among `keys`, else `default`
fn first_non_empty(row: &Fields, keys: &[&str], default: &str) -> String {
    keys.iter()
        .map(|k| col(row, k))
        .find(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Map one digital-order row onto the shared record fields
pub fn digital_row_to_record(row: &Fields) -> TransactionRecord {
    let total = first_non_empty(row, &["OurPriceTax", "OurPrice"], "");
    let base = col(row, "OurPrice").to_string();
    let total_num = parse_number(&total);
    let base_num = parse_number(&base);
    let tax_num = match (total_num, base_num) {
        (Some(t), Some(b)) => Some((t - b).max(0.0)),
        _ => None,
    };

    let total = total_num.map(format_floor).unwrap_or(total);
    let base = base_num.map(format_floor).unwrap_or(base);
    let tax = tax_num.map(format_floor).unwrap_or_default();

    let mut fields = Fields::new();
    let mut put = |key: &str, value: String| {
        fields.insert(key.to_string(), value);
    };
    put(field::WEBSITE, first_non_empty(row, &["Marketplace"], "Amazon"));
    put(field::ORDER_ID, col(row, "OrderId").to_string());
    put(field::ORDER_DATE, col(row, "OrderDate").to_string());
    put(field::SHIP_DATE, first_non_empty(row, &["FulfilledDate", "OrderDate"], ""));
    put(field::PRODUCT_NAME, col(row, "ProductName").to_string());
    put(
        field::QUANTITY,
        first_non_empty(row, &["QuantityOrdered", "OriginalQuantity"], "1"),
    );
    put(
        field::CURRENCY,
        first_non_empty(row, &["OurPriceCurrencyCode", "BaseCurrencyCode"], "JPY"),
    );
    put(field::TOTAL_OWED, total);
    put(field::UNIT_PRICE, base.clone());
    put(field::SUBTOTAL, base);
    put(field::SUBTOTAL_TAX, tax.clone());
    put(field::UNIT_PRICE_TAX, tax);
    put(field::PAYMENT_INSTRUMENT, "Amazon Digital".to_string());
    put(field::ORDER_STATUS, col(row, "IsFulfilled").to_string());
    put(field::SHIPMENT_STATUS, col(row, "ItemFulfilled").to_string());
    put(field::ASIN, col(row, "ASIN").to_string());

    TransactionRecord {
        id: new_record_id(),
        fields,
    }
}

/// Parse an Amazon digital orders export
pub fn parse_amazon_digital_files(files: &[SourceFile]) -> Result<Vec<ParsedUpload>> {
    let file = single_file(files, SourceType::AmazonDigital)?;
    let text = decode_utf8(file)?;
    let (_, rows) =
        read_named_rows(&text, &REQUIRED_COLUMNS).map_err(|e| e.in_file(&file.name))?;

    let records: Vec<TransactionRecord> = rows.iter().map(digital_row_to_record).collect();
    debug!("Parsed {} Amazon digital orders from {}", records.len(), file.name);

    Ok(vec![ParsedUpload::from_rows(file.name.clone(), records)])
}

//! Consumption-tax category inference

use crate::models::{field, TaxCategory, TransactionRecord};
use crate::values::parse_number;

/// Effective rate at or above which a purchase is treated as 10%
const STANDARD_RATE_THRESHOLD: f64 = 0.095;
/// Effective rate at or above which a purchase is treated as reduced 8%
const REDUCED_RATE_THRESHOLD: f64 = 0.075;

/// Pre-tax and tax amounts of a record, falling back to unit values × quantity
fn base_and_tax(record: &TransactionRecord) -> (Option<f64>, Option<f64>) {
    let quantity = parse_number(record.get(field::QUANTITY)).unwrap_or(1.0);

    let base = parse_number(record.get(field::SUBTOTAL))
        .or_else(|| parse_number(record.get(field::UNIT_PRICE)).map(|p| p * quantity));
    let tax = parse_number(record.get(field::SUBTOTAL_TAX))
        .or_else(|| parse_number(record.get(field::UNIT_PRICE_TAX)).map(|t| t * quantity));

    (base, tax)
}

/// Classify a record by its effective tax rate
///
/// Records without a positive base and a positive tax amount are out of scope.
pub fn infer_tax_category(record: &TransactionRecord) -> TaxCategory {
    let (base, tax) = match base_and_tax(record) {
        (Some(base), Some(tax)) if base > 0.0 && tax > 0.0 => (base, tax),
        _ => return TaxCategory::OutOfScope,
    };

    let rate = tax / base;
    if rate >= STANDARD_RATE_THRESHOLD {
        TaxCategory::Standard10
    } else if rate >= REDUCED_RATE_THRESHOLD {
        TaxCategory::Reduced8
    } else {
        TaxCategory::Taxable
    }
}

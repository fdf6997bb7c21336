//! freee ledger CSV export
//!
//! Every selected record becomes one 21-column expense row. Output text is
//! BOM-free; [`with_bom`] prepares it for delivery.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{field, ExportSettings, RowOverrides, SettlementBase, SourceType, TransactionRecord};
use crate::tax::infer_tax_category;
use crate::values::{format_amount, format_jst_date, normalize_integer_amount, parse_number};

/// Ledger header row, in column order
pub const FREEE_HEADERS: [&str; 21] = [
    "収支区分",
    "管理番号",
    "発生日",
    "決済期日",
    "取引先コード",
    "取引先",
    "勘定科目",
    "税区分",
    "金額",
    "税計算区分",
    "税額",
    "備考",
    "品目",
    "部門",
    "メモタグ（複数指定可、カンマ区切り）",
    "セグメント1",
    "セグメント2",
    "セグメント3",
    "決済日",
    "決済口座",
    "決済金額",
];

/// Default account title for Amazon digital purchases
pub const DIGITAL_ACCOUNT_TITLE: &str = "新聞図書費";

const EXPENSE: &str = "支出";
const TAX_INCLUSIVE: &str = "内税";
const CASH_ACCOUNT: &str = "現金";

pub fn freee_headers() -> Vec<String> {
    FREEE_HEADERS.iter().map(|h| h.to_string()).collect()
}

/// Tax amount cell: the subtotal tax as given, else unit tax × quantity
fn tax_amount(record: &TransactionRecord) -> String {
    let direct = record.get(field::SUBTOTAL_TAX);
    if !direct.is_empty() {
        return direct.to_string();
    }
    match (
        parse_number(record.get(field::UNIT_PRICE_TAX)),
        parse_number(record.get(field::QUANTITY)),
    ) {
        (Some(tax), Some(qty)) => format_amount(tax * qty),
        _ => String::new(),
    }
}

fn account_title(
    record: &TransactionRecord,
    settings: &ExportSettings,
    overrides: &RowOverrides,
) -> String {
    if let Some(title) = overrides.get(&record.id).and_then(|o| o.account_title()) {
        return title.to_string();
    }
    if let Some(title) = settings.account_title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    match settings.source_type {
        SourceType::AmazonDigital => DIGITAL_ACCOUNT_TITLE.to_string(),
        _ => String::new(),
    }
}

/// Tax-category cell: override, else the batch setting, else inferred
pub fn tax_category_for(
    record: &TransactionRecord,
    settings: &ExportSettings,
    overrides: &RowOverrides,
) -> String {
    overrides
        .get(&record.id)
        .and_then(|o| o.tax_category())
        .or_else(|| settings.tax_category.as_deref().map(str::trim).filter(|t| !t.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| infer_tax_category(record).as_str().to_string())
}

/// Build one ledger row; never mutates its inputs
pub fn build_row(
    record: &TransactionRecord,
    settings: &ExportSettings,
    overrides: &RowOverrides,
) -> Vec<String> {
    let date_field = match settings.settlement_base {
        SettlementBase::Ship => field::SHIP_DATE,
        SettlementBase::Order => field::ORDER_DATE,
    };
    let date = format_jst_date(record.get(date_field));
    let amount = normalize_integer_amount(record.get(field::TOTAL_OWED));

    let mut row = vec![String::new(); FREEE_HEADERS.len()];
    row[0] = EXPENSE.to_string();
    row[2] = date.clone();
    row[6] = account_title(record, settings, overrides);
    row[7] = tax_category_for(record, settings, overrides);
    row[8] = amount.clone();
    row[9] = TAX_INCLUSIVE.to_string();
    row[10] = tax_amount(record);
    row[11] = record.get(field::PRODUCT_NAME).to_string();
    row[18] = date;
    row[19] = CASH_ACCOUNT.to_string();
    row[20] = amount;
    row
}

/// Quote a cell if it contains a comma, quote or newline
pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn encode_line<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(escape_csv_field).collect::<Vec<_>>().join(",")
}

/// Join a header and data rows into CSV text without a trailing newline
pub fn encode_csv<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(encode_line(header.iter().map(|h| h.as_ref())));
    for row in rows {
        lines.push(encode_line(row.iter().map(String::as_str)));
    }
    lines.join("\n")
}

/// Ledger CSV for `rows`, header included
pub fn build_ledger_csv(
    rows: &[TransactionRecord],
    settings: &ExportSettings,
    overrides: &RowOverrides,
) -> String {
    let built: Vec<Vec<String>> = rows
        .iter()
        .map(|r| build_row(r, settings, overrides))
        .collect();
    debug!("Built {} ledger rows ({})", built.len(), settings.source_type);
    encode_csv(&FREEE_HEADERS, &built)
}

/// Prefix a UTF-8 byte-order mark
pub fn with_bom(text: &str) -> String {
    format!("\u{feff}{}", text)
}

/// `<prefix>_<YYYYMMDD>.csv`
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", prefix, date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fields, RowOverride};

    fn record(id: &str, pairs: &[(&str, &str)]) -> TransactionRecord {
        let fields: Fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TransactionRecord {
            id: id.to_string(),
            fields,
        }
    }

    fn book() -> TransactionRecord {
        record(
            "r1",
            &[
                (field::ORDER_DATE, "2025-01-10T23:30:00Z"),
                (field::SHIP_DATE, "2025/01/15"),
                (field::PRODUCT_NAME, "Test \"Book\""),
                (field::TOTAL_OWED, "1,999.9"),
                (field::QUANTITY, "2"),
                (field::UNIT_PRICE_TAX, "90"),
                (field::SUBTOTAL, "1818"),
            ],
        )
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("simple"), "simple");
        assert_eq!(escape_csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_field("Test \"Book\""), "\"Test \"\"Book\"\"\"");
        assert_eq!(escape_csv_field("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_build_row_layout() {
        let row = build_row(&book(), &ExportSettings::default(), &RowOverrides::new());
        assert_eq!(row.len(), 21);
        assert_eq!(row[0], "支出");
        assert_eq!(row[2], "2025/01/11");
        assert_eq!(row[6], "");
        assert_eq!(row[8], "1999");
        assert_eq!(row[9], "内税");
        assert_eq!(row[10], "180");
        assert_eq!(row[11], "Test \"Book\"");
        assert_eq!(row[18], "2025/01/11");
        assert_eq!(row[19], "現金");
        assert_eq!(row[20], "1999");
        for i in [1, 3, 4, 5, 12, 13, 14, 15, 16, 17] {
            assert_eq!(row[i], "", "cell {} should be empty", i);
        }
    }

    #[test]
    fn test_ship_settlement_uses_ship_date() {
        let settings = ExportSettings {
            settlement_base: SettlementBase::Ship,
            ..Default::default()
        };
        let row = build_row(&book(), &settings, &RowOverrides::new());
        assert_eq!(row[2], "2025/01/15");
        assert_eq!(row[18], "2025/01/15");
    }

    #[test]
    fn test_tax_amount_prefers_subtotal_tax_verbatim() {
        let r = record("r", &[(field::SUBTOTAL_TAX, "1,000"), (field::UNIT_PRICE_TAX, "5")]);
        assert_eq!(tax_amount(&r), "1,000");

        let r = record("r", &[(field::UNIT_PRICE_TAX, "12.5"), (field::QUANTITY, "3")]);
        assert_eq!(tax_amount(&r), "37.50");

        let r = record("r", &[(field::UNIT_PRICE_TAX, "12")]);
        assert_eq!(tax_amount(&r), "");
    }

    #[test]
    fn test_unparseable_amount_passes_through() {
        let r = record("r", &[(field::TOTAL_OWED, "N/A")]);
        let row = build_row(&r, &ExportSettings::default(), &RowOverrides::new());
        assert_eq!(row[8], "N/A");
        assert_eq!(row[20], "N/A");
        assert_eq!(row[2], "");
    }

    #[test]
    fn test_account_title_precedence() {
        let digital = ExportSettings {
            source_type: SourceType::AmazonDigital,
            ..Default::default()
        };
        let mut overrides = RowOverrides::new();
        assert_eq!(build_row(&book(), &digital, &overrides)[6], "新聞図書費");

        let configured = ExportSettings {
            account_title: Some("消耗品費".to_string()),
            ..digital.clone()
        };
        assert_eq!(build_row(&book(), &configured, &overrides)[6], "消耗品費");

        overrides.insert(
            "r1".to_string(),
            RowOverride {
                account_title: Some(" 雑費 ".to_string()),
                tax_category: None,
            },
        );
        assert_eq!(build_row(&book(), &configured, &overrides)[6], "雑費");

        // A blank override does not hide the default
        overrides.insert(
            "r1".to_string(),
            RowOverride {
                account_title: Some("  ".to_string()),
                tax_category: None,
            },
        );
        assert_eq!(build_row(&book(), &digital, &overrides)[6], "新聞図書費");
    }

    #[test]
    fn test_tax_category_precedence() {
        let mut settings = ExportSettings::default();
        let mut overrides = RowOverrides::new();
        // 180 / 1818 rounds up to the standard rate
        assert_eq!(build_row(&book(), &settings, &overrides)[7], "課対仕入10%");

        settings.tax_category = Some("課対仕入".to_string());
        assert_eq!(build_row(&book(), &settings, &overrides)[7], "課対仕入");

        overrides.insert(
            "r1".to_string(),
            RowOverride {
                account_title: None,
                tax_category: Some("対象外".to_string()),
            },
        );
        assert_eq!(build_row(&book(), &settings, &overrides)[7], "対象外");
    }

    #[test]
    fn test_build_ledger_csv() {
        let csv = build_ledger_csv(&[book()], &ExportSettings::default(), &RowOverrides::new());
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("収支区分,管理番号,発生日"));
        assert!(!lines[0].contains('"'));
        assert!(lines[1].contains(",\"Test \"\"Book\"\"\","));
        assert!(!csv.starts_with('\u{feff}'));
        assert!(with_bom(&csv).starts_with('\u{feff}'));
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_filename("amazon_freee", date), "amazon_freee_20250307.csv");
    }
}

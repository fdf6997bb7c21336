//! Integration tests for shiwake-core
//!
//! These tests exercise the full parse → select → export workflow.

use encoding_rs::SHIFT_JIS;
use shiwake_core::{
    build_ledger_csv, build_row, detect_source_format, filter_rows, models::field, parse_files,
    normalize_rows, ExportSettings, OverrideField, ParsedData, RowOverrides, Session,
    SessionStore, SettlementBase, Settings, SourceFile, SourceType, ALL_YEARS,
};

fn amazon_csv() -> &'static str {
    "\u{feff}\"Website\",\"Order ID\",\"Order Date\",\"Ship Date\",\"Product Name\",\"Quantity\",\"Total Owed\",\"Unit Price\",\"Unit Price Tax\",\"Shipment Item Subtotal\",\"Shipment Item Subtotal Tax\"\n\
\"Amazon.co.jp\",\"250-1\",\"2025-01-10T23:30:00Z\",\"2025-01-11T05:00:00Z\",\"Test \"\"Book\"\"\",\"1\",\"1,999.9\",\"1818\",\"181\",\"1818\",\"181\"\n\
\"Amazon.co.jp\",\"250-2\",\"2024-12-31T16:00:00Z\",\"2025-01-02T00:00:00Z\",\"お米 5kg\",\"2\",\"3,240\",\"1500\",\"120\",\"\",\"\"\n\
\"Amazon.co.jp\",\"250-3\",\"2024-06-01T03:00:00Z\",\"2024-06-02T03:00:00Z\",\"ギフト券\",\"1\",\"5000\",\"5000\",\"0\",\"5000\",\"0\"\n"
}

fn orico_statement() -> Vec<u8> {
    let text = "オリコカード ご利用明細\r\n\
                ご利用日,ご利用先など,ご利用金額,当月ご請求額\r\n\
                2025年1月2日,ＡＭＡＺＯＮ　マーケットプレイス,\"\\1,200\",\"\\1,200\"\r\n\
                2025年1月3日,カフェ,\\450,\r\n\
                <お支払い合計>,,,\"\\1,650\"\r\n";
    let (bytes, _, _) = SHIFT_JIS.encode(text);
    bytes.into_owned()
}

fn load(source: SourceType, files: &[SourceFile]) -> ParsedData {
    let uploads = parse_files(source, files).expect("parse should succeed");
    ParsedData::from_uploads(source, uploads)
}

#[test]
fn test_amazon_workflow() {
    let file = SourceFile::new("orders.csv", amazon_csv());
    assert_eq!(detect_source_format(&file.bytes), Some(SourceType::Amazon));

    let data = load(SourceType::Amazon, &[file]);
    assert_eq!(data.rows.len(), 3);
    assert_eq!(data.fields[1], field::ORDER_ID);

    let mut session = Session::default();
    session.replace_batch(data);
    // 2024-12-31T16:00Z is already 2025 in Japan
    assert_eq!(session.years(), vec!["2025", "2024"]);

    session.set_year("2025").unwrap();
    let visible = session.visible_rows("");
    assert_eq!(visible.len(), 2);
    session.toggle_all(&visible);

    let rice = visible[1].id.clone();
    session.set_override(&rice, OverrideField::AccountTitle, "消耗品費");

    // Per-record inference instead of the batch-wide default
    let inferred = Settings {
        tax_category: None,
        ..Default::default()
    };
    let settings = inferred.export_settings(SourceType::Amazon);
    let csv = build_ledger_csv(&session.selected_rows(), &settings, &session.overrides);
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines.len(), 3);

    let book: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(book[2], "2025/01/11");
    assert_eq!(book[7], "課対仕入10%");
    assert_eq!(book[8], "1999");
    assert_eq!(book[10], "181");
    assert_eq!(book[11], "\"Test \"\"Book\"\"\"");

    // Tax from unit tax × quantity: 240 / 3000 = 8%
    let rice_row: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(rice_row[2], "2025/01/01");
    assert_eq!(rice_row[6], "消耗品費");
    assert_eq!(rice_row[7], "課対仕入8%（軽）");
    assert_eq!(rice_row[8], "3240");
    assert_eq!(rice_row[10], "240");
}

#[test]
fn test_amazon_digital_workflow() {
    let csv = "ASIN,OrderId,OrderDate,ProductName,OurPrice,OurPriceTax\n\
               B0X,D01-1,2025-03-01T10:00:00Z,Kindle本,\"1,000\",\"1,100\"\n";
    let file = SourceFile::new("digital.csv", csv);
    assert_eq!(detect_source_format(&file.bytes), Some(SourceType::AmazonDigital));

    let data = load(SourceType::AmazonDigital, &[file]);
    let settings = Settings::default().export_settings(data.source_type);
    let csv = build_ledger_csv(&data.rows, &settings, &RowOverrides::new());
    let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();

    assert_eq!(row[2], "2025/03/01");
    assert_eq!(row[6], "新聞図書費");
    assert_eq!(row[7], "課対仕入10%");
    assert_eq!(row[8], "1100");
    assert_eq!(row[10], "100");
}

#[test]
fn test_orico_multi_file_workflow() {
    let files = vec![
        SourceFile::new("2025-01.csv", orico_statement()),
        SourceFile::new("2025-02.csv", orico_statement()),
    ];
    assert_eq!(detect_source_format(&files[0].bytes), Some(SourceType::Orico));

    let data = load(SourceType::Orico, &files);
    assert_eq!(data.rows.len(), 4);
    assert_eq!(data.file_name, "2025-01.csv, 2025-02.csv");
    assert_eq!(data.fields[0], field::WEBSITE);

    // Full-width search text matches half-width queries
    let hits = filter_rows(&data.rows, ALL_YEARS, "amazon");
    assert_eq!(hits.len(), 2);

    let settings = Settings {
        settlement_base: SettlementBase::Ship,
        ..Default::default()
    }
    .export_settings(SourceType::Orico);
    let csv = build_ledger_csv(&hits, &settings, &RowOverrides::new());
    let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(row[2], "2025/01/02");
    assert_eq!(row[6], "");
    // Statements carry no tax breakdown; the configured default applies
    assert_eq!(row[7], "課対仕入10%");
    assert_eq!(row[8], "1200");
    assert_eq!(row[10], "");
    assert_eq!(row[19], "現金");
}

#[test]
fn test_statement_rows_infer_when_default_blanked() {
    let data = load(
        SourceType::Orico,
        &[SourceFile::new("2025-01.csv", orico_statement())],
    );
    let blanked = Settings::parse("[export]\ntax_category = \"\"").unwrap();
    let settings = blanked.export_settings(SourceType::Orico);
    let row = build_row(&data.rows[0], &settings, &RowOverrides::new());
    assert_eq!(row[7], "対象外");

    let row = build_row(
        &data.rows[0],
        &ExportSettings::default(),
        &RowOverrides::new(),
    );
    assert_eq!(row[7], "対象外");
}

#[test]
fn test_bad_statement_file_names_the_file() {
    let files = vec![
        SourceFile::new("good.csv", orico_statement()),
        SourceFile::new("notes.csv", "memo,only\n"),
    ];
    let err = parse_files(SourceType::Orico, &files).unwrap_err();
    assert!(err.to_string().contains("notes.csv"));
}

#[test]
fn test_session_survives_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    let mut session = Session::default();
    session.replace_batch(load(
        SourceType::Amazon,
        &[SourceFile::new("orders.csv", amazon_csv())],
    ));
    let first = session.rows()[0].id.clone();
    session.toggle(&first);
    session.set_override(&first, OverrideField::TaxCategory, "対象外");
    store.save(&session).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, session);

    let settings = Settings::default().export_settings(SourceType::Amazon);
    let csv = build_ledger_csv(&loaded.selected_rows(), &settings, &loaded.overrides);
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains(",対象外,"));
}

#[test]
fn test_normalize_is_idempotent_on_parsed_rows() {
    let data = load(
        SourceType::Amazon,
        &[SourceFile::new("orders.csv", amazon_csv())],
    );
    assert_eq!(normalize_rows(data.rows.clone()), data.rows);
}

//! Shiwake Core Library
//!
//! Turns Amazon order exports and Japanese card statements into freee
//! ledger CSV:
//! - Source parsers (Amazon, Amazon digital, MyJCB, Orico) and format detection
//! - Row normalization with stable per-record ids
//! - Search, year filtering, and selection helpers
//! - Consumption-tax category inference
//! - Ledger row building and CSV encoding
//! - Export settings and the account-title catalog
//! - Session persistence for callers

pub mod accounts;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod normalize;
pub mod selection;
pub mod session;
pub mod tax;
pub mod values;

pub use accounts::{AccountCatalog, AccountItem};
pub use config::Settings;
pub use error::{Error, Result};
pub use export::{
    build_ledger_csv, build_row, encode_csv, export_filename, freee_headers, tax_category_for,
    with_bom, FREEE_HEADERS,
};
pub use import::{detect_source_format, parse_files};
pub use models::{
    ExportSettings, Fields, OverrideField, ParsedData, ParsedUpload, RowOverride, RowOverrides,
    SettlementBase, SourceFile, SourceType, TaxCategory, TransactionRecord,
};
pub use normalize::normalize_rows;
pub use selection::{count_selected, extract_years, filter_rows, normalize_search_text, ALL_YEARS};
pub use session::{Session, SessionStore};
pub use tax::infer_tax_category;

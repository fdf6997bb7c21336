//! Data models for shiwake

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Record field names shared by every source parser
pub mod field {
    pub const WEBSITE: &str = "Website";
    pub const ORDER_ID: &str = "Order ID";
    pub const ORDER_DATE: &str = "Order Date";
    pub const SHIP_DATE: &str = "Ship Date";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const QUANTITY: &str = "Quantity";
    pub const CURRENCY: &str = "Currency";
    pub const TOTAL_OWED: &str = "Total Owed";
    pub const UNIT_PRICE: &str = "Unit Price";
    pub const SUBTOTAL: &str = "Shipment Item Subtotal";
    pub const SUBTOTAL_TAX: &str = "Shipment Item Subtotal Tax";
    pub const UNIT_PRICE_TAX: &str = "Unit Price Tax";
    pub const PAYMENT_INSTRUMENT: &str = "Payment Instrument Type";
    pub const ORDER_STATUS: &str = "Order Status";
    pub const SHIPMENT_STATUS: &str = "Shipment Status";
    pub const ASIN: &str = "ASIN";
}

/// Named attributes of one record, in source column order
pub type Fields = IndexMap<String, String>;

/// One normalized transaction
///
/// The `id` is generated once during normalization and never derived from
/// content: two purchases with identical fields are still distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "value")]
    pub fields: Fields,
}

impl TransactionRecord {
    /// Field value, or "" when the source has no such column
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Ledger source a batch was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Amazon,
    AmazonDigital,
    Jcb,
    Orico,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::AmazonDigital => "amazon_digital",
            Self::Jcb => "jcb",
            Self::Orico => "orico",
        }
    }

    pub fn all() -> &'static [SourceType] {
        &[Self::Amazon, Self::AmazonDigital, Self::Jcb, Self::Orico]
    }

    /// Whether the source accepts several files per batch
    pub fn is_multi_file(&self) -> bool {
        matches!(self, Self::Jcb | Self::Orico)
    }
}

impl std::str::FromStr for SourceType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amazon" => Ok(Self::Amazon),
            "amazon_digital" | "amazon-digital" | "digital" => Ok(Self::AmazonDigital),
            "jcb" | "myjcb" => Ok(Self::Jcb),
            "orico" => Ok(Self::Orico),
            _ => Err(crate::error::Error::UnsupportedSource(s.to_string())),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which record date becomes the ledger transaction date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SettlementBase {
    /// Order date (usage date for card statements)
    #[default]
    Order,
    /// Ship date
    Ship,
}

impl SettlementBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Ship => "ship",
        }
    }
}

impl std::str::FromStr for SettlementBase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "order" => Ok(Self::Order),
            "ship" => Ok(Self::Ship),
            _ => Err(format!("Unknown settlement base: {} (expected order or ship)", s)),
        }
    }
}

/// Consumption-tax treatment labels understood by freee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    #[serde(rename = "課対仕入10%")]
    Standard10,
    #[serde(rename = "課対仕入8%（軽）")]
    Reduced8,
    #[serde(rename = "課対仕入")]
    Taxable,
    #[serde(rename = "対象外")]
    OutOfScope,
}

impl TaxCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard10 => "課対仕入10%",
            Self::Reduced8 => "課対仕入8%（軽）",
            Self::Taxable => "課対仕入",
            Self::OutOfScope => "対象外",
        }
    }

    pub fn all() -> &'static [TaxCategory] {
        &[
            Self::Standard10,
            Self::Reduced8,
            Self::Taxable,
            Self::OutOfScope,
        ]
    }
}

impl std::str::FromStr for TaxCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let labels: Vec<&str> = Self::all().iter().map(|c| c.as_str()).collect();
                format!("Unknown tax category: {} (expected one of {})", s, labels.join(", "))
            })
    }
}

impl std::fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sparse user correction for one record
///
/// Either field may be absent; setting one never clears the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_category: Option<String>,
}

impl RowOverride {
    /// Account title if set to something other than whitespace
    pub fn account_title(&self) -> Option<&str> {
        non_blank(self.account_title.as_deref())
    }

    /// Tax category if set to something other than whitespace
    pub fn tax_category(&self) -> Option<&str> {
        non_blank(self.tax_category.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Which override field a caller is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideField {
    AccountTitle,
    TaxCategory,
}

/// Overrides keyed by record id
pub type RowOverrides = HashMap<String, RowOverride>;

/// Global parameters for one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSettings {
    /// Batch-wide tax category; `None` infers one per record
    pub tax_category: Option<String>,
    pub settlement_base: SettlementBase,
    pub source_type: SourceType,
    /// Account title used when no override applies
    pub account_title: Option<String>,
}

/// One raw uploaded file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name
    pub fn read(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Records parsed from one uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedUpload {
    pub name: String,
    pub rows: Vec<TransactionRecord>,
    pub fields: Vec<String>,
}

impl ParsedUpload {
    /// Build an upload whose field list comes from its first record
    pub fn from_rows(name: impl Into<String>, rows: Vec<TransactionRecord>) -> Self {
        let fields = rows
            .first()
            .map(|r| r.fields.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            name: name.into(),
            rows,
            fields,
        }
    }
}

/// A confirmed batch ready for selection and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedData {
    pub rows: Vec<TransactionRecord>,
    pub fields: Vec<String>,
    pub file_name: String,
    #[serde(default)]
    pub source_type: SourceType,
}

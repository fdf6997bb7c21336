//! Row normalization: give every record a stable, unique id

use serde::Deserialize;
use uuid::Uuid;

use crate::models::{Fields, TransactionRecord};

/// A row before normalization: either already identified or a bare field map
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RowInput {
    Record(TransactionRecord),
    Fields(Fields),
}

impl From<TransactionRecord> for RowInput {
    fn from(record: TransactionRecord) -> Self {
        Self::Record(record)
    }
}

impl From<Fields> for RowInput {
    fn from(fields: Fields) -> Self {
        Self::Fields(fields)
    }
}

/// Generate a fresh record id
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Wrap bare field maps with a new id and pass identified records through
///
/// Idempotent: a list of records comes back unchanged. Records whose id is
/// empty are treated as bare and receive one.
pub fn normalize_rows<I, R>(rows: I) -> Vec<TransactionRecord>
where
    I: IntoIterator<Item = R>,
    R: Into<RowInput>,
{
    rows.into_iter()
        .map(|row| match row.into() {
            RowInput::Record(record) if !record.id.is_empty() => record,
            RowInput::Record(record) => TransactionRecord {
                id: new_record_id(),
                fields: record.fields,
            },
            RowInput::Fields(fields) => TransactionRecord {
                id: new_record_id(),
                fields,
            },
        })
        .collect()
}

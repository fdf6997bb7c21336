//! Working session: the confirmed batch plus the user's selection state
//!
//! The core functions never touch storage. [`SessionStore`] is the explicit
//! load/save pair a caller wraps around them; it keeps one JSON document.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{OverrideField, ParsedData, RowOverrides, SourceType, TransactionRecord};
use crate::normalize::{normalize_rows, RowInput};
use crate::selection::{count_selected, extract_years, filter_rows, ALL_YEARS};

fn all_years() -> String {
    ALL_YEARS.to_string()
}

/// Batch, selected ids, year filter, and per-record overrides
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub data: Option<ParsedData>,
    pub selected: HashSet<String>,
    pub selected_year: String,
    pub overrides: RowOverrides,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            data: None,
            selected: HashSet::new(),
            selected_year: all_years(),
            overrides: RowOverrides::new(),
        }
    }
}

impl Session {
    /// Start over with a new batch; selection and overrides are dropped
    pub fn replace_batch(&mut self, data: ParsedData) {
        *self = Self {
            data: Some(data),
            ..Self::default()
        };
    }

    pub fn rows(&self) -> &[TransactionRecord] {
        self.data.as_ref().map(|d| d.rows.as_slice()).unwrap_or(&[])
    }

    pub fn source_type(&self) -> Option<SourceType> {
        self.data.as_ref().map(|d| d.source_type)
    }

    pub fn years(&self) -> Vec<String> {
        extract_years(self.rows())
    }

    /// Switch the year filter; must be "all" or a year present in the batch
    pub fn set_year(&mut self, year: &str) -> Result<()> {
        let year = year.trim();
        if year != ALL_YEARS && !self.years().iter().any(|y| y == year) {
            return Err(Error::InvalidData(format!("No records in year {}", year)));
        }
        self.selected_year = year.to_string();
        Ok(())
    }

    /// Rows passing the current year filter and `query`
    pub fn visible_rows(&self, query: &str) -> Vec<TransactionRecord> {
        filter_rows(self.rows(), &self.selected_year, query)
    }

    /// Flip one id; returns whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Deselect every visible row if all are selected, else select them all
    ///
    /// Rows outside `visible` keep their state.
    pub fn toggle_all(&mut self, visible: &[TransactionRecord]) {
        if visible.is_empty() {
            return;
        }
        if count_selected(visible, &self.selected) == visible.len() {
            for row in visible {
                self.selected.remove(&row.id);
            }
        } else {
            self.selected.extend(visible.iter().map(|row| row.id.clone()));
        }
    }

    /// Selected rows in batch order
    pub fn selected_rows(&self) -> Vec<TransactionRecord> {
        self.rows()
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .cloned()
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        count_selected(self.rows(), &self.selected)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows().iter().any(|r| r.id == id)
    }

    /// Set one override field, leaving the other untouched
    ///
    /// A blank value clears the field; an override with no fields left is removed.
    pub fn set_override(&mut self, id: &str, field: OverrideField, value: &str) {
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        let entry = self.overrides.entry(id.to_string()).or_default();
        match field {
            OverrideField::AccountTitle => entry.account_title = value,
            OverrideField::TaxCategory => entry.tax_category = value,
        }
        if entry.account_title.is_none() && entry.tax_category.is_none() {
            self.overrides.remove(id);
        }
    }

    /// A year no longer present in the batch falls back to "all"
    fn reconcile_year(&mut self) {
        if self.selected_year != ALL_YEARS && !self.years().contains(&self.selected_year) {
            debug!("Year {} no longer in batch; showing all", self.selected_year);
            self.selected_year = all_years();
        }
    }
}

/// Stored form, tolerant of missing keys and rows without ids
///
/// Rows go back through the normalizer on load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default)]
    data: Option<StoredData>,
    #[serde(default)]
    selected: HashSet<String>,
    #[serde(default = "all_years")]
    selected_year: String,
    #[serde(default)]
    overrides: RowOverrides,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredData {
    #[serde(default)]
    rows: Vec<RowInput>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    source_type: SourceType,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        let data = stored.data.map(|d| ParsedData {
            rows: normalize_rows(d.rows),
            fields: d.fields,
            file_name: d.file_name,
            source_type: d.source_type,
        });
        let mut session = Self {
            data,
            selected: stored.selected,
            selected_year: stored.selected_year,
            overrides: stored.overrides,
        };
        session.reconcile_year();
        session
    }
}

/// JSON file holding one [`Session`]
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, if a data dir exists
    pub fn open_default() -> Option<Self> {
        default_session_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session; a missing or unreadable document yields an empty one
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }
        let content = fs::read(&self.path)?;
        match serde_json::from_slice::<StoredSession>(&content) {
            Ok(stored) => Ok(stored.into()),
            Err(e) => {
                warn!(
                    "Ignoring invalid session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Session::default())
            }
        }
    }

    /// Write the session atomically
    pub fn save(&self, session: &Session) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, session)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!(
            "Saved session with {} row(s) to {}",
            session.rows().len(),
            self.path.display()
        );
        Ok(())
    }

    /// Remove the stored session
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!("Removed session {}", self.path.display());
        }
        Ok(())
    }
}

/// Default session location
pub fn default_session_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("shiwake").join("session.json"))
}

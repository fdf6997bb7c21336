//! Export settings
//!
//! ## Configuration Resolution
//!
//! Settings are loaded with a two-layer resolution:
//! 1. An explicit path, else the override file in the config dir
//!    (~/.config/shiwake/settings.toml on Linux)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ExportSettings, SettlementBase, SourceType, TaxCategory};

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/settings.toml");

/// Default prefix of exported file names
pub const DEFAULT_FILENAME_PREFIX: &str = "amazon_freee";

/// Export defaults shared by every run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Batch-wide tax category; `None` infers one per record
    ///
    /// Defaults to 課対仕入10%. A blank `tax_category` in a settings file
    /// switches to inference.
    pub tax_category: Option<TaxCategory>,
    pub settlement_base: SettlementBase,
    /// Account title for rows without an override
    pub account_title: Option<String>,
    pub filename_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tax_category: Some(TaxCategory::Standard10),
            settlement_base: SettlementBase::default(),
            account_title: None,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Load settings, preferring `path`, then the override file, then defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => read_settings(path)?,
            None => match default_settings_path().filter(|p| p.exists()) {
                Some(path) => read_settings(&path)?,
                None => DEFAULT_SETTINGS.to_string(),
            },
        };
        Self::parse(&content)
    }

    /// Parse settings from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawSettings = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))?;

        let mut settings = Self::default();
        let Some(export) = raw.export else {
            return Ok(settings);
        };

        if let Some(base) = export.settlement_base {
            settings.settlement_base = base.parse().map_err(Error::Config)?;
        }
        if let Some(tax) = export.tax_category {
            settings.tax_category = match tax.trim() {
                "" => None,
                tax => Some(tax.parse().map_err(Error::Config)?),
            };
        }
        settings.account_title = export
            .account_title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if let Some(prefix) = export.filename_prefix.filter(|p| !p.trim().is_empty()) {
            settings.filename_prefix = prefix.trim().to_string();
        }

        Ok(settings)
    }

    /// Per-run export settings for a batch of `source_type`
    pub fn export_settings(&self, source_type: SourceType) -> ExportSettings {
        ExportSettings {
            tax_category: self.tax_category.map(|t| t.as_str().to_string()),
            settlement_base: self.settlement_base,
            source_type,
            account_title: self.account_title.clone(),
        }
    }
}

/// Default settings override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shiwake").join("settings.toml"))
}

fn read_settings(path: &Path) -> Result<String> {
    debug!("Reading settings from {}", path.display());
    fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Raw settings structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawSettings {
    export: Option<RawExport>,
}

#[derive(Debug, Deserialize)]
struct RawExport {
    settlement_base: Option<String>,
    tax_category: Option<String>,
    account_title: Option<String>,
    filename_prefix: Option<String>,
}

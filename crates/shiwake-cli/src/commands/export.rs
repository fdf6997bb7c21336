//! Ledger export command

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use shiwake_core::{
    build_ledger_csv, export_filename, with_bom, SessionStore, Settings, SettlementBase,
    TaxCategory,
};

use super::load_session;

/// Write the selected records to `<out>/<prefix>_<YYYYMMDD>.csv`
///
/// Returns the path written.
pub fn cmd_export(
    store: &SessionStore,
    settings: &Settings,
    out: &Path,
    settlement: Option<&str>,
    tax: Option<&str>,
) -> Result<PathBuf> {
    let session = load_session(store)?;
    let rows = session.selected_rows();
    if rows.is_empty() {
        anyhow::bail!("No records selected. Select some with: shiwake select --all");
    }

    let mut export_settings = settings.export_settings(session.source_type().unwrap_or_default());
    if let Some(base) = settlement {
        export_settings.settlement_base = base
            .parse::<SettlementBase>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(tax) = tax {
        let category: TaxCategory = tax.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        export_settings.tax_category = Some(category.to_string());
    }

    let csv = build_ledger_csv(&rows, &export_settings, &session.overrides);

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;
    let path = out.join(export_filename(
        &settings.filename_prefix,
        Local::now().date_naive(),
    ));
    fs::write(&path, with_bom(&csv))
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    println!("✅ Exported {} rows to: {}", rows.len(), path.display());
    println!(
        "   Date basis: {}, tax: {}",
        export_settings.settlement_base.as_str(),
        export_settings
            .tax_category
            .as_deref()
            .unwrap_or("inferred per record")
    );

    Ok(path)
}

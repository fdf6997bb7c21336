//! Import and clear command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use shiwake_core::{
    detect_source_format, parse_files, ParsedData, Session, SessionStore, SourceFile, SourceType,
};
use tracing::warn;

use super::save_session;

pub fn cmd_import(store: &SessionStore, files: &[PathBuf], source: Option<&str>) -> Result<()> {
    if files.is_empty() {
        anyhow::bail!("No files given");
    }

    let sources = files
        .iter()
        .map(|path| {
            SourceFile::read(path)
                .with_context(|| format!("Failed to open file: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    // Determine source format
    let source_type: SourceType = if let Some(source) = source {
        source.parse()?
    } else {
        detect_source_format(&sources[0].bytes).ok_or_else(|| {
            anyhow::anyhow!(
                "Could not auto-detect the format of {}.\n\
                 Specify --source with one of: amazon, amazon_digital, jcb, orico",
                sources[0].name
            )
        })?
    };

    if sources.len() > 1 && !source_type.is_multi_file() {
        warn!(
            "{} imports one file at a time; only {} is used",
            source_type, sources[0].name
        );
    }

    println!("📥 Importing {} file(s) as {}...", sources.len(), source_type);

    let uploads = parse_files(source_type, &sources)?;
    for upload in &uploads {
        println!("   {}: {} records", upload.name, upload.rows.len());
    }

    let data = ParsedData::from_uploads(source_type, uploads);
    let total = data.rows.len();

    let mut session = Session::default();
    session.replace_batch(data);
    let years = session.years();
    save_session(store, &session)?;

    println!("✅ Import complete!");
    println!("   Records: {}", total);
    if !years.is_empty() {
        println!("   Years: {}", years.join(", "));
    }
    if total == 0 {
        println!("   No records found; check that the file is the right export.");
    }

    Ok(())
}

pub fn cmd_clear(store: &SessionStore) -> Result<()> {
    store
        .clear()
        .with_context(|| format!("Failed to remove session: {}", store.path().display()))?;
    println!("🧹 Session cleared");
    Ok(())
}

//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `import` - Import and clear (start or discard a session)
//! - `rows` - Record listing, selection, and overrides
//! - `accounts` - Account-title catalog search
//! - `export` - Ledger CSV export

pub mod accounts;
pub mod export;
pub mod import;
pub mod rows;

// Re-export command functions for main.rs
pub use accounts::*;
pub use export::*;
pub use import::*;
pub use rows::*;

use std::path::Path;

use anyhow::{Context, Result};
use shiwake_core::{Session, SessionStore};

/// Session store at `path`, or at the default location
pub fn open_store(path: Option<&Path>) -> Result<SessionStore> {
    match path {
        Some(path) => Ok(SessionStore::new(path)),
        None => SessionStore::open_default()
            .context("Could not determine a data directory; pass --session PATH"),
    }
}

/// Load the session, failing if nothing has been imported yet
pub fn load_session(store: &SessionStore) -> Result<Session> {
    let session = store
        .load()
        .with_context(|| format!("Failed to read session: {}", store.path().display()))?;
    if session.data.is_none() {
        anyhow::bail!("No records loaded. Import files first with: shiwake import FILE...");
    }
    Ok(session)
}

pub fn save_session(store: &SessionStore, session: &Session) -> Result<()> {
    store
        .save(session)
        .with_context(|| format!("Failed to write session: {}", store.path().display()))
}

/// Resolve a record id from a full id or a unique prefix
pub fn resolve_id(session: &Session, id: &str) -> Result<String> {
    let id = id.trim();
    if session.contains(id) {
        return Ok(id.to_string());
    }
    let matches: Vec<&str> = session
        .rows()
        .iter()
        .map(|r| r.id.as_str())
        .filter(|rid| !id.is_empty() && rid.starts_with(id))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => anyhow::bail!("No record with id {}", id),
        _ => anyhow::bail!("Id prefix {} matches {} records", id, matches.len()),
    }
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Short form of a record id for listings
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

//! Record listing, selection, and override commands

use anyhow::Result;
use shiwake_core::models::field;
use shiwake_core::{
    tax_category_for, AccountCatalog, ExportSettings, OverrideField, Session, SessionStore,
    Settings, TaxCategory, TransactionRecord, ALL_YEARS,
};
use tracing::warn;

use super::{load_session, resolve_id, save_session, short_id, truncate};

/// Apply an optional year filter to the session
fn apply_year(session: &mut Session, year: Option<&str>) -> Result<()> {
    if let Some(year) = year {
        session.set_year(year)?;
    }
    Ok(())
}

fn batch_settings(session: &Session, settings: &Settings) -> ExportSettings {
    settings.export_settings(session.source_type().unwrap_or_default())
}

/// Tax category a record will be exported with
pub fn display_tax(session: &Session, settings: &Settings, record: &TransactionRecord) -> String {
    tax_category_for(record, &batch_settings(session, settings), &session.overrides)
}

/// Footer of a listing capped at `limit` rows
pub fn list_summary(matching: usize, limit: usize, selected: usize, total: usize) -> String {
    format!(
        "{} shown of {} matching, {} selected of {} total",
        matching.min(limit),
        matching,
        selected,
        total
    )
}

pub fn cmd_list(
    store: &SessionStore,
    settings: &Settings,
    year: Option<&str>,
    search: Option<&str>,
    limit: usize,
) -> Result<()> {
    let mut session = load_session(store)?;
    apply_year(&mut session, year)?;
    // Remember the year filter for later select --all
    if year.is_some() {
        save_session(store, &session)?;
    }

    let visible = session.visible_rows(search.unwrap_or(""));
    let years = session.years();

    if let Some(data) = &session.data {
        println!("📄 {} ({})", data.file_name, data.source_type);
    }
    if !years.is_empty() {
        println!("   Years: {} (showing: {})", years.join(", "), session.selected_year);
    }
    println!();

    if visible.is_empty() {
        println!("No records match.");
        return Ok(());
    }

    println!(
        "{:<3} {:<8} {:<10} {:>10} {:<16} Product",
        "", "ID", "Date", "Amount", "Tax"
    );
    println!("{}", "-".repeat(80));
    for record in visible.iter().take(limit) {
        let mark = if session.selected.contains(&record.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let account = session
            .overrides
            .get(&record.id)
            .and_then(|o| o.account_title())
            .map(|a| format!(" ({})", a))
            .unwrap_or_default();
        println!(
            "{:<3} {:<8} {:<10} {:>10} {:<16} {}{}",
            mark,
            short_id(&record.id),
            truncate(record.get(field::ORDER_DATE), 10),
            record.get(field::TOTAL_OWED),
            display_tax(&session, settings, record),
            truncate(record.get(field::PRODUCT_NAME), 40),
            account
        );
    }

    println!();
    if visible.len() > limit {
        println!("   ... and {} more (use --limit)", visible.len() - limit);
    }
    println!(
        "   {}",
        list_summary(visible.len(), limit, session.selected_count(), session.rows().len())
    );

    Ok(())
}

pub fn cmd_select(store: &SessionStore, ids: &[String]) -> Result<()> {
    if ids.is_empty() {
        anyhow::bail!("Give record ids to toggle, or --all");
    }

    let mut session = load_session(store)?;
    for id in ids {
        let id = resolve_id(&session, id)?;
        let selected = session.toggle(&id);
        println!(
            "{} {}",
            if selected { "✓ Selected" } else { "✗ Deselected" },
            short_id(&id)
        );
    }
    save_session(store, &session)?;

    println!("   {} selected", session.selected_count());
    Ok(())
}

pub fn cmd_select_all(store: &SessionStore, year: Option<&str>, search: Option<&str>) -> Result<()> {
    let mut session = load_session(store)?;
    apply_year(&mut session, year)?;

    let visible = session.visible_rows(search.unwrap_or(""));
    session.toggle_all(&visible);
    save_session(store, &session)?;

    let scope = if session.selected_year == ALL_YEARS {
        "all years".to_string()
    } else {
        session.selected_year.clone()
    };
    println!(
        "✓ Toggled {} visible records ({}); {} selected",
        visible.len(),
        scope,
        session.selected_count()
    );
    Ok(())
}

pub fn cmd_override(
    store: &SessionStore,
    id: &str,
    account: Option<&str>,
    tax: Option<&str>,
) -> Result<()> {
    if account.is_none() && tax.is_none() {
        anyhow::bail!("Nothing to set; use --account and/or --tax");
    }

    let mut session = load_session(store)?;
    let id = resolve_id(&session, id)?;

    if let Some(tax) = tax {
        if !tax.trim().is_empty() {
            tax.parse::<TaxCategory>().map_err(|e| anyhow::anyhow!(e))?;
        }
        session.set_override(&id, OverrideField::TaxCategory, tax);
    }

    if let Some(account) = account {
        let catalog = AccountCatalog::load()?;
        if !account.trim().is_empty() && !catalog.contains(account) {
            warn!("{} is not a freee account title", account.trim());
        }
        session.set_override(&id, OverrideField::AccountTitle, account);
    }

    save_session(store, &session)?;

    match session.overrides.get(&id) {
        Some(o) => println!(
            "✏️  {}: account {}, tax {}",
            short_id(&id),
            o.account_title().unwrap_or("(default)"),
            o.tax_category().unwrap_or("(default)")
        ),
        None => println!("✏️  {}: overrides cleared", short_id(&id)),
    }
    Ok(())
}

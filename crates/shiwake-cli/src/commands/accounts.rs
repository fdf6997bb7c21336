//! Account-title catalog command

use anyhow::Result;
use shiwake_core::AccountCatalog;

pub fn cmd_accounts(query: Option<&str>) -> Result<()> {
    let catalog = AccountCatalog::load()?;
    let items = catalog.search(query.unwrap_or(""));

    if items.is_empty() {
        println!("No account titles match.");
        return Ok(());
    }

    let mut current_group = None;
    for item in &items {
        let group = (item.large.as_str(), item.middle.as_str());
        if current_group != Some(group) {
            println!("{} / {}", item.large, item.middle);
            current_group = Some(group);
        }
        println!("   {:<20} {}", item.account, item.small);
    }

    println!();
    println!("{} account titles", items.len());
    Ok(())
}

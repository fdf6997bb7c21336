//! freee account-title catalog
//!
//! Grouped large → middle → items; each item pairs an account title with
//! its small (sub-)category.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Embedded catalog (compiled into binary)
const ACCOUNT_ITEMS: &str = include_str!("../data/account_items.json");

#[derive(Debug, Clone, Deserialize)]
struct LargeGroup {
    large: String,
    middles: Vec<MiddleGroup>,
}

#[derive(Debug, Clone, Deserialize)]
struct MiddleGroup {
    middle: String,
    items: Vec<RawItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    account: String,
    small: String,
}

/// One selectable account title with its grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountItem {
    pub large: String,
    pub middle: String,
    pub small: String,
    pub account: String,
}

/// Flattened account catalog, in catalog order
#[derive(Debug, Clone)]
pub struct AccountCatalog {
    items: Vec<AccountItem>,
}

impl AccountCatalog {
    /// Parse the embedded catalog
    pub fn load() -> Result<Self> {
        Self::from_json(ACCOUNT_ITEMS)
    }

    /// Parse a catalog in the embedded JSON layout
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: Vec<LargeGroup> = serde_json::from_str(json)?;
        let items: Vec<AccountItem> = groups
            .into_iter()
            .flat_map(|large| {
                let large_name = large.large;
                large.middles.into_iter().flat_map(move |middle| {
                    let large_name = large_name.clone();
                    let middle_name = middle.middle;
                    middle.items.into_iter().map(move |item| AccountItem {
                        large: large_name.clone(),
                        middle: middle_name.clone(),
                        small: item.small,
                        account: item.account,
                    })
                })
            })
            .collect();
        debug!("Loaded {} account items", items.len());
        Ok(Self { items })
    }

    pub fn items(&self) -> &[AccountItem] {
        &self.items
    }

    /// Items whose account title or small category contains `query`
    ///
    /// Case-insensitive; an empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&AccountItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| {
                item.small.to_lowercase().contains(&needle)
                    || item.account.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Whether `account` is a catalog title
    pub fn contains(&self, account: &str) -> bool {
        let account = account.trim();
        self.items.iter().any(|item| item.account == account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog() {
        let catalog = AccountCatalog::load().unwrap();
        assert_eq!(catalog.items().len(), 282);
        assert!(catalog.contains("新聞図書費"));
        assert!(catalog.contains(" 消耗品費 "));
        assert!(!catalog.contains("存在しない科目"));
    }

    #[test]
    fn test_items_keep_grouping() {
        let catalog = AccountCatalog::load().unwrap();
        let first = &catalog.items()[0];
        assert_eq!(first.large, "収益");
        assert_eq!(first.middle, "売上高");
        assert_eq!(first.account, "売上高");
    }

    #[test]
    fn test_search() {
        let catalog = AccountCatalog::from_json(
            r#"[{"large":"費用","middles":[{"middle":"販売管理費","items":[
                {"account":"新聞図書費","small":"販売管理費"},
                {"account":"Software","small":"消耗品"}
            ]}]}]"#,
        )
        .unwrap();

        assert_eq!(catalog.search("").len(), 2);
        assert_eq!(catalog.search(" 図書 ").len(), 1);
        assert_eq!(catalog.search("software")[0].account, "Software");
        // Small category matches too
        assert_eq!(catalog.search("消耗")[0].account, "Software");
        assert!(catalog.search("交通").is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(AccountCatalog::from_json("{").is_err());
    }
}

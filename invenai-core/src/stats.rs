use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::{InventoryItem, ItemId};

/// Per-category totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub items: usize,
    pub quantity: u64,
}

/// Aggregate view of an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: usize,
    pub total_quantity: u64,
    /// Keyed by category label; empty categories count as "Uncategorized".
    pub categories: BTreeMap<String, CategoryStats>,
    /// Most recently added item; on equal timestamps the later entry wins.
    pub most_recent: Option<ItemId>,
}

impl InventoryStats {
    pub fn from_items(items: &[InventoryItem]) -> Self {
        let mut stats = InventoryStats {
            total_items: items.len(),
            ..Default::default()
        };
        for item in items {
            stats.total_quantity += u64::from(item.quantity);
            let category = stats
                .categories
                .entry(item.category_label().to_string())
                .or_default();
            category.items += 1;
            category.quantity += u64::from(item.quantity);
        }
        stats.most_recent = items
            .iter()
            .max_by_key(|item| item.date_added)
            .map(|item| item.id.clone());
        stats
    }
}

use crate::core::reference::{coerce_number, map_raw_category, ReferenceMap};
use crate::domain::model::{InventoryItem, InventoryRow, MappedCategory, SkipReason, SkippedItem, Source};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryBuild {
    pub items: Vec<InventoryItem>,
    pub skipped: Vec<SkippedItem>,
}

/// Converts raw rows into servings. Rows whose item or category is unknown are
/// reported in `skipped` and never abort the build.
pub fn build_inventory(rows: &[InventoryRow], reference: &ReferenceMap, source: Source) -> InventoryBuild {
    let mut build = InventoryBuild::default();

    for row in rows {
        let Some(entry) = reference.get(&row.item_name) else {
            build.skipped.push(SkippedItem {
                source,
                item_name: row.item_name.clone(),
                reason: SkipReason::NotInReference,
            });
            continue;
        };

        let category = match map_raw_category(&entry.raw_category) {
            MappedCategory::Known(category) => category,
            MappedCategory::Unrecognized => {
                build.skipped.push(SkippedItem {
                    source,
                    item_name: row.item_name.clone(),
                    reason: SkipReason::UnrecognizedCategory {
                        raw_category: entry.raw_category.clone(),
                    },
                });
                continue;
            }
        };

        let quantity = coerce_number(&row.quantity, 0.0).max(0.0);
        // servings must stay finite, JSON has no infinity
        let servings_available = (quantity * entry.servings_per_unit).min(f64::MAX);
        build.items.push(InventoryItem {
            item_name: row.item_name.clone(),
            category,
            servings_available,
        });
    }

    build
}

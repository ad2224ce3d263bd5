use crate::domain::model::{Category, InventoryItem, Source, UsageRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAllocation {
    pub used: Vec<UsageRecord>,
    pub shortfall: f64,
    pub is_short: bool,
}

/// Takes `needed` servings of `category`, box items first and then main items,
/// each list scanned in order. Consumed servings are subtracted in place.
pub fn allocate_category(
    box_items: &mut [InventoryItem],
    main_items: &mut [InventoryItem],
    category: Category,
    needed: f64,
) -> CategoryAllocation {
    let mut used = Vec::new();
    let mut needed_left = needed;

    consume(box_items, Source::Box, category, &mut needed_left, &mut used);
    if needed_left > 0.0 {
        consume(main_items, Source::Main, category, &mut needed_left, &mut used);
    }

    CategoryAllocation {
        used,
        shortfall: needed_left,
        is_short: needed_left > 0.0,
    }
}

fn consume(
    items: &mut [InventoryItem],
    source: Source,
    category: Category,
    needed_left: &mut f64,
    used: &mut Vec<UsageRecord>,
) {
    for item in items.iter_mut().filter(|item| item.category == category) {
        if *needed_left <= 0.0 {
            break;
        }

        if item.servings_available >= *needed_left {
            used.push(usage(item, *needed_left, source));
            item.servings_available -= *needed_left;
            *needed_left = 0.0;
            break;
        }

        if item.servings_available > 0.0 {
            used.push(usage(item, item.servings_available, source));
            *needed_left -= item.servings_available;
            item.servings_available = 0.0;
        }
    }
}

fn usage(item: &InventoryItem, servings_used: f64, source: Source) -> UsageRecord {
    UsageRecord {
        item_name: item.item_name.clone(),
        category: item.category,
        servings_used,
        source,
    }
}

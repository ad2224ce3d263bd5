use crate::core::allocator::allocate_category;
use crate::domain::model::{CategoryShortfall, InventoryItem, MealRequirement, UsageRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct MealAllocation {
    pub used: Vec<UsageRecord>,
    pub any_short: bool,
    pub shortfalls: Vec<CategoryShortfall>,
}

/// Allocates every category of one meal in requirement order.
///
/// A short category does not stop the remaining ones and nothing is undone
/// here; rolling back a failed day is the day planner's job.
pub fn allocate_meal(
    box_items: &mut [InventoryItem],
    main_items: &mut [InventoryItem],
    requirements: &MealRequirement,
) -> MealAllocation {
    let mut used = Vec::new();
    let mut shortfalls = Vec::new();

    for &(category, needed) in requirements.entries() {
        if needed == 0 {
            continue;
        }
        let allocation = allocate_category(box_items, main_items, category, f64::from(needed));
        used.extend(allocation.used);
        if allocation.is_short {
            shortfalls.push(CategoryShortfall {
                category,
                shortfall: allocation.shortfall,
            });
        }
    }

    MealAllocation {
        used,
        any_short: !shortfalls.is_empty(),
        shortfalls,
    }
}

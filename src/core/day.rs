use crate::core::meal::allocate_meal;
use crate::domain::model::{
    Category, DayPlan, DayShortage, InventoryItem, MealKind, MealResult, Source, UsageSummary,
    SHORTAGE_MESSAGE,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    pub plan: DayPlan,
    pub shortage: Option<DayShortage>,
}

/// Plans breakfast, lunch and dinner for one day.
///
/// If any meal comes up short the remaining meals are not attempted and both
/// lists are put back exactly as they were before the day started.
pub fn plan_day(
    day_number: u32,
    box_items: &mut Vec<InventoryItem>,
    main_items: &mut Vec<InventoryItem>,
) -> DayOutcome {
    let box_snapshot = box_items.clone();
    let main_snapshot = main_items.clone();

    let mut meals = Vec::with_capacity(MealKind::ORDER.len());
    for meal_kind in MealKind::ORDER {
        let requirements = meal_kind.requirements();
        let allocation = allocate_meal(box_items, main_items, &requirements);

        if allocation.any_short {
            *box_items = box_snapshot;
            *main_items = main_snapshot;
            return DayOutcome {
                plan: DayPlan {
                    day_number,
                    meals: Vec::new(),
                    day_box_usage: None,
                    day_main_usage: None,
                    shortage: true,
                },
                shortage: Some(DayShortage {
                    day_number,
                    shortages: vec![SHORTAGE_MESSAGE.to_string()],
                    meal_time: meal_kind,
                    categories: allocation.shortfalls,
                }),
            };
        }

        meals.push(MealResult {
            meal_time: meal_kind,
            meal_plan_requirements: requirements,
            used_items: allocation.used,
        });
    }

    let (day_box_usage, day_main_usage) = summarize_day_usage(&meals);
    DayOutcome {
        plan: DayPlan {
            day_number,
            meals,
            day_box_usage: Some(day_box_usage),
            day_main_usage: Some(day_main_usage),
            shortage: false,
        },
        shortage: None,
    }
}

/// Sums servings per `(item_name, category)` for each source, keeping the order
/// in which items were first used.
pub fn summarize_day_usage(meals: &[MealResult]) -> (Vec<UsageSummary>, Vec<UsageSummary>) {
    let mut box_usage = UsageTally::default();
    let mut main_usage = UsageTally::default();

    for record in meals.iter().flat_map(|meal| &meal.used_items) {
        let tally = match record.source {
            Source::Box => &mut box_usage,
            Source::Main => &mut main_usage,
        };
        tally.add(record.item_name.as_str(), record.category, record.servings_used);
    }

    (box_usage.rows, main_usage.rows)
}

#[derive(Default)]
struct UsageTally {
    rows: Vec<UsageSummary>,
    positions: HashMap<(String, Category), usize>,
}

impl UsageTally {
    fn add(&mut self, item_name: &str, category: Category, servings: f64) {
        let key = (item_name.to_string(), category);
        if let Some(&position) = self.positions.get(&key) {
            self.rows[position].servings_used += servings;
            return;
        }
        self.positions.insert(key, self.rows.len());
        self.rows.push(UsageSummary {
            item_name: item_name.to_string(),
            category,
            servings_used: servings,
        });
    }
}

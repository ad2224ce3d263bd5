use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Standardized nutritional categories of the 5-4-3-2-1 template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FruitVeg,
    Dairy,
    Protein,
    Cereal,
    Oil,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FruitVeg => "fruit_veg",
            Category::Dairy => "dairy",
            Category::Protein => "protein",
            Category::Cereal => "cereal",
            Category::Oil => "oil",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of mapping a raw reference category onto [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedCategory {
    Known(Category),
    Unrecognized,
}

/// Which inventory a serving came from. Box stock is always drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Box,
    Main,
}

/// One of the three rotating senior box datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CycleMonth(u8);

impl CycleMonth {
    pub const ALL: [CycleMonth; 3] = [CycleMonth(1), CycleMonth(2), CycleMonth(3)];

    /// `((month - 1) mod 3) + 1` with a non-negative modulus, so any integer
    /// month maps onto 1..=3.
    pub fn from_month(month: i64) -> Self {
        // month - 1 would overflow at i64::MIN
        let shifted = (month.rem_euclid(3) + 2) % 3;
        CycleMonth(shifted as u8 + 1)
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based position in a list of per-cycle files.
    pub fn index(&self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl std::fmt::Display for CycleMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw reference row as read from the food category table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub item_name: String,
    pub raw_category: String,
    pub servings_per_unit: String,
}

/// Raw `(item_name, quantity)` row from a box or main inventory table.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub item_name: String,
    pub quantity: String,
}

impl InventoryRow {
    pub fn new(item_name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            quantity: quantity.into(),
        }
    }
}

pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Senior box rows for one cycle plus the untouched records echoed in the plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxDataset {
    pub raw_records: Vec<RawRecord>,
    pub rows: Vec<InventoryRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub item_name: String,
    pub category: Category,
    pub servings_available: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub item_name: String,
    pub category: Category,
    pub servings_used: f64,
    #[serde(rename = "from")]
    pub source: Source,
}

/// Servings of one item summed over a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub item_name: String,
    pub category: Category,
    pub servings_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShortfall {
    pub category: Category,
    pub shortfall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealKind {
    pub const ORDER: [MealKind; 3] = [MealKind::Breakfast, MealKind::Lunch, MealKind::Dinner];

    pub fn requirements(&self) -> MealRequirement {
        match self {
            MealKind::Breakfast => BREAKFAST,
            MealKind::Lunch => LUNCH,
            MealKind::Dinner => DINNER,
        }
    }
}

/// Whole servings required per category for one meal, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealRequirement(&'static [(Category, u32)]);

impl MealRequirement {
    pub const fn new(entries: &'static [(Category, u32)]) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &'static [(Category, u32)] {
        self.0
    }
}

impl Serialize for MealRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, needed) in self.0 {
            map.serialize_entry(category.as_str(), needed)?;
        }
        map.end()
    }
}

pub const BREAKFAST: MealRequirement = MealRequirement::new(&[
    (Category::FruitVeg, 1),
    (Category::Cereal, 1),
    (Category::Dairy, 1),
    (Category::Protein, 0),
    (Category::Oil, 0),
]);

pub const LUNCH: MealRequirement = MealRequirement::new(&[
    (Category::FruitVeg, 2),
    (Category::Cereal, 1),
    (Category::Dairy, 0),
    (Category::Protein, 1),
    (Category::Oil, 1),
]);

pub const DINNER: MealRequirement = MealRequirement::new(&[
    (Category::FruitVeg, 2),
    (Category::Cereal, 2),
    (Category::Dairy, 1),
    (Category::Protein, 0),
    (Category::Oil, 2),
]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealResult {
    pub meal_time: MealKind,
    pub meal_plan_requirements: MealRequirement,
    pub used_items: Vec<UsageRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day_number: u32,
    pub meals: Vec<MealResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_box_usage: Option<Vec<UsageSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_main_usage: Option<Vec<UsageSummary>>,
    #[serde(skip_serializing_if = "is_false")]
    pub shortage: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

pub const SHORTAGE_MESSAGE: &str = "Not enough box+main inventory to fulfill 5-4-3-2-1 plan";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayShortage {
    pub day_number: u32,
    pub shortages: Vec<String>,
    pub meal_time: MealKind,
    pub categories: Vec<CategoryShortfall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortageKind {
    MealPlanShortage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortageReport {
    #[serde(rename = "type")]
    pub kind: ShortageKind,
    pub details: Vec<DayShortage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NotInReference,
    UnrecognizedCategory { raw_category: String },
}

/// An inventory row left out of the item lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub source: Source,
    pub item_name: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPlan {
    pub month_requested: i64,
    pub cycle_month: CycleMonth,
    pub senior_box_items_for_month: Vec<RawRecord>,
    pub final_daily_plan: Vec<DayPlan>,
    pub all_shortages: Vec<ShortageReport>,
    pub skipped_items: Vec<SkippedItem>,
}

impl MonthPlan {
    pub fn shortage_days(&self) -> usize {
        self.final_daily_plan.iter().filter(|d| d.shortage).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_month_rotation() {
        assert_eq!(CycleMonth::from_month(1).get(), 1);
        assert_eq!(CycleMonth::from_month(2).get(), 2);
        assert_eq!(CycleMonth::from_month(3).get(), 3);
        assert_eq!(CycleMonth::from_month(4).get(), 1);
        assert_eq!(CycleMonth::from_month(7), CycleMonth::from_month(4));
        assert_eq!(CycleMonth::from_month(12).get(), 3);
    }

    #[test]
    fn test_cycle_month_non_positive() {
        assert_eq!(CycleMonth::from_month(0).get(), 3);
        assert_eq!(CycleMonth::from_month(-1).get(), 2);
        assert_eq!(CycleMonth::from_month(-2).get(), 1);
        assert!((1..=3).contains(&CycleMonth::from_month(i64::MIN).get()));
        assert!((1..=3).contains(&CycleMonth::from_month(i64::MAX).get()));
    }

    #[test]
    fn test_meal_requirements_serialize_in_processing_order() {
        let json = serde_json::to_string(&LUNCH).unwrap();
        assert_eq!(
            json,
            r#"{"fruit_veg":2,"cereal":1,"dairy":0,"protein":1,"oil":1}"#
        );
        assert!(DINNER.entries().contains(&(Category::Oil, 2)));
    }

    #[test]
    fn test_usage_record_wire_names() {
        let record = UsageRecord {
            item_name: "Apple".to_string(),
            category: Category::FruitVeg,
            servings_used: 1.0,
            source: Source::Box,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["from"], "box");
        assert_eq!(value["category"], "fruit_veg");
    }

    #[test]
    fn test_skipped_item_flattens_reason() {
        let skipped = SkippedItem {
            source: Source::Main,
            item_name: "Soap".to_string(),
            reason: SkipReason::UnrecognizedCategory {
                raw_category: "hygiene".to_string(),
            },
        };
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(value["reason"], "unrecognized_category");
        assert_eq!(value["raw_category"], "hygiene");
        assert_eq!(value["source"], "main");
    }
}

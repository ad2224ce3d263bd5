//! Item reference table: name -> (raw category, servings per unit), and the
//! mapping of raw categories onto the standardized set.

use crate::domain::model::{Category, MappedCategory, ReferenceRow};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub raw_category: String,
    pub servings_per_unit: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceMap {
    entries: HashMap<String, ReferenceEntry>,
}

impl ReferenceMap {
    pub fn get(&self, item_name: &str) -> Option<&ReferenceEntry> {
        self.entries.get(&normalize_key(item_name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lookup key for item names: trimmed and lowercased.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parses a numeric cell, falling back when it is blank, malformed or not finite.
pub fn coerce_number(raw: &str, fallback: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => fallback,
    }
}

/// Builds the reference lookup. Later rows overwrite earlier rows with the same name.
pub fn build_reference<I>(rows: I) -> ReferenceMap
where
    I: IntoIterator<Item = ReferenceRow>,
{
    let mut entries = HashMap::new();
    for row in rows {
        let servings_per_unit = coerce_number(&row.servings_per_unit, 1.0).max(0.0);
        entries.insert(
            normalize_key(&row.item_name),
            ReferenceEntry {
                raw_category: normalize_key(&row.raw_category),
                servings_per_unit,
            },
        );
    }
    ReferenceMap { entries }
}

pub fn map_raw_category(raw: &str) -> MappedCategory {
    match normalize_key(raw).as_str() {
        "seasonal & local fruits/vegetables" => MappedCategory::Known(Category::FruitVeg),
        "milk & dairy" => MappedCategory::Known(Category::Dairy),
        "meat/fish/eggs/pulses" => MappedCategory::Known(Category::Protein),
        "grains" => MappedCategory::Known(Category::Cereal),
        "oil" => MappedCategory::Known(Category::Oil),
        _ => MappedCategory::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, category: &str, servings: &str) -> ReferenceRow {
        ReferenceRow {
            item_name: name.to_string(),
            raw_category: category.to_string(),
            servings_per_unit: servings.to_string(),
        }
    }

    #[test]
    fn test_lookup_is_case_and_whitespace_insensitive() {
        let reference = build_reference(vec![row("  Apple ", "Seasonal & Local Fruits/Vegetables", "2")]);

        let entry = reference.get("APPLE").unwrap();
        assert_eq!(entry.raw_category, "seasonal & local fruits/vegetables");
        assert_eq!(entry.servings_per_unit, 2.0);
    }

    #[test]
    fn test_non_numeric_servings_default_to_one() {
        let reference = build_reference(vec![
            row("rice", "grains", "n/a"),
            row("beans", "meat/fish/eggs/pulses", ""),
            row("milk", "milk & dairy", "NaN"),
        ]);

        assert_eq!(reference.get("rice").unwrap().servings_per_unit, 1.0);
        assert_eq!(reference.get("beans").unwrap().servings_per_unit, 1.0);
        assert_eq!(reference.get("milk").unwrap().servings_per_unit, 1.0);
    }

    #[test]
    fn test_negative_servings_clamp_to_zero() {
        let reference = build_reference(vec![row("oil", "oil", "-3")]);
        assert_eq!(reference.get("oil").unwrap().servings_per_unit, 0.0);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let reference = build_reference(vec![
            row("Oats", "grains", "4"),
            row("oats", "grains", "6"),
        ]);

        assert_eq!(reference.len(), 1);
        assert_eq!(reference.get("Oats").unwrap().servings_per_unit, 6.0);
    }

    #[test]
    fn test_category_map() {
        assert_eq!(map_raw_category("milk & dairy"), MappedCategory::Known(Category::Dairy));
        assert_eq!(map_raw_category(" Grains "), MappedCategory::Known(Category::Cereal));
        assert_eq!(map_raw_category("oil"), MappedCategory::Known(Category::Oil));
        assert_eq!(map_raw_category("snacks"), MappedCategory::Unrecognized);
        assert_eq!(map_raw_category(""), MappedCategory::Unrecognized);
    }
}

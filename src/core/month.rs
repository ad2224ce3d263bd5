use crate::core::day::plan_day;
use crate::core::inventory::build_inventory;
use crate::core::reference::build_reference;
use crate::domain::model::{
    BoxDataset, CycleMonth, InventoryRow, MonthPlan, ReferenceRow, ShortageKind, ShortageReport,
    Source,
};
use crate::domain::ports::InventorySource;
use crate::utils::error::Result;

pub const DAYS_PER_PLAN: u32 = 30;

/// Loads fresh data from `source` and plans the month. Any load failure aborts
/// the whole run.
pub fn generate_monthly_plan<S: InventorySource + ?Sized>(source: &S, month: i64) -> Result<MonthPlan> {
    let cycle = CycleMonth::from_month(month);
    let reference = source.load_reference()?;
    let box_dataset = source.load_box_inventory(cycle)?;
    let main_rows = source.load_main_inventory()?;

    Ok(plan_month(month, reference, box_dataset, &main_rows))
}

/// Plans 30 days over already-loaded rows. The item lists built here are owned
/// by this call alone; a shortage day leaves them as the previous day left them.
pub fn plan_month(
    month: i64,
    reference_rows: Vec<ReferenceRow>,
    box_dataset: BoxDataset,
    main_rows: &[InventoryRow],
) -> MonthPlan {
    let cycle_month = CycleMonth::from_month(month);
    let reference = build_reference(reference_rows);

    let box_build = build_inventory(&box_dataset.rows, &reference, Source::Box);
    let main_build = build_inventory(main_rows, &reference, Source::Main);
    let mut box_items = box_build.items;
    let mut main_items = main_build.items;

    let mut skipped_items = box_build.skipped;
    skipped_items.extend(main_build.skipped);

    let mut final_daily_plan = Vec::with_capacity(DAYS_PER_PLAN as usize);
    let mut day_shortages = Vec::new();
    for day_number in 1..=DAYS_PER_PLAN {
        let outcome = plan_day(day_number, &mut box_items, &mut main_items);
        if let Some(shortage) = outcome.shortage {
            day_shortages.push(shortage);
        }
        final_daily_plan.push(outcome.plan);
    }

    let mut all_shortages = Vec::new();
    if !day_shortages.is_empty() {
        all_shortages.push(ShortageReport {
            kind: ShortageKind::MealPlanShortage,
            details: day_shortages,
        });
    }

    MonthPlan {
        month_requested: month,
        cycle_month,
        senior_box_items_for_month: box_dataset.raw_records,
        final_daily_plan,
        all_shortages,
        skipped_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, MealKind, SkipReason};
    use crate::utils::error::PlannerError;
    use std::cell::RefCell;

    fn reference_row(name: &str, category: &str, servings: &str) -> ReferenceRow {
        ReferenceRow {
            item_name: name.to_string(),
            raw_category: category.to_string(),
            servings_per_unit: servings.to_string(),
        }
    }

    fn reference_rows() -> Vec<ReferenceRow> {
        vec![
            reference_row("apple", "seasonal & local fruits/vegetables", "2"),
            reference_row("rice", "grains", "4"),
            reference_row("milk", "milk & dairy", "2"),
            reference_row("lentils", "meat/fish/eggs/pulses", "1"),
            reference_row("olive oil", "oil", "3"),
        ]
    }

    struct FakeSource {
        box_rows: Vec<InventoryRow>,
        main_rows: Vec<InventoryRow>,
        requested_cycles: RefCell<Vec<u8>>,
    }

    impl FakeSource {
        fn new(box_rows: Vec<InventoryRow>, main_rows: Vec<InventoryRow>) -> Self {
            Self {
                box_rows,
                main_rows,
                requested_cycles: RefCell::new(Vec::new()),
            }
        }
    }

    impl InventorySource for FakeSource {
        fn load_reference(&self) -> Result<Vec<ReferenceRow>> {
            Ok(reference_rows())
        }

        fn load_box_inventory(&self, cycle: CycleMonth) -> Result<BoxDataset> {
            self.requested_cycles.borrow_mut().push(cycle.get());
            Ok(BoxDataset {
                raw_records: Vec::new(),
                rows: self.box_rows.clone(),
            })
        }

        fn load_main_inventory(&self) -> Result<Vec<InventoryRow>> {
            Ok(self.main_rows.clone())
        }
    }

    struct BrokenSource;

    impl InventorySource for BrokenSource {
        fn load_reference(&self) -> Result<Vec<ReferenceRow>> {
            Err(PlannerError::configuration("Column 'servings_per_unit' missing"))
        }

        fn load_box_inventory(&self, _cycle: CycleMonth) -> Result<BoxDataset> {
            unreachable!("reference failure aborts first")
        }

        fn load_main_inventory(&self) -> Result<Vec<InventoryRow>> {
            unreachable!("reference failure aborts first")
        }
    }

    #[test]
    fn test_ample_stock_fills_every_day() {
        // one day needs 5 fv, 4 cereal, 2 dairy, 1 protein, 3 oil servings
        let source = FakeSource::new(
            vec![InventoryRow::new("Apple", "100")],
            vec![
                InventoryRow::new("Rice", "100"),
                InventoryRow::new("Milk", "100"),
                InventoryRow::new("Lentils", "100"),
                InventoryRow::new("Olive Oil", "100"),
            ],
        );

        let plan = generate_monthly_plan(&source, 1).unwrap();

        assert_eq!(plan.final_daily_plan.len(), 30);
        assert!(plan.all_shortages.is_empty());
        assert_eq!(plan.shortage_days(), 0);
        let day_numbers: Vec<u32> = plan.final_daily_plan.iter().map(|d| d.day_number).collect();
        assert_eq!(day_numbers, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_missing_protein_marks_every_day_short() {
        let source = FakeSource::new(
            vec![InventoryRow::new("Apple", "100")],
            vec![
                InventoryRow::new("Rice", "100"),
                InventoryRow::new("Milk", "100"),
                InventoryRow::new("Olive Oil", "100"),
            ],
        );

        let plan = generate_monthly_plan(&source, 2).unwrap();

        assert_eq!(plan.shortage_days(), 30);
        assert!(plan.final_daily_plan.iter().all(|d| d.meals.is_empty()));
        assert_eq!(plan.all_shortages.len(), 1);
        let details = &plan.all_shortages[0].details;
        assert_eq!(details.len(), 30);
        assert_eq!(details[0].categories[0].category, Category::Protein);
        assert_eq!(details[0].categories[0].shortfall, 1.0);
    }

    #[test]
    fn test_shortage_days_do_not_consume_stock() {
        // 3 days of protein, everything else plentiful
        let source = FakeSource::new(
            vec![InventoryRow::new("Lentils", "3")],
            vec![
                InventoryRow::new("Apple", "1000"),
                InventoryRow::new("Rice", "1000"),
                InventoryRow::new("Milk", "1000"),
                InventoryRow::new("Olive Oil", "1000"),
            ],
        );

        let plan = generate_monthly_plan(&source, 1).unwrap();

        assert_eq!(plan.shortage_days(), 27);
        assert!(plan.final_daily_plan[..3].iter().all(|d| !d.shortage));
        assert!(plan.final_daily_plan[3..].iter().all(|d| d.shortage));
    }

    #[test]
    fn test_failed_day_rolls_back_and_later_days_retry() {
        // 12 fruit servings: two full days, then 2 left over
        let source = FakeSource::new(
            vec![InventoryRow::new("Apple", "6")],
            vec![
                InventoryRow::new("Rice", "1000"),
                InventoryRow::new("Milk", "1000"),
                InventoryRow::new("Lentils", "1000"),
                InventoryRow::new("Olive Oil", "1000"),
            ],
        );

        let plan = generate_monthly_plan(&source, 1).unwrap();

        assert!(!plan.final_daily_plan[0].shortage);
        assert!(!plan.final_daily_plan[1].shortage);
        assert_eq!(plan.shortage_days(), 28);

        // Each failing day eats 1 fruit at breakfast and fails at lunch. Without
        // the rollback day 4 would already fail at breakfast.
        let details = &plan.all_shortages[0].details;
        assert_eq!(details[0].day_number, 3);
        assert!(details.iter().all(|d| d.meal_time == MealKind::Lunch));
        assert_eq!(details[0].categories[0].shortfall, 1.0);
    }

    #[test]
    fn test_month_selects_rotation_cycle() {
        let source = FakeSource::new(vec![], vec![]);

        let april = generate_monthly_plan(&source, 4).unwrap();
        let july = generate_monthly_plan(&source, 7).unwrap();
        let june = generate_monthly_plan(&source, 6).unwrap();

        assert_eq!(april.cycle_month.get(), 1);
        assert_eq!(july.cycle_month, april.cycle_month);
        assert_eq!(june.cycle_month.get(), 3);
        assert_eq!(*source.requested_cycles.borrow(), vec![1, 1, 3]);
        assert_eq!(april.month_requested, 4);
    }

    #[test]
    fn test_unknown_rows_are_reported_not_planned() {
        let source = FakeSource::new(
            vec![InventoryRow::new("Apple", "100"), InventoryRow::new("Cookies", "10")],
            vec![InventoryRow::new("Dish Soap", "2")],
        );

        let plan = generate_monthly_plan(&source, 1).unwrap();

        assert_eq!(plan.skipped_items.len(), 2);
        assert_eq!(plan.skipped_items[0].item_name, "Cookies");
        assert_eq!(plan.skipped_items[0].source, Source::Box);
        assert_eq!(plan.skipped_items[1].reason, SkipReason::NotInReference);
        let mentions_cookies = plan
            .final_daily_plan
            .iter()
            .flat_map(|d| d.meals.iter().flat_map(|m| &m.used_items))
            .any(|u| u.item_name == "Cookies");
        assert!(!mentions_cookies);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let source = FakeSource::new(
            vec![InventoryRow::new("Apple", "40"), InventoryRow::new("Rice", "12")],
            vec![
                InventoryRow::new("Rice", "20"),
                InventoryRow::new("Milk", "25"),
                InventoryRow::new("Lentils", "20"),
                InventoryRow::new("Olive Oil", "20"),
            ],
        );

        let first = generate_monthly_plan(&source, 5).unwrap();
        let second = generate_monthly_plan(&source, 5).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_load_failure_aborts_run() {
        let err = generate_monthly_plan(&BrokenSource, 1).unwrap_err();
        assert!(matches!(err, PlannerError::ConfigurationError { .. }));
    }
}

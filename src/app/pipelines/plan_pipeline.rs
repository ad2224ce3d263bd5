use crate::adapters::csv_source::{CsvDataset, SourceFile};
use crate::core::month::generate_monthly_plan;
use crate::core::{ConfigProvider, MonthPlan, Pipeline, Storage};
use crate::domain::model::{CycleMonth, SkipReason, SkippedItem, Source};
use crate::utils::error::{PlannerError, Result};
use std::path::Path;

/// Reads the month's CSV sources through `Storage`, plans the month and
/// writes the plan as JSON.
pub struct PlanPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) month: i64,
}

impl<S: Storage, C: ConfigProvider> PlanPipeline<S, C> {
    pub fn new(storage: S, config: C, month: i64) -> Self {
        Self {
            storage,
            config,
            month,
        }
    }

    pub fn output_file(&self) -> String {
        Path::new(self.config.output_path())
            .join(format!("monthly_plan_month_{}.json", self.month))
            .to_string_lossy()
            .into_owned()
    }

    fn data_path(&self, file: &str) -> String {
        Path::new(self.config.data_dir())
            .join(file)
            .to_string_lossy()
            .into_owned()
    }

    async fn read_source(&self, file: &str) -> Result<SourceFile> {
        let path = self.data_path(file);
        tracing::debug!("Reading {}", path);
        match self.storage.read_file(&path).await {
            Ok(bytes) => Ok(SourceFile::new(path, bytes)),
            Err(PlannerError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PlannerError::data_source(format!("Cannot find '{}'.", path)))
            }
            Err(PlannerError::IoError(e)) => {
                Err(PlannerError::data_source(format!("Error reading '{}': {}", path, e)))
            }
            Err(other) => Err(other),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PlanPipeline<S, C> {
    type Extracted = CsvDataset;

    async fn extract(&self) -> Result<CsvDataset> {
        let cycle = CycleMonth::from_month(self.month);
        let box_file = self.config.box_file(cycle).ok_or_else(|| {
            PlannerError::data_source(format!("No senior box file configured for cycle month {}.", cycle))
        })?;

        let reference = self.read_source(self.config.reference_file()).await?;
        let senior_box = self.read_source(box_file).await?;
        let main = self.read_source(self.config.main_inventory_file()).await?;

        tracing::debug!(
            "Loaded reference ({} bytes), box cycle {} ({} bytes), main ({} bytes)",
            reference.bytes.len(),
            cycle,
            senior_box.bytes.len(),
            main.bytes.len()
        );

        Ok(CsvDataset::new(reference, main).with_box(cycle, senior_box))
    }

    async fn transform(&self, data: CsvDataset) -> Result<MonthPlan> {
        let plan = generate_monthly_plan(&data, self.month)?;

        for skipped in &plan.skipped_items {
            log_skipped(skipped);
        }
        for report in &plan.all_shortages {
            for day in &report.details {
                tracing::info!(
                    "Day {}: shortage at {:?} ({})",
                    day.day_number,
                    day.meal_time,
                    day.categories
                        .iter()
                        .map(|c| format!("{} short {}", c.category, c.shortfall))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }

        Ok(plan)
    }

    async fn load(&self, plan: &MonthPlan) -> Result<String> {
        let output_file = self.output_file();
        let json = serde_json::to_vec_pretty(plan)?;

        tracing::debug!("Writing plan ({} bytes) to {}", json.len(), output_file);
        self.storage.write_file(&output_file, &json).await?;
        Ok(output_file)
    }
}

fn log_skipped(skipped: &SkippedItem) {
    let source = match skipped.source {
        Source::Box => "senior box",
        Source::Main => "main",
    };
    match &skipped.reason {
        SkipReason::NotInReference => tracing::warn!(
            "Skipping {} item '{}' (not found in reference).",
            source,
            skipped.item_name
        ),
        SkipReason::UnrecognizedCategory { raw_category } => tracing::warn!(
            "Skipping {} item '{}', raw category '{}' not recognized.",
            source,
            skipped.item_name,
            raw_category
        ),
    }
}

use crate::domain::model::{BoxDataset, CycleMonth, InventoryRow, MonthPlan, ReferenceRow};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn reference_file(&self) -> &str;
    /// File holding the senior box for `cycle`, if one is configured.
    fn box_file(&self, cycle: CycleMonth) -> Option<&str>;
    fn main_inventory_file(&self) -> &str;
    fn output_path(&self) -> &str;
}

/// The tabular sources a month plan is computed from.
///
/// Every call must hand back freshly parsed rows; the planner mutates what it
/// builds from them.
pub trait InventorySource {
    fn load_reference(&self) -> Result<Vec<ReferenceRow>>;
    fn load_box_inventory(&self, cycle: CycleMonth) -> Result<BoxDataset>;
    fn load_main_inventory(&self) -> Result<Vec<InventoryRow>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<MonthPlan>;
    async fn load(&self, plan: &MonthPlan) -> Result<String>;
}

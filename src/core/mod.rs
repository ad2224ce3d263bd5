pub mod allocator;
pub mod day;
pub mod etl;
pub mod inventory;
pub mod meal;
pub mod month;
pub mod reference;

pub use crate::domain::model::{InventoryItem, MonthPlan, UsageRecord};
pub use crate::domain::ports::{ConfigProvider, InventorySource, Pipeline, Storage};
pub use crate::utils::error::Result;

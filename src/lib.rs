pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use app::pipelines::plan_pipeline::PlanPipeline;
pub use config::toml_config::TomlConfig;
pub use core::{etl::PlanEngine, month::generate_monthly_plan};
pub use utils::error::{PlannerError, Result};

use super::{
    validate_data_files, DEFAULT_DATA_DIR, DEFAULT_MAIN_INVENTORY_FILE, DEFAULT_OUTPUT_PATH,
    DEFAULT_REFERENCE_FILE,
};
use crate::domain::model::CycleMonth;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "meal-planner")]
#[command(about = "Builds a 30-day senior meal allocation plan from box and main inventory")]
pub struct CliConfig {
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    pub month: i64,

    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: String,

    #[arg(long, default_value = DEFAULT_REFERENCE_FILE)]
    pub reference_file: String,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "senior_box_month_1.csv,senior_box_month_2.csv,senior_box_month_3.csv"
    )]
    pub box_files: Vec<String>,

    #[arg(long, default_value = DEFAULT_MAIN_INVENTORY_FILE)]
    pub main_inventory_file: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn reference_file(&self) -> &str {
        &self.reference_file
    }

    fn box_file(&self, cycle: CycleMonth) -> Option<&str> {
        self.box_files.get(cycle.index()).map(String::as_str)
    }

    fn main_inventory_file(&self) -> &str {
        &self.main_inventory_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_data_files(
            &self.data_dir,
            &self.reference_file,
            &self.box_files,
            &self.main_inventory_file,
        )?;
        validate_path("output_path", &self.output_path)
    }
}

#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::domain::model::CycleMonth;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path};

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_REFERENCE_FILE: &str = "food_reference.csv";
pub const DEFAULT_BOX_FILES: [&str; 3] = [
    "senior_box_month_1.csv",
    "senior_box_month_2.csv",
    "senior_box_month_3.csv",
];
pub const DEFAULT_MAIN_INVENTORY_FILE: &str = "main_inventory.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Checks the data file settings shared by every configuration source.
pub fn validate_data_files(
    data_dir: &str,
    reference_file: &str,
    box_files: &[String],
    main_inventory_file: &str,
) -> Result<()> {
    validate_path("data_dir", data_dir)?;
    validate_non_empty_string("reference_file", reference_file)?;
    validate_non_empty_string("main_inventory_file", main_inventory_file)?;

    if box_files.len() != CycleMonth::ALL.len() {
        return Err(PlannerError::InvalidConfigValueError {
            field: "box_files".to_string(),
            value: box_files.join(","),
            reason: format!(
                "Expected one senior box file per cycle month ({} files)",
                CycleMonth::ALL.len()
            ),
        });
    }
    for file in box_files {
        validate_non_empty_string("box_files", file)?;
    }
    Ok(())
}

use crate::config::{
    validate_data_files, DEFAULT_BOX_FILES, DEFAULT_DATA_DIR, DEFAULT_MAIN_INVENTORY_FILE,
    DEFAULT_OUTPUT_PATH, DEFAULT_REFERENCE_FILE,
};
use crate::core::ConfigProvider;
use crate::domain::model::CycleMonth;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub planner: PlannerConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            name: "senior-meal-plan".to_string(),
            description: "30-day 5-4-3-2-1 allocation from senior box and main inventory".to_string(),
            version: "1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub directory: String,
    pub reference_file: String,
    pub box_files: Vec<String>,
    pub main_inventory_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_DATA_DIR.to_string(),
            reference_file: DEFAULT_REFERENCE_FILE.to_string(),
            box_files: DEFAULT_BOX_FILES.iter().map(|f| f.to_string()).collect(),
            main_inventory_file: DEFAULT_MAIN_INVENTORY_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlannerError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_data_files(
            &self.data.directory,
            &self.data.reference_file,
            &self.data.box_files,
            &self.data.main_inventory_file,
        )?;
        validate_path("load.output_path", &self.load.output_path)?;
        validate_non_empty_string("server.bind", &self.server.bind)?;
        validate_positive_number("server.port", usize::from(self.server.port), 1)?;
        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.data.directory
    }

    fn reference_file(&self) -> &str {
        &self.data.reference_file
    }

    fn box_file(&self, cycle: CycleMonth) -> Option<&str> {
        self.data.box_files.get(cycle.index()).map(String::as_str)
    }

    fn main_inventory_file(&self) -> &str {
        &self.data.main_inventory_file
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

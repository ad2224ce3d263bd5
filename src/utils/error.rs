use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Data source error: {message}")]
    DataSourceError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config file error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    DataSource,
    Schema,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSourceError {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DataSourceError { .. } => ErrorCategory::DataSource,
            Self::ConfigurationError { .. } => ErrorCategory::Schema,
            Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config | ErrorCategory::DataSource | ErrorCategory::Schema => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DataSourceError { .. } => {
                "Check that the data directory contains the reference, senior box and main inventory files"
            }
            Self::ConfigurationError { .. } => {
                "Check the column headers of the data file named in the message"
            }
            Self::ConfigValidationError { .. } => "Fix the syntax of the TOML configuration file",
            Self::MissingConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the command line flags or the configuration file"
            }
            Self::IoError(_) => "Check file permissions and available disk space",
            Self::SerializationError(_) => "Report this as a bug: the plan could not be encoded",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DataSourceError { message } => format!("Could not load inventory data: {}", message),
            Self::ConfigurationError { message } => format!("Inventory data has the wrong shape: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;

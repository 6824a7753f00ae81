use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing column '{column}' in {source_name}")]
    MissingColumnError { source_name: String, column: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to fetch {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("{message}")]
    NotFoundError { message: String },

    #[error("Requirement mapping error: {message}")]
    MappingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdvisorError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingColumnError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::HttpError(_) | Self::FetchError { .. } => ErrorCategory::Network,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::MappingError { .. }
            | Self::NotFoundError { .. } => ErrorCategory::Data,
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    /// 軟性錯誤只會降級結果，不會中斷整條管線
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFoundError { .. } | Self::MappingError { .. } => ErrorSeverity::Low,
            Self::HttpError(_) | Self::FetchError { .. } => ErrorSeverity::Medium,
            Self::ValidationError { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::MissingColumnError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn is_soft(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingColumnError { source_name, column } => format!(
                "Add a '{}' column to the header row of {}",
                column, source_name
            ),
            Self::ConfigError { .. } => {
                "Check the configuration file and command line flags".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for {}", field)
            }
            Self::HttpError(_) | Self::FetchError { .. } => {
                "Check network connectivity and the plan of study URL".to_string()
            }
            Self::NotFoundError { .. } => {
                "Try the full degree program name, e.g. 'B.S. in Computer Science'".to_string()
            }
            Self::MappingError { .. } => {
                "Each requirement needs at least a code or a name".to_string()
            }
            Self::ValidationError { .. } => {
                "Semester must be a positive integer and major must not be empty".to_string()
            }
            Self::CsvError(_) => "Check the catalog CSV files for malformed rows".to_string(),
            Self::SerializationError(_) => "Check that the input is valid JSON".to_string(),
            Self::IoError(_) => "Check that the file exists and is readable".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach the course catalog: {}", self),
            ErrorCategory::Data => format!("Could not read catalog data: {}", self),
            ErrorCategory::Input => format!("Invalid request: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

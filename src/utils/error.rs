use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrereqError {
    #[error("Catalog request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Malformed course code '{code}': {reason}")]
    CourseCodeError { code: String, reason: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Input,
    Network,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PrereqError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PrereqError::ApiError(_) => ErrorCategory::Network,
            PrereqError::IoError(_) | PrereqError::CsvError(_) => ErrorCategory::Io,
            PrereqError::ConfigError { .. }
            | PrereqError::ConfigValidationError { .. }
            | PrereqError::InvalidConfigValueError { .. }
            | PrereqError::MissingConfigError { .. } => ErrorCategory::Config,
            PrereqError::SerializationError(_)
            | PrereqError::CourseCodeError { .. }
            | PrereqError::ValidationError { .. } => ErrorCategory::Input,
            PrereqError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Config | ErrorCategory::Input | ErrorCategory::Processing => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PrereqError::ApiError(_) => "Could not download the course catalog".to_string(),
            PrereqError::CourseCodeError { code, .. } => {
                format!("Course code '{}' is not in DEPT-NUM form", code)
            }
            PrereqError::SerializationError(_) => {
                "The course catalog is not valid JSON".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Config => "Check the TOML configuration file and CLI overrides",
            ErrorCategory::Input => "Check the catalog dump: every key must look like DEPT-NUM",
            ErrorCategory::Network => "Check the catalog endpoint and network, then retry",
            ErrorCategory::Io => "Check that the output directory is writable",
            ErrorCategory::Processing => "Re-run with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, PrereqError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to import \"{source_ref}\": {cause}")]
    ImportFailed {
        source_ref: String,
        #[source]
        cause: Box<ImportError>,
    },

    #[error("Incorrect number of files imported: {expected} != {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Import worker failed: {message}")]
    WorkerFailed { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported source \"{source_ref}\": {reason}")]
    UnsupportedSource { source_ref: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

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
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Source,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::ImportFailed { cause, .. } => cause.category(),
            ImportError::CountMismatch { .. } | ImportError::WorkerFailed { .. } => {
                ErrorCategory::Internal
            }
            ImportError::Http(_) | ImportError::HttpStatus { .. } => ErrorCategory::Network,
            ImportError::UnsupportedSource { .. } => ErrorCategory::Source,
            ImportError::Io(_) | ImportError::Storage { .. } | ImportError::Serialization(_) => {
                ErrorCategory::Storage
            }
            ImportError::ConfigError { .. }
            | ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ImportError::ImportFailed { cause, .. } => cause.severity(),
            ImportError::CountMismatch { .. } | ImportError::WorkerFailed { .. } => {
                ErrorSeverity::Critical
            }
            // 網路錯誤通常可以整批重試
            ImportError::Http(_) | ImportError::HttpStatus { .. } => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ImportError::ImportFailed { cause, .. } => cause.recovery_suggestion(),
            ImportError::CountMismatch { .. } | ImportError::WorkerFailed { .. } => {
                "This is an internal fault; re-run the whole batch and report the logs".to_string()
            }
            ImportError::Http(_) => {
                "Check network connectivity and re-run the import".to_string()
            }
            ImportError::HttpStatus { status, .. } if *status == 401 || *status == 403 => {
                "Check that the source is publicly readable or credentials are configured"
                    .to_string()
            }
            ImportError::HttpStatus { status, .. } if *status == 404 => {
                "Check that the source URL is spelled correctly".to_string()
            }
            ImportError::HttpStatus { .. } => "Retry the import later".to_string(),
            ImportError::UnsupportedSource { .. } => {
                "Use an http://, https:// or file:// source URL".to_string()
            }
            ImportError::Io(_) | ImportError::Storage { .. } => {
                "Check that the job store exists and is writable".to_string()
            }
            ImportError::Serialization(_) => "Check the manifest contents".to_string(),
            ImportError::ConfigError { .. }
            | ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => {
                "Fix the configuration and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::ImportFailed { source_ref, cause } => {
                format!("Could not import {}: {}", source_ref, cause.user_friendly_message())
            }
            ImportError::CountMismatch { expected, actual } => format!(
                "Internal error: expected {} imported files but collected {}",
                expected, actual
            ),
            ImportError::Http(_) => "Network request failed".to_string(),
            ImportError::HttpStatus { url, status } => {
                format!("Server returned {} for {}", status, url)
            }
            other => other.to_string(),
        }
    }
}

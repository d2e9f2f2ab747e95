use crate::domain::model::ItemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VillaError {
    #[error("Invalid date range: {reason}")]
    InvalidDateRange { reason: String },

    #[error("No villas selected to send")]
    EmptyRecipientSet,

    #[error("Favorites storage unavailable: {message}")]
    PersistenceUnavailable { message: String },

    #[error("Villa #{id} not found")]
    ItemNotFound { id: ItemId },

    #[error("Cannot {event} while {state}")]
    InvalidTransition { state: String, event: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    BackendError { status: u16, message: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Booking,
    Network,
    Storage,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VillaError {
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidDateRange {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDateRange { .. }
            | Self::EmptyRecipientSet
            | Self::ItemNotFound { .. }
            | Self::InvalidTransition { .. } => ErrorCategory::Booking,
            Self::ApiError(_) | Self::BackendError { .. } => ErrorCategory::Network,
            Self::PersistenceUnavailable { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者可以直接修正輸入
            ErrorCategory::Booking | ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "Pick a check-out date after the check-in date",
            Self::EmptyRecipientSet => "Add at least one villa to your favorites first",
            Self::ItemNotFound { .. } => "Refresh the villa list and pick an existing villa",
            Self::InvalidTransition { .. } => "Cancel the current booking and start again",
            Self::PersistenceUnavailable { .. } => {
                "Favorites are kept in memory only; check the favorites file permissions"
            }
            Self::ApiError(_) | Self::BackendError { .. } => {
                "Check the backend URL, the anon key and your network connection"
            }
            Self::IoError(_) | Self::SerializationError(_) => {
                "Check that the file exists and contains valid data"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and run again",
            Self::ValidationError { .. } => "Correct the highlighted field and submit again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyRecipientSet => "Your favorites list is empty.".to_string(),
            Self::ItemNotFound { .. } => "Villa not found.".to_string(),
            Self::InvalidDateRange { .. } => {
                "Check-out date must be after check-in date.".to_string()
            }
            Self::ApiError(_) | Self::BackendError { .. } => {
                format!("Failed to reach the villa backend: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VillaError>;

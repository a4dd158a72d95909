//! Error types for the schema registry provider

use thiserror::Error;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("Invalid value for attribute {name}: {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("Schema registry returned {status}: {message} (error code {error_code})")]
    Registry {
        status: u16,
        error_code: i64,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Registry error code for an unknown subject
    pub const SUBJECT_NOT_FOUND: i64 = 40401;

    /// Whether the registry reported the subject as unknown
    pub fn is_subject_not_found(&self) -> bool {
        matches!(
            self,
            ProviderError::Registry { error_code, .. } if *error_code == Self::SUBJECT_NOT_FOUND
        )
    }

    /// Attribute path this error relates to, if any
    pub fn attribute(&self) -> Option<&str> {
        match self {
            ProviderError::MissingAttribute(name) => Some(name.as_str()),
            ProviderError::InvalidAttribute { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

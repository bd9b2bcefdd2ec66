//! Errors raised while parsing configuration values

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Unsupported duration format '{0}'; use 'Xd' or 'Xmo'")]
    UnsupportedDuration(String),

    #[error("Unsupported bar interval '{0}'; use one of 5m, 15m, 60m, 1d")]
    UnsupportedInterval(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigurationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

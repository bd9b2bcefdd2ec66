//! Error types for the signal server

use pulse_types::{ClientId, ConfigurationError};
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to bind {addr}: {message}")]
    Bind { addr: SocketAddr, message: String },

    #[error("Client error: {message}")]
    Client { message: String },

    #[error("Unknown client {0}")]
    UnknownClient(ClientId),
}

impl From<ConfigurationError> for ServerError {
    fn from(err: ConfigurationError) -> Self {
        ServerError::Configuration {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

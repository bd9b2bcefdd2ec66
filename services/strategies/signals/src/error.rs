//! Error types for strategy evaluation

use pulse_market_data::DataError;
use pulse_types::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Not enough data for {symbol}: need {required} bars, got {available}")]
    InsufficientData {
        symbol: String,
        required: usize,
        available: usize,
    },

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Market data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, StrategyError>;

//! Testing utilities for strategy consumers

use crate::error::{Result, StrategyError};
use crate::traits::SignalStrategy;
use async_trait::async_trait;
use pulse_market_data::DataError;
use pulse_types::{Signal, SignalResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a [`MockStrategy`] does when evaluated
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Return(SignalResult),
    /// Return `Err` carrying this message
    Fail(String),
    /// Panic inside `evaluate`
    Panic(String),
    /// Sleep, then return the result
    Delay(Duration, SignalResult),
}

/// Strategy with scripted behaviour and a call counter
#[derive(Debug)]
pub struct MockStrategy {
    pub name: &'static str,
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockStrategy {
    pub fn new(name: &'static str, behavior: MockBehavior) -> Self {
        Self {
            name,
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with `signal`
    pub fn returning(name: &'static str, signal: Signal) -> Self {
        Self::new(name, MockBehavior::Return(signal.into()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignalStrategy for MockStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn evaluate(&self, _symbol: &str) -> Result<SignalResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Return(result) => Ok(result.clone()),
            MockBehavior::Fail(message) => Err(StrategyError::Data(DataError::Unavailable(
                message.clone(),
            ))),
            MockBehavior::Panic(message) => panic!("{}", message),
            MockBehavior::Delay(delay, result) => {
                tokio::time::sleep(*delay).await;
                Ok(result.clone())
            }
        }
    }
}

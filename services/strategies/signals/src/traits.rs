//! Strategy traits and interfaces

use crate::error::Result;
use async_trait::async_trait;
use pulse_types::SignalResult;

/// A named evaluator producing one signal for a symbol.
///
/// Implementations must be safe to call concurrently for different symbols;
/// the scheduler evaluates every subscription of a tick in parallel.
#[async_trait]
pub trait SignalStrategy: Send + Sync {
    /// Name clients subscribe with
    fn name(&self) -> &'static str;

    async fn evaluate(&self, symbol: &str) -> Result<SignalResult>;
}

//! Combined momentum / breakout / volume signal

use crate::daily::{BreakoutStrategy, MomentumStrategy, VolumeStrategy};
use crate::error::Result;
use crate::traits::SignalStrategy;
use async_trait::async_trait;
use pulse_types::{CombinedSignal, Signal, SignalResult};
use tracing::debug;

/// Fold the three daily signals into one.
///
/// Momentum agreeing with volume is a strong signal whatever breakout says;
/// otherwise any single Buy wins over any Sell.
pub fn combine(momentum: Signal, breakout: Signal, volume: Signal) -> CombinedSignal {
    use pulse_types::Signal::{Buy, Hold, Sell, StrongBuy, StrongSell};

    let final_signal = match (momentum, breakout, volume) {
        (Buy, _, Buy) => StrongBuy,
        (Sell, _, Sell) => StrongSell,
        _ if [momentum, breakout, volume].contains(&Buy) => Buy,
        _ if [momentum, breakout, volume].contains(&Sell) => Sell,
        _ => Hold,
    };

    CombinedSignal {
        momentum,
        breakout,
        volume,
        final_signal,
    }
}

/// Runs the three daily strategies concurrently, each with its own fetch
pub struct CombinedStrategy {
    momentum: MomentumStrategy,
    breakout: BreakoutStrategy,
    volume: VolumeStrategy,
}

impl CombinedStrategy {
    pub const NAME: &'static str = "combined";

    pub fn new(momentum: MomentumStrategy, breakout: BreakoutStrategy, volume: VolumeStrategy) -> Self {
        Self {
            momentum,
            breakout,
            volume,
        }
    }

    pub async fn signal(&self, symbol: &str) -> CombinedSignal {
        let (momentum, breakout, volume) = tokio::join!(
            self.momentum.signal(symbol),
            self.breakout.signal(symbol),
            self.volume.signal(symbol),
        );

        let combined = combine(momentum, breakout, volume);
        debug!(
            "[combined] {}: momentum={} breakout={} volume={} -> {}",
            symbol, momentum, breakout, volume, combined.final_signal
        );
        combined
    }
}

#[async_trait]
impl SignalStrategy for CombinedStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn evaluate(&self, symbol: &str) -> Result<SignalResult> {
        Ok(self.signal(symbol).await.into())
    }
}

//! Name-to-evaluator lookup

use crate::adx::AdxStrategy;
use crate::combined::CombinedStrategy;
use crate::config::StrategyConfig;
use crate::daily::{BreakoutStrategy, MomentumStrategy, VolumeStrategy};
use crate::error::{Result, StrategyError};
use crate::score::ScoreStrategy;
use crate::timeframes::MultiTimeframeStrategy;
use crate::traits::SignalStrategy;
use pulse_market_data::MarketDataProvider;
use std::collections::HashMap;
use std::sync::Arc;

/// Strategies clients can subscribe to, keyed by [`SignalStrategy::name`]
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<&'static str, Arc<dyn SignalStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All eight built-in strategies sharing one provider
    pub fn with_defaults(provider: Arc<dyn MarketDataProvider>, config: &StrategyConfig) -> Self {
        let momentum = || MomentumStrategy::new(provider.clone(), config.momentum.clone());
        let breakout = || BreakoutStrategy::new(provider.clone(), config.breakout.clone());
        let volume = || VolumeStrategy::new(provider.clone(), config.volume.clone());

        let mut registry = Self::new();
        registry.register(Arc::new(momentum()));
        registry.register(Arc::new(breakout()));
        registry.register(Arc::new(volume()));
        registry.register(Arc::new(CombinedStrategy::new(momentum(), breakout(), volume())));
        registry.register(Arc::new(MultiTimeframeStrategy::intraday(
            provider.clone(),
            config.intraday,
            config.supertrend.clone(),
        )));
        registry.register(Arc::new(MultiTimeframeStrategy::swing(
            provider.clone(),
            config.swing,
            config.supertrend.clone(),
        )));
        registry.register(Arc::new(AdxStrategy::new(provider.clone(), config.adx.clone())));
        registry.register(Arc::new(ScoreStrategy::new(provider, config.score.clone())));
        registry
    }

    /// Add or replace a strategy, returning the one it displaced
    pub fn register(&mut self, strategy: Arc<dyn SignalStrategy>) -> Option<Arc<dyn SignalStrategy>> {
        self.strategies.insert(strategy.name(), strategy)
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn SignalStrategy>> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| StrategyError::UnknownStrategy(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.strategies.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_market_data::testing::MockProvider;

    #[test]
    fn test_defaults_register_every_strategy() {
        let registry =
            StrategyRegistry::with_defaults(Arc::new(MockProvider::new()), &StrategyConfig::default());

        assert_eq!(
            registry.names(),
            vec![
                "adx",
                "breakout",
                "combined",
                "intraday",
                "momentum",
                "scoresignal",
                "swing",
                "volume"
            ]
        );
    }

    #[test]
    fn test_unknown_strategy() {
        let registry = StrategyRegistry::new();

        match registry.resolve("fibonacci") {
            Err(StrategyError::UnknownStrategy(name)) => assert_eq!(name, "fibonacci"),
            other => panic!("expected UnknownStrategy, got {:?}", other.map(|s| s.name())),
        }
    }
}

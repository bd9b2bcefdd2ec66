//! Tick behaviour of the polling scheduler against a recording sink

use pulse_market_data::testing::MockProvider;
use pulse_signal_server::testing::RecordingSink;
use pulse_signal_server::{PollingScheduler, ServerMessage, SubscriptionRegistry, TickReport};
use pulse_strategies::testing::{MockBehavior, MockStrategy};
use pulse_strategies::{StrategyConfig, StrategyRegistry};
use pulse_types::{ClientId, Interval, Signal, SignalResult, Subscription};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    registry: Arc<SubscriptionRegistry>,
    sink: Arc<RecordingSink>,
    scheduler: PollingScheduler,
}

impl Harness {
    fn new(strategies: StrategyRegistry, period: Duration) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let sink = Arc::new(RecordingSink::new());
        let scheduler =
            PollingScheduler::new(registry.clone(), Arc::new(strategies), sink.clone(), period);
        Self {
            registry,
            sink,
            scheduler,
        }
    }

    fn with_mocks(mocks: Vec<MockStrategy>) -> Self {
        let mut strategies = StrategyRegistry::new();
        for mock in mocks {
            strategies.register(Arc::new(mock));
        }
        Self::new(strategies, Duration::from_secs(60))
    }

    fn client(&self, subscriptions: &[(&str, &str)]) -> ClientId {
        let client = ClientId::new();
        self.registry.connect(client);
        for (symbol, strategy) in subscriptions {
            self.registry
                .subscribe(client, Subscription::new(*symbol, *strategy))
                .unwrap();
        }
        client
    }
}

#[tokio::test]
async fn test_duplicate_subscribe_delivers_once_per_tick() {
    let harness = Harness::with_mocks(vec![MockStrategy::returning("volume", Signal::Sell)]);
    let client = harness.client(&[("AAPL", "volume"), ("AAPL", "volume")]);

    let report = harness.scheduler.run_tick().await;

    assert_eq!(report.pairs, 1);
    let signals = harness.sink.signals_for(client);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].signal, Some(SignalResult::Classification(Signal::Sell)));
}

#[tokio::test]
async fn test_disconnected_client_receives_nothing() {
    let harness = Harness::with_mocks(vec![MockStrategy::returning("momentum", Signal::Buy)]);
    let leaving = harness.client(&[("AAPL", "momentum"), ("MSFT", "momentum")]);
    let staying = harness.client(&[("TSLA", "momentum")]);

    harness.scheduler.run_tick().await;
    assert_eq!(harness.sink.signals_for(leaving).len(), 2);

    harness.registry.disconnect(leaving);
    harness.sink.clear();
    let report = harness.scheduler.run_tick().await;

    assert_eq!(report.pairs, 1);
    assert!(harness.sink.messages_for(leaving).is_empty());
    assert_eq!(harness.sink.signals_for(staying).len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_for_one_symbol_does_not_block_another() {
    let rally = MockProvider::bars_from_closes(Interval::Day1, &[100.0, 101.0, 102.0, 104.0, 108.0]);
    let provider = Arc::new(
        MockProvider::new()
            .with_failure("AAPL", "connection reset")
            .with_series("MSFT", Interval::Day1, rally),
    );
    let strategies = StrategyRegistry::with_defaults(provider, &StrategyConfig::default());
    let harness = Harness::new(strategies, Duration::from_secs(60));
    let client = harness.client(&[("AAPL", "momentum"), ("MSFT", "momentum")]);

    let report = harness.scheduler.run_tick().await;
    assert_eq!(report.signals, 2);

    let mut signals = harness.sink.signals_for(client);
    signals.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    assert_eq!(signals[0].symbol, "AAPL");
    assert_eq!(signals[0].signal, Some(SignalResult::Classification(Signal::Hold)));
    assert_eq!(signals[1].symbol, "MSFT");
    assert_eq!(signals[1].signal, Some(SignalResult::Classification(Signal::Buy)));
}

#[tokio::test]
async fn test_evaluation_error_becomes_error_frame() {
    let harness = Harness::with_mocks(vec![
        MockStrategy::new("broken", MockBehavior::Fail("quote service down".to_string())),
        MockStrategy::returning("momentum", Signal::Buy),
    ]);
    let client = harness.client(&[("AAPL", "broken"), ("AAPL", "momentum")]);

    let report = harness.scheduler.run_tick().await;

    assert_eq!(report.signals, 1);
    assert_eq!(report.errors, 1);
    let failed = harness
        .sink
        .signals_for(client)
        .into_iter()
        .find(|m| m.strategy == "broken")
        .unwrap();
    assert_eq!(failed.signal, None);
    assert!(failed.error.unwrap().contains("quote service down"));
}

#[tokio::test]
async fn test_panicking_evaluation_is_reported_not_fatal() {
    let harness = Harness::with_mocks(vec![
        MockStrategy::new("explosive", MockBehavior::Panic("index out of range".to_string())),
        MockStrategy::returning("momentum", Signal::Hold),
    ]);
    let client = harness.client(&[("AAPL", "explosive"), ("AAPL", "momentum")]);

    let report = harness.scheduler.run_tick().await;
    assert_eq!(report.errors, 1);
    assert_eq!(report.signals, 1);

    let failed = harness
        .sink
        .signals_for(client)
        .into_iter()
        .find(|m| m.strategy == "explosive")
        .unwrap();
    assert_eq!(
        failed.error.as_deref(),
        Some("Evaluation panicked: index out of range")
    );

    // The scheduler keeps working on the next tick
    assert_eq!(harness.scheduler.run_tick().await.errors, 1);
}

#[tokio::test]
async fn test_unknown_strategy_is_skipped() {
    let harness = Harness::with_mocks(vec![MockStrategy::returning("momentum", Signal::Buy)]);
    let client = harness.client(&[("AAPL", "fibonacci"), ("AAPL", "momentum")]);

    let report = harness.scheduler.run_tick().await;

    assert_eq!(
        report,
        TickReport {
            pairs: 2,
            signals: 1,
            errors: 0,
            unknown_strategies: 1,
            undelivered: 0,
        }
    );
    assert_eq!(harness.sink.messages_for(client).len(), 1);
    assert_eq!(harness.scheduler.metrics().snapshot().unknown_strategies, 1);
}

#[tokio::test]
async fn test_slow_pair_does_not_delay_fast_pair() {
    let slow = MockStrategy::new(
        "slow",
        MockBehavior::Delay(Duration::from_millis(300), Signal::Sell.into()),
    );
    let harness = Harness::with_mocks(vec![slow, MockStrategy::returning("fast", Signal::Buy)]);
    let client = harness.client(&[("AAPL", "slow"), ("AAPL", "fast")]);

    harness.scheduler.run_tick().await;

    let order: Vec<String> = harness
        .sink
        .signals_for(client)
        .into_iter()
        .map(|m| m.strategy)
        .collect();
    assert_eq!(order, vec!["fast".to_string(), "slow".to_string()]);
}

#[tokio::test]
async fn test_refused_delivery_is_counted() {
    let harness = Harness::with_mocks(vec![MockStrategy::returning("momentum", Signal::Buy)]);
    let client = harness.client(&[("AAPL", "momentum")]);
    harness.sink.refuse(client);

    let report = harness.scheduler.run_tick().await;

    assert_eq!(report.undelivered, 1);
    assert_eq!(report.signals, 0);
}

#[tokio::test]
async fn test_first_tick_waits_one_period() {
    let mut strategies = StrategyRegistry::new();
    strategies.register(Arc::new(MockStrategy::returning("momentum", Signal::Buy)));
    let harness = Harness::new(strategies, Duration::from_millis(300));
    let client = harness.client(&[("AAPL", "momentum")]);

    let runner = tokio::spawn(harness.scheduler.clone().run());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(harness.sink.messages_for(client).is_empty());

    tokio::time::sleep(Duration::from_millis(500)).await;
    let delivered = harness.sink.messages_for(client);
    assert!(!delivered.is_empty());
    assert!(matches!(delivered[0], ServerMessage::Signal(_)));

    runner.abort();
}

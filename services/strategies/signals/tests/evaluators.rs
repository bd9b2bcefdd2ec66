//! End-to-end evaluator behaviour through the registry, backed by canned data

use pulse_market_data::testing::MockProvider;
use pulse_strategies::{StrategyConfig, StrategyRegistry};
use pulse_types::{Interval, ScoreSignal, Signal, SignalResult, TimeframeSignal, TrendDirection};
use serde_json::json;
use std::sync::Arc;

fn registry(provider: MockProvider) -> (Arc<MockProvider>, StrategyRegistry) {
    let provider = Arc::new(provider);
    let registry = StrategyRegistry::with_defaults(provider.clone(), &StrategyConfig::default());
    (provider, registry)
}

/// Nine quiet days at 100 followed by a high-volume close at 110
fn breakout_day() -> Vec<pulse_types::Bar> {
    let mut rows = vec![(100.0, 101.0, 99.0, 100.0, 1_000.0); 9];
    rows.push((101.0, 111.0, 100.5, 110.0, 5_000.0));
    MockProvider::bars_from_rows(Interval::Day1, &rows)
}

#[tokio::test]
async fn test_combined_agreement_is_strong_buy() {
    let (provider, registry) =
        registry(MockProvider::new().with_series("AAPL", Interval::Day1, breakout_day()));

    let result = registry
        .resolve("combined")
        .unwrap()
        .evaluate("AAPL")
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"momentum": "Buy", "breakout": "Buy", "volume": "Buy", "final": "Strong Buy"})
    );
    // One independent fetch per component
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_every_strategy_degrades_when_data_is_unavailable() {
    let (_, registry) = registry(MockProvider::new().with_failure("AAPL", "upstream timeout"));

    for name in registry.names() {
        let result = registry.resolve(name).unwrap().evaluate("AAPL").await;
        let result = result.unwrap_or_else(|e| panic!("{} returned an error: {}", name, e));

        match result {
            SignalResult::Classification(signal) => assert_eq!(signal, Signal::Hold, "{}", name),
            SignalResult::Combined(combined) => assert_eq!(combined.final_signal, Signal::Hold),
            SignalResult::Timeframes(frames) => assert_eq!(frames, TimeframeSignal::default()),
            SignalResult::Adx(adx) => {
                assert_eq!(adx.signal, Signal::Hold);
                assert_eq!(adx.adx, None);
            }
            SignalResult::Score(score) => {
                assert_eq!(score.final_signal, Signal::Hold);
                assert_eq!(score.score, 0);
                assert!(score.error.unwrap().contains("upstream timeout"));
            }
        }
    }
}

#[tokio::test]
async fn test_failed_timeframe_only_neutralises_its_label() {
    let rising: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
    let provider = MockProvider::new()
        .with_series("MSFT", Interval::Hour1, MockProvider::bars_from_closes(Interval::Hour1, &rising))
        .with_series("MSFT", Interval::Min15, MockProvider::bars_from_closes(Interval::Min15, &rising))
        .with_series("MSFT", Interval::Min5, MockProvider::bars_from_closes(Interval::Min5, &rising))
        .with_interval_failure("MSFT", Interval::Min5, "rate limited");
    let (_, registry) = registry(provider);

    let result = registry
        .resolve("intraday")
        .unwrap()
        .evaluate("MSFT")
        .await
        .unwrap();

    assert_eq!(
        result,
        SignalResult::Timeframes(TimeframeSignal {
            trend: TrendDirection::Up,
            setup: TrendDirection::Up,
            entry: TrendDirection::Neutral,
        })
    );
}

#[tokio::test]
async fn test_swing_requests_daily_trend() {
    let (provider, registry) = registry(MockProvider::new());

    registry.resolve("swing").unwrap().evaluate("SPY").await.unwrap();

    let mut intervals: Vec<_> = provider.requests().into_iter().map(|(_, i)| i).collect();
    intervals.sort_by_key(|i| i.duration());
    assert_eq!(intervals, vec![Interval::Min15, Interval::Hour1, Interval::Day1]);
}

#[tokio::test]
async fn test_scoresignal_needs_thirty_complete_bars() {
    let mut bars = MockProvider::bars_from_closes(Interval::Min15, &[100.0; 32]);
    // Three bars with a missing close leave 29 usable
    for bar in bars.iter_mut().take(3) {
        bar.close = f64::NAN;
    }
    let (_, registry) =
        registry(MockProvider::new().with_series("AAPL", Interval::Min15, bars));

    let result = registry
        .resolve("scoresignal")
        .unwrap()
        .evaluate("AAPL")
        .await
        .unwrap();

    assert_eq!(
        result,
        SignalResult::Score(ScoreSignal::degraded(
            "Not enough data for AAPL: need 30 bars, got 29"
        ))
    );
}

#[tokio::test]
async fn test_scoresignal_on_a_steady_rally() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + 0.5 * i as f64).collect();
    let (_, registry) = registry(MockProvider::new().with_series(
        "NVDA",
        Interval::Min15,
        MockProvider::bars_from_closes(Interval::Min15, &closes),
    ));

    let result = registry
        .resolve("scoresignal")
        .unwrap()
        .evaluate("NVDA")
        .await
        .unwrap();

    // Above VWAP +1, EMA9 > EMA21 +1, RSI overbought -1, MACD rising +2,
    // close inside the bands 0
    let SignalResult::Score(score) = result else {
        panic!("expected a score result");
    };
    assert_eq!(score.error, None);
    assert_eq!(score.score, 3);
    assert_eq!(score.final_signal, Signal::Buy);
}

#[tokio::test]
async fn test_unknown_strategy_is_an_error() {
    let (_, registry) = registry(MockProvider::new());
    assert!(registry.resolve("fibonacci").is_err());
}

//! Fixed-period polling of every active subscription

use crate::metrics::{SchedulerMetrics, TickReport};
use crate::protocol::{ServerMessage, SignalMessage};
use crate::registry::SubscriptionRegistry;
use crate::sink::SignalSink;
use futures_util::FutureExt;
use pulse_strategies::StrategyRegistry;
use pulse_types::{ClientId, Subscription};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Signal,
    Error,
    Undelivered,
}

/// Evaluates each (client, subscription) pair once per period and hands
/// the result to a [`SignalSink`]
#[derive(Clone)]
pub struct PollingScheduler {
    registry: Arc<SubscriptionRegistry>,
    strategies: Arc<StrategyRegistry>,
    sink: Arc<dyn SignalSink>,
    metrics: Arc<SchedulerMetrics>,
    period: Duration,
}

impl PollingScheduler {
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        strategies: Arc<StrategyRegistry>,
        sink: Arc<dyn SignalSink>,
        period: Duration,
    ) -> Self {
        Self {
            registry,
            strategies,
            sink,
            metrics: Arc::new(SchedulerMetrics::new()),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn metrics(&self) -> Arc<SchedulerMetrics> {
        self.metrics.clone()
    }

    /// Tick forever. The first tick fires one full period after the call.
    ///
    /// Ticks are spawned rather than awaited, so a slow tick overlaps the
    /// next one instead of delaying it.
    pub async fn run(self) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("⏱️ Polling scheduler started, period {:?}", self.period);

        loop {
            ticker.tick().await;
            let scheduler = self.clone();
            tokio::spawn(async move {
                scheduler.run_tick().await;
            });
        }
    }

    /// Evaluate the current snapshot once, each pair in its own task, and
    /// wait for all of them
    pub async fn run_tick(&self) -> TickReport {
        let snapshot = self.registry.snapshot();
        let mut report = TickReport {
            pairs: snapshot.len(),
            ..TickReport::default()
        };

        let mut tasks = JoinSet::new();
        for (client_id, subscription) in snapshot {
            let strategy = match self.strategies.resolve(&subscription.strategy) {
                Ok(strategy) => strategy,
                Err(e) => {
                    warn!("Skipping {} for client {}: {}", subscription, client_id, e);
                    report.unknown_strategies += 1;
                    continue;
                }
            };

            let sink = self.sink.clone();
            tasks.spawn(async move {
                let outcome = AssertUnwindSafe(strategy.evaluate(&subscription.symbol))
                    .catch_unwind()
                    .await;

                let message = match outcome {
                    Ok(Ok(signal)) => SignalMessage::signal(&subscription, signal),
                    Ok(Err(e)) => {
                        error!("Evaluation of {} failed: {}", subscription, e);
                        SignalMessage::error(&subscription, e.to_string())
                    }
                    Err(panic) => {
                        let reason = panic_message(panic.as_ref());
                        error!("Evaluation of {} panicked: {}", subscription, reason);
                        SignalMessage::error(&subscription, reason)
                    }
                };

                deliver(sink.as_ref(), client_id, &subscription, message).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Delivery::Signal) => report.signals += 1,
                Ok(Delivery::Error) => report.errors += 1,
                Ok(Delivery::Undelivered) => report.undelivered += 1,
                // Panics are caught inside the task; only cancellation lands here
                Err(e) => error!("Evaluation task did not complete: {}", e),
            }
        }

        self.metrics.record_tick(&report);
        debug!("Tick complete: {:?}", report);
        report
    }
}

async fn deliver(
    sink: &dyn SignalSink,
    client_id: ClientId,
    subscription: &Subscription,
    message: SignalMessage,
) -> Delivery {
    let kind = if message.is_error() {
        Delivery::Error
    } else {
        Delivery::Signal
    };

    match sink.deliver(client_id, ServerMessage::Signal(message)).await {
        Ok(()) => {
            debug!("Delivered {} to client {}", subscription, client_id);
            kind
        }
        Err(e) => {
            debug!("Dropped {} for client {}: {}", subscription, client_id, e);
            Delivery::Undelivered
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("Evaluation panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("Evaluation panicked: {}", message)
    } else {
        "Evaluation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use pulse_strategies::testing::MockStrategy;
    use pulse_types::Signal;

    fn scheduler(strategies: StrategyRegistry) -> (Arc<SubscriptionRegistry>, Arc<RecordingSink>, PollingScheduler) {
        let registry = Arc::new(SubscriptionRegistry::new());
        let sink = Arc::new(RecordingSink::new());
        let scheduler = PollingScheduler::new(
            registry.clone(),
            Arc::new(strategies),
            sink.clone(),
            Duration::from_secs(60),
        );
        (registry, sink, scheduler)
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("bad bar");
        assert_eq!(panic_message(boxed.as_ref()), "Evaluation panicked: bad bar");

        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "Evaluation panicked");
    }

    #[tokio::test]
    async fn test_empty_registry_ticks_cleanly() {
        let (_, sink, scheduler) = scheduler(StrategyRegistry::new());

        assert_eq!(scheduler.run_tick().await, TickReport::default());
        assert!(sink.messages().is_empty());
        assert_eq!(scheduler.metrics().snapshot().ticks, 1);
    }

    #[tokio::test]
    async fn test_one_message_per_subscription() {
        let mut strategies = StrategyRegistry::new();
        strategies.register(Arc::new(MockStrategy::returning("momentum", Signal::Buy)));
        let (registry, sink, scheduler) = scheduler(strategies);

        let client = ClientId::new();
        registry.connect(client);
        registry.subscribe(client, Subscription::new("AAPL", "momentum")).unwrap();
        registry.subscribe(client, Subscription::new("MSFT", "momentum")).unwrap();

        let report = scheduler.run_tick().await;
        assert_eq!(report.pairs, 2);
        assert_eq!(report.signals, 2);
        assert_eq!(sink.messages_for(client).len(), 2);
    }
}

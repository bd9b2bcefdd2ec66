//! # Pulse Signal Server
//!
//! Streams strategy signals to WebSocket clients on a fixed cadence.
//!
//! ```text
//! client ──subscribe──▶ SubscriptionRegistry ◀──snapshot── PollingScheduler
//!                                                             │ per pair
//!                                                             ▼
//! client ◀──ServerMessage── ClientManager (SignalSink) ◀── SignalStrategy::evaluate
//! ```
//!
//! The scheduler only depends on the [`SignalSink`] trait, so the WebSocket
//! transport in [`server`] is one delivery mechanism among others.

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod registry;
pub mod scheduler;
pub mod server;
pub mod sink;
pub mod testing;

pub use client::{Client, ClientManager};
pub use config::{load_config, SchedulerConfig, ServerConfig};
pub use error::{Result, ServerError};
pub use metrics::{MetricsSnapshot, SchedulerMetrics, TickReport};
pub use protocol::{ClientRequest, ServerMessage, SignalMessage};
pub use registry::SubscriptionRegistry;
pub use scheduler::PollingScheduler;
pub use server::SignalServer;
pub use sink::SignalSink;

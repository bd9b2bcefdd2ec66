//! JSON frames exchanged with WebSocket clients

use crate::error::Result;
use chrono::{DateTime, Utc};
use pulse_types::{SignalResult, Subscription};
use serde::{Deserialize, Serialize};

/// Inbound frame: `{"event":"subscribe","symbol":"AAPL","strategy":"combined"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ClientRequest {
    Subscribe { symbol: String, strategy: String },
    Unsubscribe { symbol: String, strategy: String },
}

impl ClientRequest {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn subscription(&self) -> Subscription {
        match self {
            ClientRequest::Subscribe { symbol, strategy }
            | ClientRequest::Unsubscribe { symbol, strategy } => {
                Subscription::new(symbol.clone(), strategy.clone())
            }
        }
    }
}

/// Outcome of one (symbol, strategy) evaluation. Exactly one of `signal`
/// and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalMessage {
    pub symbol: String,
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignalMessage {
    pub fn signal(subscription: &Subscription, signal: SignalResult) -> Self {
        Self {
            symbol: subscription.symbol.clone(),
            strategy: subscription.strategy.clone(),
            signal: Some(signal),
            error: None,
        }
    }

    pub fn error(subscription: &Subscription, error: impl Into<String>) -> Self {
        Self {
            symbol: subscription.symbol.clone(),
            strategy: subscription.strategy.clone(),
            signal: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outbound frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ServerMessage {
    Signal(SignalMessage),
    Heartbeat {
        timestamp: DateTime<Utc>,
        client_count: usize,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn heartbeat(client_count: usize) -> Self {
        ServerMessage::Heartbeat {
            timestamp: Utc::now(),
            client_count,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<SignalMessage> for ServerMessage {
    fn from(message: SignalMessage) -> Self {
        ServerMessage::Signal(message)
    }
}

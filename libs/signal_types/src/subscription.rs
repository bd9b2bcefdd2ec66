//! Client identities and their standing signal subscriptions

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity assigned to a connection for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ClientId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A standing request for recurring signals on one (symbol, strategy) pair.
///
/// Equality is on both fields, which is what makes subscribe idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub symbol: String,
    pub strategy: String,
}

impl Subscription {
    pub fn new(symbol: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            strategy: strategy.into(),
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.symbol, self.strategy)
    }
}

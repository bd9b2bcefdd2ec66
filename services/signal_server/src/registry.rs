//! Per-client subscription sets

use crate::error::{Result, ServerError};
use parking_lot::RwLock;
use pulse_types::{ClientId, Subscription};
use std::collections::HashMap;
use tracing::debug;

/// Standing (symbol, strategy) subscriptions of every connected client.
///
/// Shared between connection handlers, which mutate it, and the scheduler,
/// which takes a [`snapshot`](Self::snapshot) at the start of each tick.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    clients: RwLock<HashMap<ClientId, Vec<Subscription>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a client with an empty subscription set
    pub fn connect(&self, client_id: ClientId) {
        self.clients.write().entry(client_id).or_default();
        debug!("Registered client {}", client_id);
    }

    /// Forget a client and all of its subscriptions
    pub fn disconnect(&self, client_id: ClientId) -> usize {
        let removed = self
            .clients
            .write()
            .remove(&client_id)
            .map(|subs| subs.len())
            .unwrap_or(0);
        debug!("Dropped client {} with {} subscriptions", client_id, removed);
        removed
    }

    /// Add `subscription` unless already present. Returns whether it was added.
    pub fn subscribe(&self, client_id: ClientId, subscription: Subscription) -> Result<bool> {
        let mut clients = self.clients.write();
        let subs = clients
            .get_mut(&client_id)
            .ok_or(ServerError::UnknownClient(client_id))?;

        if subs.contains(&subscription) {
            return Ok(false);
        }
        subs.push(subscription);
        Ok(true)
    }

    /// Remove the exact match if present. Returns whether anything was removed.
    pub fn unsubscribe(&self, client_id: ClientId, subscription: &Subscription) -> bool {
        let mut clients = self.clients.write();
        let Some(subs) = clients.get_mut(&client_id) else {
            return false;
        };

        let before = subs.len();
        subs.retain(|s| s != subscription);
        subs.len() != before
    }

    pub fn subscriptions(&self, client_id: ClientId) -> Vec<Subscription> {
        self.clients
            .read()
            .get(&client_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every (client, subscription) pair at this instant
    pub fn snapshot(&self) -> Vec<(ClientId, Subscription)> {
        self.clients
            .read()
            .iter()
            .flat_map(|(id, subs)| subs.iter().map(move |s| (*id, s.clone())))
            .collect()
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    pub fn subscription_count(&self) -> usize {
        self.clients.read().values().map(Vec::len).sum()
    }
}

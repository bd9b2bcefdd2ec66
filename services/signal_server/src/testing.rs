//! Testing utilities for the scheduler and transports

use crate::error::{Result, ServerError};
use crate::protocol::{ServerMessage, SignalMessage};
use crate::sink::SignalSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use pulse_types::ClientId;
use std::collections::HashSet;

/// Sink that records every delivery in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<(ClientId, ServerMessage)>>,
    refused: Mutex<HashSet<ClientId>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to `client_id` fail, as if the client had gone away
    pub fn refuse(&self, client_id: ClientId) {
        self.refused.lock().insert(client_id);
    }

    pub fn messages(&self) -> Vec<(ClientId, ServerMessage)> {
        self.delivered.lock().clone()
    }

    pub fn messages_for(&self, client_id: ClientId) -> Vec<ServerMessage> {
        self.delivered
            .lock()
            .iter()
            .filter(|(id, _)| *id == client_id)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Signal frames for `client_id`, in arrival order
    pub fn signals_for(&self, client_id: ClientId) -> Vec<SignalMessage> {
        self.messages_for(client_id)
            .into_iter()
            .filter_map(|message| match message {
                ServerMessage::Signal(signal) => Some(signal),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.delivered.lock().clear();
    }
}

#[async_trait]
impl SignalSink for RecordingSink {
    async fn deliver(&self, client_id: ClientId, message: ServerMessage) -> Result<()> {
        if self.refused.lock().contains(&client_id) {
            return Err(ServerError::UnknownClient(client_id));
        }
        self.delivered.lock().push((client_id, message));
        Ok(())
    }
}

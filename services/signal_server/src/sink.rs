//! Delivery seam between the scheduler and a transport

use crate::error::Result;
use crate::protocol::ServerMessage;
use async_trait::async_trait;
use pulse_types::ClientId;
use std::sync::Arc;

/// Best-effort delivery of a message to one client. There is no
/// acknowledgement; an `Err` only means the message could not be handed off.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn deliver(&self, client_id: ClientId, message: ServerMessage) -> Result<()>;
}

#[async_trait]
impl<S: SignalSink + ?Sized> SignalSink for Arc<S> {
    async fn deliver(&self, client_id: ClientId, message: ServerMessage) -> Result<()> {
        (**self).deliver(client_id, message).await
    }
}

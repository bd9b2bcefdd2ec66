//! WebSocket client management

use crate::error::{Result, ServerError};
use crate::protocol::ServerMessage;
use crate::sink::SignalSink;
use async_trait::async_trait;
use pulse_types::ClientId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

/// Connected WebSocket client; messages are queued here and written to the
/// socket by the connection task.
pub struct Client {
    pub id: ClientId,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Client {
    pub fn new(sender: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            id: ClientId::new(),
            sender,
        }
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<()> {
        self.sender.send(message).map_err(|_| ServerError::Client {
            message: format!("Failed to send message to client {}", self.id),
        })
    }
}

/// Manages all connected WebSocket clients
pub struct ClientManager {
    clients: Arc<RwLock<HashMap<ClientId, Client>>>,
    max_connections: usize,
}

impl ClientManager {
    pub fn new(max_connections: usize) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            max_connections,
        }
    }

    pub async fn add_client(&self, client: Client) -> Result<()> {
        let mut clients = self.clients.write().await;

        if clients.len() >= self.max_connections {
            return Err(ServerError::Client {
                message: "Maximum connections reached".to_string(),
            });
        }

        let client_id = client.id;
        clients.insert(client_id, client);

        info!(
            "Added client {}, total connections: {}",
            client_id,
            clients.len()
        );
        Ok(())
    }

    pub async fn remove_client(&self, client_id: ClientId) {
        let mut clients = self.clients.write().await;
        if clients.remove(&client_id).is_some() {
            info!(
                "Removed client {}, total connections: {}",
                client_id,
                clients.len()
            );
        }
    }

    /// Queue a message for one client
    pub async fn send_to(&self, client_id: ClientId, message: ServerMessage) -> Result<()> {
        let clients = self.clients.read().await;
        let client = clients
            .get(&client_id)
            .ok_or(ServerError::UnknownClient(client_id))?;
        client.send_message(message)
    }

    /// Send a message to every connected client, dropping the ones whose
    /// connection task has gone away
    pub async fn broadcast(&self, message: ServerMessage) {
        let clients = self.clients.read().await;
        let mut failed_clients = Vec::new();

        for (client_id, client) in clients.iter() {
            if client.send_message(message.clone()).is_err() {
                failed_clients.push(*client_id);
            }
        }

        drop(clients);

        if !failed_clients.is_empty() {
            let mut clients = self.clients.write().await;
            for client_id in failed_clients {
                clients.remove(&client_id);
                debug!("Removed disconnected client {}", client_id);
            }
        }
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

#[async_trait]
impl SignalSink for ClientManager {
    async fn deliver(&self, client_id: ClientId, message: ServerMessage) -> Result<()> {
        self.send_to(client_id, message).await
    }
}

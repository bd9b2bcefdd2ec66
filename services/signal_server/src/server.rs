//! WebSocket signal server

use crate::client::{Client, ClientManager};
use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::protocol::{ClientRequest, ServerMessage};
use crate::registry::SubscriptionRegistry;
use crate::scheduler::PollingScheduler;
use futures_util::{SinkExt, StreamExt};
use pulse_strategies::StrategyRegistry;
use pulse_types::ClientId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};
use warp::ws::{Message, WebSocket};
use warp::Filter;

pub const BANNER: &str = "Stock Signal WebSocket Server Running";

pub struct SignalServer {
    config: ServerConfig,
    client_manager: Arc<ClientManager>,
    registry: Arc<SubscriptionRegistry>,
    scheduler: PollingScheduler,
}

impl SignalServer {
    pub fn new(config: ServerConfig, strategies: StrategyRegistry) -> Self {
        let client_manager = Arc::new(ClientManager::new(config.max_connections));
        let registry = Arc::new(SubscriptionRegistry::new());
        let scheduler = PollingScheduler::new(
            registry.clone(),
            Arc::new(strategies),
            client_manager.clone(),
            config.scheduler.tick_interval(),
        );

        Self {
            config,
            client_manager,
            registry,
            scheduler,
        }
    }

    pub fn client_manager(&self) -> Arc<ClientManager> {
        self.client_manager.clone()
    }

    pub fn registry(&self) -> Arc<SubscriptionRegistry> {
        self.registry.clone()
    }

    pub fn scheduler(&self) -> &PollingScheduler {
        &self.scheduler
    }

    /// Run the scheduler, heartbeat and HTTP/WebSocket listener until one of them stops
    pub async fn start(&self) -> Result<()> {
        info!("🚀 Starting Signal WebSocket Server");
        debug!("Configuration: {:?}", self.config);

        let scheduler_handle = tokio::spawn(self.scheduler.clone().run());
        let heartbeat_handle = self.start_heartbeat_task();
        let server_handle = self.start_websocket_server()?;

        info!("✅ Signal server started successfully");

        tokio::select! {
            result = scheduler_handle => {
                if let Err(e) = result {
                    error!("Scheduler task failed: {}", e);
                }
            }
            result = heartbeat_handle => {
                if let Err(e) = result {
                    error!("Heartbeat task failed: {}", e);
                }
            }
            result = server_handle => {
                if let Err(e) = result {
                    error!("WebSocket server failed: {}", e);
                }
            }
        }

        Ok(())
    }

    /// HTTP and WebSocket routes, without CORS
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let client_manager = self.client_manager.clone();
        let registry = self.registry.clone();

        let ws_handler = move |ws: warp::ws::Ws| {
            let client_manager = client_manager.clone();
            let registry = registry.clone();
            async move {
                Ok::<_, warp::Rejection>(ws.on_upgrade(move |socket| {
                    Self::handle_websocket_connection(client_manager, registry, socket)
                }))
            }
        };

        let ws_route = warp::path("ws")
            .and(warp::path::end())
            .and(warp::ws())
            .and_then(ws_handler.clone());
        // Alias kept for dashboards that connect to /stream
        let ws_stream_route = warp::path("stream")
            .and(warp::path::end())
            .and(warp::ws())
            .and_then(ws_handler);

        let index_route = warp::get().and(warp::path::end()).map(|| BANNER);

        let health_route = warp::path("health")
            .and(warp::path::end())
            .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

        let registry = self.registry.clone();
        let metrics = self.scheduler.metrics();
        let status_route = warp::path("status").and(warp::path::end()).map(move || {
            warp::reply::json(&serde_json::json!({
                "status": "running",
                "service": "pulse-signal-server",
                "version": env!("CARGO_PKG_VERSION"),
                "clients": registry.client_count(),
                "subscriptions": registry.subscription_count(),
                "scheduler": metrics.snapshot(),
            }))
        });

        ws_route
            .or(ws_stream_route)
            .or(index_route)
            .or(health_route)
            .or(status_route)
    }

    fn start_websocket_server(&self) -> Result<tokio::task::JoinHandle<()>> {
        let addr = self.config.socket_addr()?;
        let routes = self.routes();
        let bind_error = |e: warp::Error| ServerError::Bind {
            addr,
            message: e.to_string(),
        };

        let handle = if self.config.enable_cors {
            let (bound, server) = warp::serve(routes.with(warp::cors().allow_any_origin()))
                .try_bind_ephemeral(addr)
                .map_err(bind_error)?;
            info!("📡 Listening on {}", bound);
            tokio::spawn(server)
        } else {
            let (bound, server) = warp::serve(routes)
                .try_bind_ephemeral(addr)
                .map_err(bind_error)?;
            info!("📡 Listening on {}", bound);
            tokio::spawn(server)
        };

        Ok(handle)
    }

    async fn handle_websocket_connection(
        client_manager: Arc<ClientManager>,
        registry: Arc<SubscriptionRegistry>,
        ws: WebSocket,
    ) {
        info!("New WebSocket connection established");

        if let Err(e) = Self::handle_client_connection(client_manager, registry, ws).await {
            warn!("WebSocket connection error: {}", e);
        }
    }

    async fn handle_client_connection(
        client_manager: Arc<ClientManager>,
        registry: Arc<SubscriptionRegistry>,
        ws: WebSocket,
    ) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
        let client = Client::new(tx);
        let client_id = client.id;

        client_manager.add_client(client).await?;
        registry.connect(client_id);

        let (mut ws_sender, mut ws_receiver) = ws.split();

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    match msg {
                        Some(message) => {
                            let json_str = match message.to_json() {
                                Ok(s) => s,
                                Err(e) => {
                                    error!("Failed to serialize message: {}", e);
                                    continue;
                                }
                            };

                            if let Err(e) = ws_sender.send(Message::text(json_str)).await {
                                warn!("Failed to send message to client {}: {}", client_id, e);
                                break;
                            }
                        }
                        None => {
                            info!("Message channel closed for client {}", client_id);
                            break;
                        }
                    }
                }

                ws_msg = ws_receiver.next() => {
                    match ws_msg {
                        Some(Ok(msg)) => {
                            if msg.is_close() {
                                info!("Client {} disconnected", client_id);
                                break;
                            }
                            let Ok(text) = msg.to_str() else {
                                continue;
                            };

                            if let Some(reply) = Self::handle_request(&registry, client_id, text) {
                                if let Err(e) = client_manager.send_to(client_id, reply).await {
                                    warn!("Failed to reply to client {}: {}", client_id, e);
                                    break;
                                }
                            }
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error for client {}: {}", client_id, e);
                            break;
                        }
                        None => {
                            info!("WebSocket stream closed for client {}", client_id);
                            break;
                        }
                    }
                }
            }
        }

        client_manager.remove_client(client_id).await;
        let dropped = registry.disconnect(client_id);
        debug!(
            "Cleaned up client {} ({} subscriptions dropped)",
            client_id, dropped
        );

        Ok(())
    }

    /// Apply one inbound text frame; returns a frame to send back, if any
    fn handle_request(
        registry: &SubscriptionRegistry,
        client_id: ClientId,
        text: &str,
    ) -> Option<ServerMessage> {
        let request = match ClientRequest::parse(text) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected frame from client {}: {}", client_id, e);
                return Some(ServerMessage::error(format!("Invalid request: {}", e)));
            }
        };

        let subscription = request.subscription();
        match request {
            ClientRequest::Subscribe { .. } => match registry.subscribe(client_id, subscription.clone()) {
                Ok(added) => {
                    info!(
                        "Client {} subscribed to {}{}",
                        client_id,
                        subscription,
                        if added { "" } else { " (already active)" }
                    );
                    None
                }
                Err(e) => Some(ServerMessage::error(e.to_string())),
            },
            ClientRequest::Unsubscribe { .. } => {
                if registry.unsubscribe(client_id, &subscription) {
                    info!("Client {} unsubscribed from {}", client_id, subscription);
                }
                None
            }
        }
    }

    fn start_heartbeat_task(&self) -> tokio::task::JoinHandle<()> {
        let client_manager = self.client_manager.clone();
        let interval_secs = self.config.heartbeat_interval_secs;

        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(interval_secs));

            loop {
                interval.tick().await;

                let client_count = client_manager.client_count().await;
                client_manager
                    .broadcast(ServerMessage::heartbeat(client_count))
                    .await;
                debug!("💓 Sent heartbeat to {} clients", client_count);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_types::Subscription;

    fn server() -> SignalServer {
        SignalServer::new(ServerConfig::default(), StrategyRegistry::new())
    }

    #[tokio::test]
    async fn test_signal_server_creation() {
        let server = server();
        assert_eq!(server.client_manager.client_count().await, 0);
        assert_eq!(server.registry.client_count(), 0);
        assert_eq!(server.scheduler.period(), Duration::from_secs(60));
    }

    #[test]
    fn test_handle_request() {
        let registry = SubscriptionRegistry::new();
        let client = ClientId::new();
        registry.connect(client);

        let subscribe = r#"{"event":"subscribe","symbol":"AAPL","strategy":"adx"}"#;
        assert_eq!(SignalServer::handle_request(&registry, client, subscribe), None);
        assert_eq!(SignalServer::handle_request(&registry, client, subscribe), None);
        assert_eq!(registry.subscriptions(client), vec![Subscription::new("AAPL", "adx")]);

        let unsubscribe = r#"{"event":"unsubscribe","symbol":"AAPL","strategy":"adx"}"#;
        assert_eq!(SignalServer::handle_request(&registry, client, unsubscribe), None);
        assert!(registry.subscriptions(client).is_empty());

        match SignalServer::handle_request(&registry, client, "{oops") {
            Some(ServerMessage::Error { message }) => assert!(message.starts_with("Invalid request")),
            other => panic!("expected an error frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_routes() {
        let routes = server().routes();

        let index = warp::test::request().path("/").reply(&routes).await;
        assert_eq!(index.status(), 200);
        assert_eq!(index.body(), BANNER);

        let health = warp::test::request().path("/health").reply(&routes).await;
        assert_eq!(health.body(), "OK");

        let status = warp::test::request().path("/status").reply(&routes).await;
        let body: serde_json::Value = serde_json::from_slice(status.body()).unwrap();
        assert_eq!(body["service"], "pulse-signal-server");
        assert_eq!(body["clients"], 0);
        assert_eq!(body["scheduler"]["ticks"], 0);
    }
}

//! Note: This `MulticallServer` is a reference implementation and does not
//! include authentication or authorization. It is best suited for trusted,
//! internal networks, tests, and simulations. Anything that owns a
//! [`MulticallEndpoint`] can act as the remote side; this implementation
//! serves one over WebSockets using Axum.

use axum::{
    Router,
    extract::ConnectInfo,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use muxcall::constants::DEFAULT_WS_PATH;
use muxcall_endpoint::{MulticallEndpoint, MulticallEndpointInterface};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    net::{TcpListener, ToSocketAddrs},
    sync::mpsc,
    time::{Instant, interval_at, sleep},
};

/// The interval at which the server sends Ping messages to the client.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// The maximum time to wait for a message from the client (including Pong)
/// before considering the connection timed out.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct MulticallServerConfig {
    pub heartbeat_interval: Duration,
    /// Idle time after which a client that has sent nothing is dropped.
    pub client_timeout: Duration,
}

impl Default for MulticallServerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: HEARTBEAT_INTERVAL,
            client_timeout: CLIENT_TIMEOUT,
        }
    }
}

/// Per-connection context handed to every read handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionContext {
    pub remote_addr: SocketAddr,
}

/// Serves a [`MulticallEndpoint`] to WebSocket clients.
///
/// Each binary frame received is one aggregated request; the encoded response
/// is sent back as one binary frame.
pub struct MulticallServer {
    endpoint: Arc<MulticallEndpoint<ConnectionContext>>,
    config: MulticallServerConfig,
}

impl Default for MulticallServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MulticallServer {
    pub fn new() -> Self {
        Self::with_endpoint(MulticallEndpoint::new())
    }

    /// Serves a pre-configured endpoint (e.g. one with a custom call limit).
    pub fn with_endpoint(endpoint: MulticallEndpoint<ConnectionContext>) -> Self {
        MulticallServer {
            endpoint: Arc::new(endpoint),
            config: MulticallServerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MulticallServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns an `Arc` clone of the underlying endpoint, for registering
    /// read handlers and moving the block number.
    pub fn endpoint(&self) -> Arc<MulticallEndpoint<ConnectionContext>> {
        self.endpoint.clone()
    }

    /// Binds to an address and starts the server.
    pub async fn serve<A: ToSocketAddrs>(self, addr: A) -> Result<SocketAddr, axum::BoxError> {
        let listener = TcpListener::bind(addr).await?;
        let server = Arc::new(self);
        server.serve_with_listener(listener).await
    }

    /// Starts the server on a specific host and port.
    pub async fn serve_on(self, host: &str, port: u16) -> Result<SocketAddr, axum::BoxError> {
        let addr = format!("{host}:{port}");
        self.serve(addr).await
    }

    /// Starts the server with a pre-bound `TcpListener`.
    ///
    /// This is useful for binding to an ephemeral port (port 0) and then
    /// retrieving the actual address.
    pub async fn serve_with_listener(
        self: Arc<Self>,
        listener: TcpListener,
    ) -> Result<SocketAddr, axum::BoxError> {
        let address = listener.local_addr()?;
        let app = Router::new().route(
            DEFAULT_WS_PATH,
            get({
                let server = self.clone();
                move |ws, conn| Self::ws_handler(ws, conn, server)
            }),
        );
        tracing::info!("Multicall server running on {:?}", address);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(address)
    }

    async fn ws_handler(
        ws: WebSocketUpgrade,
        ConnectInfo(addr): ConnectInfo<SocketAddr>,
        server: Arc<MulticallServer>,
    ) -> impl IntoResponse {
        tracing::info!("Client connected: {}", addr);
        ws.on_upgrade(move |socket| server.handle_socket(socket, addr))
    }

    async fn handle_socket(self: Arc<Self>, socket: WebSocket, addr: SocketAddr) {
        let (sender, receiver) = socket.split();
        let (tx, rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(Self::sender_task(sender, rx));
        tokio::spawn(Self::receiver_task(
            self.endpoint.clone(),
            receiver,
            tx,
            ConnectionContext { remote_addr: addr },
            self.config.clone(),
        ));
    }

    /// Forwards responses and pings to the client until it disconnects.
    async fn sender_task(
        mut sender: SplitSink<WebSocket, Message>,
        mut rx: mpsc::UnboundedReceiver<Message>,
    ) {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    }

    /// Handles all inbound traffic for one client.
    ///
    /// - Sends a Ping every `heartbeat_interval`.
    /// - Drops clients that send nothing for `client_timeout`. The deadline
    ///   only moves when a frame arrives, so outgoing pings never extend it.
    /// - Evaluates each binary frame on its own task, so a slow request does
    ///   not hold up heartbeats or other requests on the same connection.
    async fn receiver_task(
        endpoint: Arc<MulticallEndpoint<ConnectionContext>>,
        mut receiver: SplitStream<WebSocket>,
        tx: mpsc::UnboundedSender<Message>,
        context: ConnectionContext,
        config: MulticallServerConfig,
    ) {
        let addr = context.remote_addr;
        let mut heartbeat = interval_at(
            Instant::now() + config.heartbeat_interval,
            config.heartbeat_interval,
        );
        let idle_deadline = sleep(config.client_timeout);
        tokio::pin!(idle_deadline);

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if tx.send(Message::Ping(Bytes::new())).is_err() {
                        tracing::info!("Client {} disconnected (failed to send ping).", addr);
                        break;
                    }
                }

                _ = &mut idle_deadline => {
                    tracing::warn!("Client {} timed out. Closing connection.", addr);
                    let _ = tx.send(Message::Close(None));
                    break;
                }

                next = receiver.next() => {
                    idle_deadline
                        .as_mut()
                        .reset(Instant::now() + config.client_timeout);

                    match next {
                        Some(Ok(Message::Binary(bytes))) => {
                            tokio::spawn(Self::respond(
                                endpoint.clone(),
                                context,
                                bytes,
                                tx.clone(),
                            ));
                        }
                        Some(Ok(Message::Pong(_))) => {
                            tracing::trace!("Received pong from {}", addr);
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Client {} initiated close.", addr);
                            break;
                        }
                        Some(Ok(_)) => {}
                        None | Some(Err(_)) => {
                            tracing::info!("Client {} disconnected.", addr);
                            break;
                        }
                    }
                }
            }
        }
        tracing::info!("Terminated connection for {}.", addr);
    }

    async fn respond(
        endpoint: Arc<MulticallEndpoint<ConnectionContext>>,
        context: ConnectionContext,
        bytes: Bytes,
        tx: mpsc::UnboundedSender<Message>,
    ) {
        match endpoint.read_bytes(context, &bytes).await {
            Ok(response) => {
                let _ = tx.send(Message::Binary(Bytes::from(response)));
            }
            Err(err) => {
                tracing::error!(
                    "Error processing bytes from {}: {}",
                    context.remote_addr,
                    err
                );
            }
        }
    }
}

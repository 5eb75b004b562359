use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use muxcall::constants::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_WS_PATH};
use muxcall::utils::increment_u32_id;
use muxcall::wire::{AggregateOutcome, AggregateRequest, MulticallMessage};
use muxcall::{EncodedCall, RawResponse, RemoteCallExecutor};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message as WsMessage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone)]
pub struct MulticallClientConfig {
    /// How long `aggregate` waits for the matching response.
    pub request_timeout: Duration,
}

impl Default for MulticallClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

type PendingRequests = Arc<Mutex<HashMap<u32, oneshot::Sender<AggregateOutcome>>>>;
type StateChangeHandler = Arc<Mutex<Option<Box<dyn Fn(TransportState) + Send + Sync>>>>;

/// WebSocket client for a `MulticallServer`.
///
/// Several batches may be in flight on one connection; responses are matched
/// to requests by `request_id`. The client never retries.
pub struct MulticallClient {
    tx: mpsc::UnboundedSender<WsMessage>,
    pending: PendingRequests,
    config: MulticallClientConfig,
    is_connected: Arc<AtomicBool>,
    state_change_handler: StateChangeHandler,
    task_handles: Vec<JoinHandle<()>>,
}

impl MulticallClient {
    pub async fn new(host: &str, port: u16) -> Result<Self, io::Error> {
        Self::with_config(host, port, MulticallClientConfig::default()).await
    }

    pub async fn with_config(
        host: &str,
        port: u16,
        config: MulticallClientConfig,
    ) -> Result<Self, io::Error> {
        let websocket_url = format!("ws://{host}:{port}{DEFAULT_WS_PATH}");
        let (ws_stream, _) = connect_async(websocket_url.as_str())
            .await
            .map_err(|err| match err {
                tungstenite::Error::Io(io_err) => io_err,
                other => io::Error::other(other),
            })?;

        tracing::info!("Connected to multicall server at {}", websocket_url);

        let (mut sender, mut receiver) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

        let pending: PendingRequests = Arc::new(Mutex::new(HashMap::new()));
        let is_connected = Arc::new(AtomicBool::new(true));
        let state_change_handler: StateChangeHandler = Arc::new(Mutex::new(None));

        // Send loop
        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if sender.send(msg).await.is_err() {
                    break;
                }
            }
        });

        // Receive loop
        let recv_task = tokio::spawn({
            let pending = pending.clone();
            let is_connected = is_connected.clone();
            let state_change_handler = state_change_handler.clone();

            async move {
                while let Some(msg) = receiver.next().await {
                    match msg {
                        Ok(WsMessage::Binary(bytes)) => Self::handle_response(&pending, &bytes),
                        Ok(WsMessage::Close(_)) | Err(_) => break,
                        Ok(_) => {}
                    }
                }

                tracing::info!("Multicall connection closed");
                Self::mark_disconnected(&is_connected, &state_change_handler);
                // Dropping the senders fails every request still in flight.
                // Must run after the flag flips; `aggregate` relies on it.
                lock(&pending).clear();
            }
        });

        Ok(MulticallClient {
            tx,
            pending,
            config,
            is_connected,
            state_change_handler,
            task_handles: vec![send_task, recv_task],
        })
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    /// Registers a callback for connection state changes. If the client is
    /// connected, the callback is invoked immediately with `Connected`.
    pub fn set_state_change_handler(
        &self,
        handler: impl Fn(TransportState) + Send + Sync + 'static,
    ) {
        let mut slot = lock(&self.state_change_handler);
        if self.is_connected() {
            handler(TransportState::Connected);
        }
        *slot = Some(Box::new(handler));
    }

    fn handle_response(pending: &PendingRequests, bytes: &[u8]) {
        let response = match MulticallMessage::decode(bytes) {
            Ok(MulticallMessage::Response(response)) => response,
            Ok(MulticallMessage::Request(_)) => {
                tracing::warn!("Ignoring request message received by client");
                return;
            }
            Err(err) => {
                tracing::warn!("Discarding undecodable message: {}", err);
                return;
            }
        };

        match lock(pending).remove(&response.request_id) {
            Some(done_tx) => {
                let _ = done_tx.send(response.outcome);
            }
            None => {
                // The caller timed out or went away.
                tracing::debug!("No pending request for id {}", response.request_id);
            }
        }
    }

    fn mark_disconnected(is_connected: &AtomicBool, state_change_handler: &StateChangeHandler) {
        if is_connected.swap(false, Ordering::SeqCst) {
            if let Some(handler) = lock(state_change_handler).as_ref() {
                handler(TransportState::Disconnected);
            }
        }
    }
}

impl Drop for MulticallClient {
    fn drop(&mut self) {
        for handle in &self.task_handles {
            handle.abort();
        }
        Self::mark_disconnected(&self.is_connected, &self.state_change_handler);
        lock(&self.pending).clear();
    }
}

#[async_trait::async_trait]
impl RemoteCallExecutor for MulticallClient {
    async fn aggregate(&self, calls: Vec<EncodedCall>) -> Result<RawResponse, io::Error> {
        let request_id = increment_u32_id();
        let (done_tx, done_rx) = oneshot::channel();

        // The receive loop flags the disconnect before it clears `pending`, so
        // checking under the same lock means an entry is either cleared later
        // or never inserted.
        {
            let mut pending = lock(&self.pending);
            if !self.is_connected() {
                return Err(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "multicall client is disconnected",
                ));
            }
            pending.insert(request_id, done_tx);
        }

        // Removes the pending entry however this future ends, including when
        // it is dropped mid-flight.
        let _guard = PendingRequestGuard {
            pending: &self.pending,
            request_id,
        };

        let call_count = calls.len();
        let bytes = MulticallMessage::Request(AggregateRequest { request_id, calls }).encode();
        if self.tx.send(WsMessage::Binary(Bytes::from(bytes))).is_err() {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "multicall connection closed before the request was sent",
            ));
        }

        tracing::debug!(
            "Sent aggregated request {} with {} calls",
            request_id,
            call_count
        );

        match tokio::time::timeout(self.config.request_timeout, done_rx).await {
            Err(_) => {
                tracing::warn!(
                    "Aggregated request {} timed out after {:?}",
                    request_id,
                    self.config.request_timeout
                );
                Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("aggregated request {request_id} timed out"),
                ))
            }
            Ok(Err(_)) => Err(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "multicall connection closed before the response arrived",
            )),
            Ok(Ok(AggregateOutcome::Completed(response))) => Ok(response),
            Ok(Ok(AggregateOutcome::Rejected(reason))) => Err(io::Error::other(format!(
                "aggregated request rejected: {reason}"
            ))),
        }
    }
}

struct PendingRequestGuard<'a> {
    pending: &'a PendingRequests,
    request_id: u32,
}

impl Drop for PendingRequestGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.request_id);
    }
}

// Critical sections never panic midway, so a poisoned map is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

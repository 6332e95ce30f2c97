//! CDP WebSocket connection
//!
//! One socket per target. Commands are correlated with their responses by id;
//! events are read and dropped.

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::types::{CdpRequest, CdpRpcResponse};
use crate::{Error, Result};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type PendingMap = Arc<Mutex<HashMap<u64, PendingCommand>>>;

/// Per-command timeouts
#[derive(Debug, Clone)]
struct CommandTimeouts {
    default_timeout_secs: u64,
    navigation_timeout_secs: u64,
}

impl Default for CommandTimeouts {
    fn default() -> Self {
        Self {
            default_timeout_secs: 30,
            navigation_timeout_secs: 60,
        }
    }
}

impl CommandTimeouts {
    fn for_method(&self, method: &str) -> tokio::time::Duration {
        let method = method.to_lowercase();
        if method.contains("navigate") || method.contains("reload") {
            tokio::time::Duration::from_secs(self.navigation_timeout_secs)
        } else {
            tokio::time::Duration::from_secs(self.default_timeout_secs)
        }
    }
}

#[derive(Debug)]
struct PendingCommand {
    sender: oneshot::Sender<CdpRpcResponse>,
    method: String,
}

/// CDP WebSocket connection to a single target
pub struct DevToolsConnection {
    url: String,
    sink: Mutex<WsSink>,
    next_id: AtomicU64,
    pending: PendingMap,
    is_active: Arc<AtomicBool>,
    timeouts: CommandTimeouts,
}

impl fmt::Debug for DevToolsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevToolsConnection")
            .field("url", &self.url)
            .field("is_active", &self.is_active.load(Ordering::SeqCst))
            .finish()
    }
}

impl DevToolsConnection {
    /// Open a WebSocket to a target
    ///
    /// # Arguments
    /// * `url` - WebSocket URL (e.g., "ws://localhost:9222/devtools/page/ABC123")
    pub async fn connect<S: Into<String>>(url: S) -> Result<Arc<Self>> {
        let url = url.into();
        info!("Connecting to DevTools target {}", url);

        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::websocket(format!("Failed to connect to {}: {}", url, e)))?;
        let (sink, mut source) = stream.split();

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let is_active = Arc::new(AtomicBool::new(true));

        let reader_pending = Arc::clone(&pending);
        let reader_active = Arc::clone(&is_active);
        let reader_url = url.clone();
        tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => Self::dispatch(&text, &reader_pending).await,
                    Ok(Message::Close(_)) => {
                        info!("DevTools target {} closed the socket", reader_url);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("DevTools socket {} failed: {}", reader_url, e);
                        break;
                    }
                }
            }
            reader_active.store(false, Ordering::SeqCst);
            // Dropping the senders wakes every waiter with a closed channel.
            reader_pending.lock().await.clear();
        });

        Ok(Arc::new(Self {
            url,
            sink: Mutex::new(sink),
            next_id: AtomicU64::new(1),
            pending,
            is_active,
            timeouts: CommandTimeouts::default(),
        }))
    }

    async fn dispatch(text: &str, pending: &PendingMap) {
        match serde_json::from_str::<CdpRpcResponse>(text) {
            Ok(response) => match pending.lock().await.remove(&response.id) {
                Some(command) => {
                    debug!("Response for command {} ({})", response.id, command.method);
                    let _ = command.sender.send(response);
                }
                None => warn!("Received response for unknown command ID: {}", response.id),
            },
            Err(_) => debug!("Ignoring DevTools event: {}", text),
        }
    }

    /// Send a command and wait for its result
    pub async fn send_command(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        if !self.is_active() {
            return Err(Error::websocket("Connection is not active"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: if params.is_null() { None } else { Some(params) },
        };
        let json = serde_json::to_string(&request)?;
        debug!("Sending CDP command {}: {}", id, method);

        let (sender, receiver) = oneshot::channel();
        self.pending.lock().await.insert(
            id,
            PendingCommand {
                sender,
                method: method.to_string(),
            },
        );

        if let Err(e) = self.sink.lock().await.send(Message::Text(json)).await {
            self.pending.lock().await.remove(&id);
            return Err(Error::websocket(format!("Failed to send {}: {}", method, e)));
        }

        match tokio::time::timeout(self.timeouts.for_method(method), receiver).await {
            Ok(Ok(response)) => match response.error {
                Some(error) => Err(Error::cdp(format!(
                    "{}: {} (code: {})",
                    method, error.message, error.code
                ))),
                None => Ok(response.result),
            },
            Ok(Err(_)) => Err(Error::websocket(format!(
                "Connection closed before {} (command {}) completed",
                method, id
            ))),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(Error::timeout(format!("Command {} ({}) timed out", id, method)))
            }
        }
    }

    /// Close the socket
    pub async fn close(&self) -> Result<()> {
        info!("Closing DevTools connection {}", self.url);
        self.is_active.store(false, Ordering::SeqCst);
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(|e| Error::websocket(format!("Failed to close WebSocket: {}", e)))
    }

    /// Check if the socket is still usable
    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}

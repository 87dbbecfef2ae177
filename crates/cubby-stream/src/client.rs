//! WebSocket client for the locker controller event stream.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use cubby_proto::LockerEvent;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::update::StreamUpdate;

/// Per-subscriber channel depth. The runtime drains continuously; a full
/// channel means a stalled subscriber and delivery backpressures on it.
const SUBSCRIBER_CAPACITY: usize = 64;

/// Stream client errors.
#[derive(Debug, Error)]
pub enum StreamError {
    /// `connect` was called while a connection task is already running.
    #[error("stream client already connected")]
    AlreadyConnected,
}

/// Connection parameters and reconnect policy.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Full WebSocket URL, e.g. `ws://controller:8000/ws/locker/1`.
    pub url: String,

    /// Reconnect attempts after an unexpected loss before giving up.
    pub max_reconnect_attempts: u32,

    /// First reconnect delay; doubles per consecutive failed attempt.
    pub base_delay: Duration,

    /// Ceiling for the reconnect delay.
    pub max_delay: Duration,
}

impl StreamConfig {
    /// Config with the default reconnect policy for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_reconnect_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    /// Delay before reconnect attempt `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(5);
        self.base_delay.saturating_mul(1 << exponent).min(self.max_delay)
    }
}

type Subscribers = Arc<Mutex<Vec<mpsc::Sender<StreamUpdate>>>>;

/// How a single connection ended.
enum ConnectionEnd {
    /// `disconnect` was requested.
    Shutdown,
    /// The connection failed or dropped. `was_open` distinguishes a dropped
    /// established connection from a failed connect attempt.
    Lost {
        /// Whether the connection had been successfully opened.
        was_open: bool,
    },
}

/// Client owning the controller connection.
///
/// Created disconnected; [`connect`](Self::connect) spawns the connection
/// task which feeds every registered subscriber. Dropping a subscriber's
/// receiver unsubscribes it; [`disconnect`](Self::disconnect) stops delivery
/// to everyone before tearing the connection down.
pub struct StreamClient {
    config: StreamConfig,
    subscribers: Subscribers,
    shutdown: Option<mpsc::Sender<()>>,
}

impl StreamClient {
    /// Create a disconnected client.
    pub fn new(config: StreamConfig) -> Self {
        Self { config, subscribers: Arc::new(Mutex::new(Vec::new())), shutdown: None }
    }

    /// Register a subscriber. Updates are delivered in arrival order.
    pub fn subscribe(&self) -> mpsc::Receiver<StreamUpdate> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        lock(&self.subscribers).push(tx);
        rx
    }

    /// Spawn the connection task.
    ///
    /// Returns immediately; connectivity is reported to subscribers via
    /// [`StreamUpdate::Opened`] once the handshake completes.
    pub fn connect(&mut self) -> Result<(), StreamError> {
        if self.shutdown.is_some() {
            return Err(StreamError::AlreadyConnected);
        }

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        self.shutdown = Some(shutdown_tx);

        let config = self.config.clone();
        let subscribers = Arc::clone(&self.subscribers);
        tokio::spawn(connection_loop(config, subscribers, shutdown_rx));

        Ok(())
    }

    /// Stop the connection task and all delivery.
    ///
    /// Subscribers are dropped first so no update can arrive mid-teardown;
    /// idempotent.
    pub async fn disconnect(&mut self) {
        lock(&self.subscribers).clear();
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(()).await;
        }
    }
}

fn lock(subscribers: &Subscribers) -> std::sync::MutexGuard<'_, Vec<mpsc::Sender<StreamUpdate>>> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deliver `update` to every live subscriber, pruning closed ones.
async fn broadcast(subscribers: &Subscribers, update: StreamUpdate) {
    let targets: Vec<_> = lock(subscribers).clone();
    for tx in targets {
        let _ = tx.send(update.clone()).await;
    }
    lock(subscribers).retain(|tx| !tx.is_closed());
}

/// Reconnect loop: run one connection, then back off and retry on loss.
///
/// The attempt counter resets once a connection opens, so an outage after a
/// healthy period gets the full retry budget again.
async fn connection_loop(
    config: StreamConfig,
    subscribers: Subscribers,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut attempts: u32 = 0;

    loop {
        match run_connection(&config, &subscribers, &mut shutdown_rx).await {
            ConnectionEnd::Shutdown => break,
            ConnectionEnd::Lost { was_open } => {
                if was_open {
                    attempts = 1;
                    broadcast(&subscribers, StreamUpdate::Lost).await;
                } else {
                    attempts += 1;
                }

                if attempts > config.max_reconnect_attempts {
                    tracing::warn!(
                        attempts = config.max_reconnect_attempts,
                        "stream reconnect attempts exhausted, staying in fallback mode"
                    );
                    broadcast(&subscribers, StreamUpdate::Stopped).await;
                    break;
                }

                let delay = config.backoff_delay(attempts);
                tracing::info!(attempt = attempts, ?delay, "reconnecting to locker stream");

                tokio::select! {
                    () = tokio::time::sleep(delay) => {},
                    _ = shutdown_rx.recv() => break,
                }
            },
        }
    }
}

/// Run a single connection until it ends.
async fn run_connection(
    config: &StreamConfig,
    subscribers: &Subscribers,
    shutdown_rx: &mut mpsc::Receiver<()>,
) -> ConnectionEnd {
    let stream = tokio::select! {
        result = connect_async(config.url.as_str()) => match result {
            Ok((stream, _)) => stream,
            Err(error) => {
                tracing::warn!(%error, url = %config.url, "stream connect failed");
                return ConnectionEnd::Lost { was_open: false };
            },
        },
        _ = shutdown_rx.recv() => return ConnectionEnd::Shutdown,
    };

    tracing::info!(url = %config.url, "locker stream connected");
    broadcast(subscribers, StreamUpdate::Opened).await;

    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => match LockerEvent::decode(text.as_str()) {
                    Ok(event) => broadcast(subscribers, StreamUpdate::Event(event)).await,
                    Err(error) => {
                        tracing::warn!(%error, raw = text.as_str(), "dropping undecodable frame");
                    },
                },
                Some(Ok(Message::Ping(payload))) => {
                    let _ = write.send(Message::Pong(payload)).await;
                },
                Some(Ok(Message::Close(_))) | None => {
                    return ConnectionEnd::Lost { was_open: true };
                },
                Some(Ok(_)) => {},
                Some(Err(error)) => {
                    tracing::warn!(%error, "stream read failed");
                    return ConnectionEnd::Lost { was_open: true };
                },
            },
            _ = shutdown_rx.recv() => {
                let _ = write.send(Message::Close(None)).await;
                return ConnectionEnd::Shutdown;
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let config = StreamConfig::new("ws://localhost:8000/ws/locker/1");

        assert_eq!(config.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(config.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(config.backoff_delay(3), Duration::from_secs(4));
        assert_eq!(config.backoff_delay(5), Duration::from_secs(16));
        // Exponent saturates; the cap holds for any later attempt
        assert_eq!(config.backoff_delay(6), Duration::from_secs(30));
        assert_eq!(config.backoff_delay(60), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn broadcast_reaches_all_subscribers() {
        let client = StreamClient::new(StreamConfig::new("ws://unused"));
        let mut a = client.subscribe();
        let mut b = client.subscribe();

        broadcast(&client.subscribers, StreamUpdate::Opened).await;

        assert_eq!(a.recv().await, Some(StreamUpdate::Opened));
        assert_eq!(b.recv().await, Some(StreamUpdate::Opened));
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned() {
        let client = StreamClient::new(StreamConfig::new("ws://unused"));
        let mut kept = client.subscribe();
        let dropped = client.subscribe();
        drop(dropped);

        broadcast(&client.subscribers, StreamUpdate::Lost).await;

        assert_eq!(kept.recv().await, Some(StreamUpdate::Lost));
        assert_eq!(lock(&client.subscribers).len(), 1);
    }

    #[tokio::test]
    async fn disconnect_stops_delivery() {
        let mut client = StreamClient::new(StreamConfig::new("ws://unused"));
        let mut rx = client.subscribe();

        client.disconnect().await;
        broadcast(&client.subscribers, StreamUpdate::Opened).await;

        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn connect_twice_is_rejected() {
        let mut client = StreamClient::new(StreamConfig::new("ws://127.0.0.1:1/ws/locker/1"));
        client.connect().unwrap();
        assert!(matches!(client.connect(), Err(StreamError::AlreadyConnected)));
        client.disconnect().await;
    }
}

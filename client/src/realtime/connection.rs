// client/src/realtime/connection.rs
//
// The realtime connection manager: one authenticated WebSocket, fan-out of
// incoming events to subscribers, serialized reconnect.
//
// The whole layer is best-effort. Events that arrive while disconnected are
// gone; consumers treat every event as "something changed" and re-fetch
// authoritative state over REST.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};
use tungstenite::Message;

use shared::types::RealtimeEvent;
use shared::types::client_config::AppConfig;

use crate::api::TokenCell;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RealtimeConfig {
    /// WebSocket endpoint without credentials, e.g. `ws://host:8000/ws`.
    pub url: String,
    /// Interval between `"ping"` keep-alive text frames.
    pub keepalive: Duration,
    /// Fixed delay before the single reconnect attempt after a close.
    pub reconnect_delay: Duration,
    /// Broadcast buffer per subscriber.
    pub channel_capacity: usize,
}

impl RealtimeConfig {
    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.server.resolved_ws_url(),
            keepalive: Duration::from_secs(cfg.realtime.keepalive_secs),
            reconnect_delay: Duration::from_secs(cfg.realtime.reconnect_delay_secs),
            channel_capacity: cfg.realtime.channel_capacity,
        }
    }
}

// ---------------------------------------------------------------------------
// Link state
// ---------------------------------------------------------------------------

/// Observable connection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    Connecting,
    Open,
    Closed,
}

/// Reconnect intent, owned by [`Realtime`] under a single mutex.
///
/// The driver task is the only place a reconnect sleep exists, so reconnect
/// attempts are serialized by construction. `disconnect()` flips this to
/// `Stopped` and drops the stop sender, which wakes the driver out of
/// whatever it is doing (connect, read, or the reconnect sleep).
enum Link {
    /// Never connected, or the last driver exited on its own (e.g. the
    /// session token was cleared); `connect()` may start a fresh one.
    Idle,
    /// A driver task owns the connection loop. `generation` identifies that
    /// task so a dying driver only cleans up after itself.
    Running {
        stop: watch::Sender<bool>,
        generation: u64,
    },
    /// Explicitly disconnected; no reconnect until `connect()` again.
    Stopped,
}

struct Shared {
    cfg: RealtimeConfig,
    token: TokenCell,
    link: Mutex<Link>,
    link_generation: AtomicU64,
    events: broadcast::Sender<RealtimeEvent>,
    status: watch::Sender<LinkStatus>,
}

impl Shared {
    fn lock_link(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn owns_link(&self, generation: u64) -> bool {
        matches!(&*self.lock_link(), Link::Running { generation: g, .. } if *g == generation)
    }

    /// Status updates from a driver that no longer owns the link are
    /// discarded, so a lingering task cannot clobber its successor's state.
    fn publish_status(&self, generation: u64, status: LinkStatus) {
        if self.owns_link(generation) {
            let _ = self.status.send(status);
        }
    }

    /// URL with the session token as a query parameter, or `None` when no
    /// token is held (no connection is attempted without one).
    fn connect_url(&self) -> Option<String> {
        let token = self.token.get()?;
        Some(with_token(&self.cfg.url, &token))
    }
}

fn with_token(url: &str, token: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(token.as_bytes()).collect();
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}token={}", url, sep, encoded)
}

// ---------------------------------------------------------------------------
// Realtime
// ---------------------------------------------------------------------------

/// Handle to the realtime layer. Cheap to clone; all clones share one link.
///
/// This is an explicit context object owned by the application root — there
/// is no global connection, and independent instances (separate sessions)
/// can coexist in one process.
#[derive(Clone)]
pub struct Realtime {
    shared: Arc<Shared>,
}

impl Realtime {
    pub fn new(cfg: RealtimeConfig, token: TokenCell) -> Self {
        let (events, _) = broadcast::channel(cfg.channel_capacity);
        let (status, _) = watch::channel(LinkStatus::Closed);
        Self {
            shared: Arc::new(Shared {
                cfg,
                token,
                link: Mutex::new(Link::Idle),
                link_generation: AtomicU64::new(0),
                events,
                status,
            }),
        }
    }

    /// Start the link. Idempotent: a no-op while a driver task is running,
    /// and a no-op when no session token is held (call again after login).
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(&self) {
        let mut link = self.shared.lock_link();
        if matches!(*link, Link::Running { .. }) {
            debug!("realtime connect: already running");
            return;
        }
        if self.shared.token.get().is_none() {
            debug!("realtime connect skipped: no session token");
            return;
        }

        let generation = self.shared.link_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let (stop_tx, stop_rx) = watch::channel(false);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(drive(shared, stop_rx, generation));
        *link = Link::Running {
            stop: stop_tx,
            generation,
        };
        info!("realtime link started");
    }

    /// Stop the link and cancel any pending reconnect. Cancellation is
    /// best-effort: an in-flight send may or may not complete.
    pub fn disconnect(&self) {
        let mut link = self.shared.lock_link();
        if let Link::Running { stop, .. } = std::mem::replace(&mut *link, Link::Stopped) {
            let _ = stop.send(true);
            // The driver no longer owns the link, so the final transition is
            // published here.
            let _ = self.shared.status.send(LinkStatus::Closed);
            info!("realtime link stopped");
        }
    }

    /// Register for every event this connection receives from now on.
    /// Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.shared.events.subscribe(),
        }
    }

    pub fn status(&self) -> LinkStatus {
        *self.shared.status.borrow()
    }

    /// Watch connection-state transitions (Connecting → Open → Closed ...).
    pub fn watch_status(&self) -> watch::Receiver<LinkStatus> {
        self.shared.status.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A registered listener. Each live subscription sees each well-formed
/// event exactly once.
pub struct Subscription {
    rx: broadcast::Receiver<RealtimeEvent>,
}

impl Subscription {
    /// Next event, or `None` once the owning [`Realtime`] is gone.
    ///
    /// A subscriber that falls more than the channel capacity behind skips
    /// the missed events (they are change signals, not state) and continues.
    pub async fn recv(&mut self) -> Option<RealtimeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(ev) => return Some(ev),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("realtime subscriber lagged, skipped {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Driver task
// ---------------------------------------------------------------------------

async fn drive(shared: Arc<Shared>, mut stop: watch::Receiver<bool>, generation: u64) {
    loop {
        let url = match shared.connect_url() {
            Some(url) => url,
            None => {
                debug!("session token cleared; realtime driver exiting");
                break;
            }
        };

        shared.publish_status(generation, LinkStatus::Connecting);
        let attempt = tokio::select! {
            _ = stop.changed() => break,
            attempt = connect_async(url) => attempt,
        };

        match attempt {
            Ok((ws, _response)) => {
                info!("realtime connected: {}", shared.cfg.url);
                shared.publish_status(generation, LinkStatus::Open);
                run_session(&shared, ws, &mut stop).await;
                shared.publish_status(generation, LinkStatus::Closed);
            }
            Err(e) => {
                // Establishment failures are invisible to callers; retry
                // silently on the same fixed delay as a dropped connection.
                shared.publish_status(generation, LinkStatus::Closed);
                debug!("realtime connect failed: {}", e);
            }
        }

        if *stop.borrow() {
            break;
        }

        // Exactly one reconnect timer per close; disconnect() interrupts it.
        tokio::select! {
            _ = stop.changed() => break,
            _ = tokio::time::sleep(shared.cfg.reconnect_delay) => {}
        }
    }

    // Self-initiated exits (cleared token) leave the link re-connectable;
    // on a disconnect() the state is already Stopped and stays that way.
    {
        let mut link = shared.lock_link();
        if matches!(&*link, Link::Running { generation: g, .. } if *g == generation) {
            *link = Link::Idle;
            let _ = shared.status.send(LinkStatus::Closed);
        }
    }
    debug!("realtime driver exited");
}

async fn run_session(shared: &Shared, ws: WsStream, stop: &mut watch::Receiver<bool>) {
    let (mut sink, mut stream): (SplitSink<WsStream, Message>, SplitStream<WsStream>) = ws.split();

    let mut keepalive = tokio::time::interval(shared.cfg.keepalive);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Consume the interval's immediate first tick so the first ping goes
    // out one full interval after open.
    keepalive.tick().await;

    loop {
        tokio::select! {
            _ = stop.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
            _ = keepalive.tick() => {
                trace!("keep-alive ping");
                if let Err(e) = sink.send(Message::Text("ping".to_string())).await {
                    debug!("keep-alive send failed: {}", e);
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(raw))) => match RealtimeEvent::parse(&raw) {
                    Some(ev) => {
                        trace!("event: {}", ev.event);
                        // No receivers is fine; events are fire-and-forget.
                        let _ = shared.events.send(ev);
                    }
                    None => trace!("dropping malformed frame ({} bytes)", raw.len()),
                },
                Some(Ok(Message::Ping(payload))) => {
                    let _ = sink.send(Message::Pong(payload)).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("realtime connection closed by server");
                    break;
                }
                Some(Ok(_)) => {} // binary / pong frames carry nothing for us
                Some(Err(e)) => {
                    debug!("realtime read error: {}", e);
                    break;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_rides_the_query_string() {
        assert_eq!(
            with_token("ws://h:1/ws", "abc123"),
            "ws://h:1/ws?token=abc123"
        );
    }

    #[test]
    fn token_is_percent_encoded() {
        let url = with_token("ws://h:1/ws", "a+b/c=");
        assert!(!url.contains('+'));
        assert!(url.starts_with("ws://h:1/ws?token="));
    }

    #[test]
    fn existing_query_params_are_preserved() {
        assert_eq!(
            with_token("ws://h:1/ws?v=2", "t"),
            "ws://h:1/ws?v=2&token=t"
        );
    }
}

//! Push Channel Client Module
//!
//! Per-session connection manager: connect, authenticate, heartbeat,
//! typed-message dispatch, and reconnect with exponential backoff. The
//! whole lifecycle runs in one supervisor task; callers interact through
//! a command channel and observe connectivity through a watch channel,
//! never through errors.
//!
//! ```text
//! Idle → Connecting → Authenticating → Open → Closing → Closed
//!                          ▲                    │
//!                          └──── reconnect ─────┘ (unexpected drop,
//!                                                  capped backoff)
//! ```

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::channel::backoff::ReconnectPolicy;
use crate::channel::message::{ClientMessage, PushMessage};
use crate::channel::transport::{Transport, TransportPipe};
use crate::router::UpdateRouter;

/// Heartbeat cadence while the channel is open.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Commands queued for the supervisor task.
const COMMAND_BUFFER: usize = 16;

// == Connection State ==
/// Lifecycle state of the push channel, surfaced to the UI layer as the
/// connectivity indicator.
///
/// `Closed` is terminal: it means either an explicit teardown or an
/// exhausted reconnect budget. A fresh `PushClient` must be created to
/// connect again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Idle,
    Connecting,
    Authenticating,
    Open,
    Closing,
    Closed,
}

// == Identity ==
/// The authenticated session the channel speaks for.
///
/// No channel is opened for anonymous sessions; constructing a client
/// requires an identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: String,
}

enum Command {
    Send(ClientMessage),
    Close,
}

/// How a single connection session ended.
enum SessionEnd {
    /// Explicit close; reconnect is suppressed
    Teardown,
    /// Transport dropped unexpectedly; reconnect path applies
    Dropped,
}

enum BackoffOutcome {
    Retry,
    Stop,
}

// == Push Client ==
/// Handle to a running push channel.
pub struct PushClient {
    cmd_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<ConnectionState>,
    supervisor: JoinHandle<()>,
}

impl PushClient {
    // == Connect ==
    /// Spawns the channel supervisor for an authenticated session.
    ///
    /// The connection is established in the background; observe progress
    /// through [`watch_state`](Self::watch_state).
    pub fn connect(
        transport: Arc<dyn Transport>,
        identity: Identity,
        router: Arc<UpdateRouter>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let supervisor = tokio::spawn(run(transport, identity, router, cmd_rx, state_tx));

        Self {
            cmd_tx,
            state_rx,
            supervisor,
        }
    }

    // == State ==
    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Whether the channel is currently open.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// A watch receiver for reacting to connectivity changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    // == Sends ==
    /// Declares the channels this session wants delivery for. Filtering
    /// itself is the server's responsibility.
    pub async fn subscribe(&self, channels: Vec<String>) {
        self.send(ClientMessage::Subscribe { channels }).await;
    }

    /// Asks the server to push current analytics.
    pub async fn request_analytics(&self) {
        self.send(ClientMessage::RequestAnalytics).await;
    }

    /// Asks the server to push open proctoring alerts.
    pub async fn request_alerts(&self) {
        self.send(ClientMessage::RequestAlerts).await;
    }

    /// Best-effort send: messages queued while disconnected are dropped.
    async fn send(&self, msg: ClientMessage) {
        if self.cmd_tx.send(Command::Send(msg)).await.is_err() {
            debug!("push channel already closed, send dropped");
        }
    }

    // == Close ==
    /// Tears the channel down: closes the transport, cancels any pending
    /// reconnect timer, and waits for the supervisor to finish. After
    /// this returns, nothing is scheduled and no further cache actions
    /// can fire.
    pub async fn close(self) {
        let _ = self.cmd_tx.send(Command::Close).await;
        let _ = self.supervisor.await;
    }
}

// == Supervisor ==
/// Drives the reconnect loop. Each iteration asks the transport for a
/// fresh connection; connections are never reused across reconnects.
async fn run(
    transport: Arc<dyn Transport>,
    identity: Identity,
    router: Arc<UpdateRouter>,
    mut cmd_rx: mpsc::Receiver<Command>,
    state_tx: watch::Sender<ConnectionState>,
) {
    let mut policy = ReconnectPolicy::new();

    loop {
        let _ = state_tx.send(ConnectionState::Connecting);

        let pipe = match transport.connect().await {
            Ok(pipe) => pipe,
            Err(e) => {
                warn!(error = %e, "push channel connect failed");
                match wait_for_reconnect(&mut policy, &mut cmd_rx, &state_tx).await {
                    BackoffOutcome::Retry => continue,
                    BackoffOutcome::Stop => return,
                }
            }
        };

        match serve_connection(pipe, &identity, &router, &mut policy, &mut cmd_rx, &state_tx).await
        {
            SessionEnd::Teardown => return,
            SessionEnd::Dropped => {
                info!("push channel dropped unexpectedly");
                match wait_for_reconnect(&mut policy, &mut cmd_rx, &state_tx).await {
                    BackoffOutcome::Retry => continue,
                    BackoffOutcome::Stop => return,
                }
            }
        }
    }
}

/// Runs one connection from authentication to its end.
async fn serve_connection(
    pipe: TransportPipe,
    identity: &Identity,
    router: &UpdateRouter,
    policy: &mut ReconnectPolicy,
    cmd_rx: &mut mpsc::Receiver<Command>,
    state_tx: &watch::Sender<ConnectionState>,
) -> SessionEnd {
    let TransportPipe {
        outbound,
        mut inbound,
    } = pipe;

    let _ = state_tx.send(ConnectionState::Authenticating);

    // Fire-and-forget: further sends do not wait for an ack.
    let auth = ClientMessage::Authenticate {
        user_id: identity.user_id.clone(),
        role: identity.role.clone(),
    };
    if outbound.send(auth.encode()).await.is_err() {
        return SessionEnd::Dropped;
    }

    let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    heartbeat.reset();

    let mut open = false;

    loop {
        tokio::select! {
            frame = inbound.recv() => match frame {
                Some(raw) => match PushMessage::decode(&raw) {
                    Ok(msg) => {
                        if !open {
                            open = true;
                            policy.reset();
                            // Anchor the heartbeat cadence at the open
                            // transition, not at connection start.
                            heartbeat.reset();
                            let _ = state_tx.send(ConnectionState::Open);
                            debug!("push channel open");
                        }
                        // Dispatched in arrival order; no reordering or
                        // buffering layer sits between transport and router.
                        router.dispatch(&msg).await;
                    }
                    Err(e) => {
                        warn!(error = %e, "dropping malformed push frame");
                    }
                },
                None => return SessionEnd::Dropped,
            },

            _ = heartbeat.tick(), if open => {
                if outbound.send(ClientMessage::Ping.encode()).await.is_err() {
                    return SessionEnd::Dropped;
                }
            }

            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Send(msg)) => {
                    if outbound.send(msg.encode()).await.is_err() {
                        return SessionEnd::Dropped;
                    }
                }
                Some(Command::Close) | None => {
                    let _ = state_tx.send(ConnectionState::Closing);
                    // Dropping the outbound sender lets the transport
                    // close the connection cleanly.
                    drop(outbound);
                    let _ = state_tx.send(ConnectionState::Closed);
                    return SessionEnd::Teardown;
                }
            }
        }
    }
}

/// Sleeps out the backoff delay for the next reconnect attempt.
///
/// A close command arriving during the wait cancels the pending timer;
/// an exhausted attempt budget surfaces the terminal disconnected state.
async fn wait_for_reconnect(
    policy: &mut ReconnectPolicy,
    cmd_rx: &mut mpsc::Receiver<Command>,
    state_tx: &watch::Sender<ConnectionState>,
) -> BackoffOutcome {
    let Some(delay) = policy.next_delay() else {
        warn!(
            attempts = policy.attempt(),
            "reconnect attempts exhausted, staying disconnected"
        );
        let _ = state_tx.send(ConnectionState::Closed);
        return BackoffOutcome::Stop;
    };

    // The channel is down for the whole wait; stop advertising an open
    // connection before the retry timer starts.
    let _ = state_tx.send(ConnectionState::Connecting);

    info!(
        delay_ms = delay.as_millis() as u64,
        attempt = policy.attempt(),
        "scheduling reconnect"
    );

    let sleep = time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return BackoffOutcome::Retry,
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Send(_)) => {
                    debug!("push channel disconnected, send dropped");
                }
                Some(Command::Close) | None => {
                    let _ = state_tx.send(ConnectionState::Closed);
                    return BackoffOutcome::Stop;
                }
            }
        }
    }
}

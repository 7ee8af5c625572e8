//! Self-healing live feed client.
//!
//! A [`ResilientClient`] is a cheap handle to a driver task. The driver owns
//! all mutable state: the current session, the reconnect timer, the attempt
//! counter and the resumption cursor. Handles only enqueue commands, so
//! `connect()` and `close()` never block and never fail.
//!
//! Every attempt gets a new generation number. Session signals and timer
//! wakeups carry the generation they were created for, and the driver drops
//! any that do not match the current one. A session cancelled by `close()`
//! or by a newer attempt therefore cannot deliver late events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backoff::BackoffPolicy;
use super::listener::{CloseInfo, LiveListener, LiveMessage, OpenInfo};
use super::session::{SessionHandle, SessionRequest, SessionSignal, SessionSink, StreamSession};
use super::state::{ClientStatus, CloseReason, ConnectionState};
use crate::auth::AdminCredentials;
use crate::config::LiveConfig;
use crate::error::{LiveResult, StreamError};
use crate::traits::{HeaderProvider, Headers, HttpClient};

/// Request header carrying the resumption cursor.
pub const LAST_EVENT_ID_HEADER: &str = "Last-Event-ID";

const ACCEPT_HEADER: &str = "Accept";
const EVENT_STREAM_MIME: &str = "text/event-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Connect,
    Close,
}

/// Messages the driver sends itself from spawned tasks.
#[derive(Debug)]
enum DriverMessage {
    Session {
        generation: u64,
        signal: SessionSignal,
    },
    ReconnectDue {
        generation: u64,
    },
}

/// Tags a session's signals with its generation.
struct DriverSink {
    generation: u64,
    tx: mpsc::UnboundedSender<DriverMessage>,
}

impl SessionSink for DriverSink {
    fn deliver(&self, signal: SessionSignal) -> bool {
        self.tx
            .send(DriverMessage::Session {
                generation: self.generation,
                signal,
            })
            .is_ok()
    }
}

/// A pending reconnect. Dropping it cancels the wakeup.
struct ReconnectTimer {
    task: JoinHandle<()>,
}

impl ReconnectTimer {
    fn schedule(
        delay: Duration,
        generation: u64,
        tx: mpsc::UnboundedSender<DriverMessage>,
    ) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(DriverMessage::ReconnectDue { generation });
        });
        Self { task }
    }
}

impl Drop for ReconnectTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Handle to a live feed connection that reconnects on its own.
///
/// Clones share one driver. The driver stops, cancelling any session and
/// pending reconnect, once every handle has been dropped.
///
/// # Example
///
/// ```ignore
/// use livefeed::live::{ChannelListener, ResilientClient};
///
/// let (listener, mut notifications) = ChannelListener::new();
/// let client = ResilientClient::new(&config, http, auth, Arc::new(listener));
/// client.connect();
///
/// while let Some(notification) = notifications.recv().await {
///     println!("{:?}", notification);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ResilientClient {
    commands: mpsc::UnboundedSender<Command>,
    status_rx: watch::Receiver<ClientStatus>,
    url: Arc<str>,
}

impl ResilientClient {
    /// Create a client and spawn its driver on the current Tokio runtime.
    ///
    /// The client starts `Disconnected`; call [`connect`](Self::connect).
    pub fn new(
        config: &LiveConfig,
        http: Arc<dyn HttpClient>,
        auth: Arc<dyn HeaderProvider>,
        listener: Arc<dyn LiveListener>,
    ) -> Self {
        let url: Arc<str> = Arc::from(config.url());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ClientStatus::default());

        let driver = Driver {
            url: url.to_string(),
            backoff: config.backoff,
            http,
            auth,
            listener,
            status_tx,
            internal_tx,
            state: ConnectionState::Disconnected,
            attempts: 0,
            last_event_id: None,
            generation: 0,
            closing: false,
            session: None,
            timer: None,
        };
        tokio::spawn(driver.run(command_rx, internal_rx));

        Self {
            commands: command_tx,
            status_rx,
            url,
        }
    }

    /// Start streaming. Does nothing if the client is already active.
    pub fn connect(&self) {
        self.send(Command::Connect);
    }

    /// Stop streaming and cancel any pending reconnect.
    ///
    /// Calling it again, or on a client that never connected, has no effect.
    pub fn close(&self) {
        self.send(Command::Close);
    }

    /// Current status snapshot.
    pub fn status(&self) -> ClientStatus {
        self.status_rx.borrow().clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.status_rx.borrow().state
    }

    /// Subscribe to status changes.
    pub fn status_receiver(&self) -> watch::Receiver<ClientStatus> {
        self.status_rx.clone()
    }

    /// The live feed URL this client targets.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!(?command, "Live client driver has stopped");
        }
    }
}

/// Build a client for the admin live feed.
///
/// Fails fast when the username or password is missing instead of letting
/// every attempt fail.
pub fn create_live_client(
    config: &LiveConfig,
    http: Arc<dyn HttpClient>,
    credentials: AdminCredentials,
    listener: Arc<dyn LiveListener>,
) -> LiveResult<ResilientClient> {
    config.validate()?;
    credentials.validate()?;
    Ok(ResilientClient::new(config, http, Arc::new(credentials), listener))
}

struct Driver {
    url: String,
    backoff: BackoffPolicy,
    http: Arc<dyn HttpClient>,
    auth: Arc<dyn HeaderProvider>,
    listener: Arc<dyn LiveListener>,
    status_tx: watch::Sender<ClientStatus>,
    internal_tx: mpsc::UnboundedSender<DriverMessage>,
    state: ConnectionState,
    attempts: u32,
    last_event_id: Option<String>,
    generation: u64,
    closing: bool,
    session: Option<SessionHandle>,
    timer: Option<ReconnectTimer>,
}

impl Driver {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut internal: mpsc::UnboundedReceiver<DriverMessage>,
    ) {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Connect) => self.connect(),
                    Some(Command::Close) => self.close(),
                    None => break,
                },
                Some(message) = internal.recv() => self.handle(message),
            }
        }

        debug!(url = %self.url, "All live client handles dropped, stopping driver");
        self.generation += 1;
        self.stop_attempt();
        self.state = ConnectionState::Disconnected;
        self.publish();
    }

    fn connect(&mut self) {
        if self.state.is_active() {
            debug!(state = %self.state, "connect() ignored, client already active");
            return;
        }

        info!(url = %self.url, "Connecting to live feed");
        self.closing = false;
        self.attempts = 0;
        self.state = ConnectionState::Connecting;
        self.publish();
        self.start_attempt();
    }

    fn close(&mut self) {
        self.closing = true;
        self.generation += 1;
        self.stop_attempt();

        if !self.state.is_active() {
            debug!("close() ignored, client already disconnected");
            return;
        }

        info!(url = %self.url, "Live feed closed");
        self.state = ConnectionState::Disconnected;
        self.publish();
        self.listener.on_close(CloseInfo {
            reason: CloseReason::Manual,
        });
    }

    fn stop_attempt(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
        }
        self.timer = None;
    }

    fn start_attempt(&mut self) {
        self.stop_attempt();
        self.generation += 1;
        let generation = self.generation;

        let headers = match self.request_headers() {
            Ok(headers) => headers,
            Err(err) => {
                warn!(generation, error = %err, "Cannot build live feed request");
                self.fail(err);
                return;
            }
        };

        debug!(
            generation,
            attempt = self.attempts,
            last_event_id = ?self.last_event_id,
            "Opening live stream attempt"
        );
        let sink = DriverSink {
            generation,
            tx: self.internal_tx.clone(),
        };
        let request = SessionRequest::new(self.url.clone(), headers);
        self.session = Some(StreamSession::open(self.http.clone(), request, sink));
    }

    fn request_headers(&self) -> Result<Headers, StreamError> {
        let mut headers = self.auth.auth_headers().map_err(StreamError::Credentials)?;
        // The client owns these two; drop any spelling the provider used.
        headers.retain(|name, _| {
            !name.eq_ignore_ascii_case(ACCEPT_HEADER) && !name.eq_ignore_ascii_case(LAST_EVENT_ID_HEADER)
        });
        headers.insert(ACCEPT_HEADER.to_string(), EVENT_STREAM_MIME.to_string());
        if let Some(id) = &self.last_event_id {
            headers.insert(LAST_EVENT_ID_HEADER.to_string(), id.clone());
        }
        Ok(headers)
    }

    fn handle(&mut self, message: DriverMessage) {
        match message {
            DriverMessage::Session { generation, signal } => {
                if self.closing || generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "Dropping signal from stale session"
                    );
                    return;
                }
                self.handle_signal(generation, signal);
            }
            DriverMessage::ReconnectDue { generation } => {
                if self.closing || generation != self.generation || self.timer.is_none() {
                    debug!(generation, "Dropping stale reconnect wakeup");
                    return;
                }
                self.timer = None;
                self.start_attempt();
            }
        }
    }

    fn handle_signal(&mut self, generation: u64, signal: SessionSignal) {
        match signal {
            SessionSignal::Opened { status } => {
                info!(generation, status, attempt = self.attempts, "Live stream open");
                self.state = ConnectionState::Connected;
                self.publish();
                self.listener.on_open(OpenInfo {
                    attempts: self.attempts,
                });
            }
            SessionSignal::Event(event) => {
                debug!(generation, event_type = %event.event_type, id = ?event.id, "Live event");
                if let Some(id) = event.resumption_id() {
                    self.last_event_id = Some(id.to_string());
                    self.publish();
                }
                let message = LiveMessage {
                    event,
                    last_event_id: self.last_event_id.clone(),
                };
                self.listener.on_message(message);
            }
            SessionSignal::Ended => {
                info!(generation, "Live stream ended by server");
                self.session = None;
                self.listener.on_close(CloseInfo {
                    reason: CloseReason::Eof,
                });
                self.schedule_reconnect();
            }
            SessionSignal::Failed(err) => {
                warn!(generation, code = err.error_code(), error = %err, "Live stream attempt failed");
                self.session = None;
                self.fail(err);
            }
        }
    }

    fn fail(&mut self, err: StreamError) {
        self.listener.on_error(&err);
        self.schedule_reconnect();
    }

    fn schedule_reconnect(&mut self) {
        if self.closing {
            return;
        }

        self.attempts = self.attempts.saturating_add(1);
        let delay = self.backoff.delay_for_attempt(self.attempts);
        info!(
            attempt = self.attempts,
            delay_ms = delay.as_millis() as u64,
            "Scheduling live feed reconnect"
        );

        self.state = ConnectionState::Reconnecting;
        self.publish();
        self.listener.on_reconnect_scheduled(self.attempts, delay);
        self.timer = Some(ReconnectTimer::schedule(
            delay,
            self.generation,
            self.internal_tx.clone(),
        ));
    }

    fn publish(&self) {
        self.status_tx.send_replace(ClientStatus {
            state: self.state,
            attempts: self.attempts,
            last_event_id: self.last_event_id.clone(),
        });
    }
}

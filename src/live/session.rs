//! A single connection attempt.
//!
//! A [`StreamSession`] issues the streaming request, feeds each body chunk to
//! a fresh [`FrameDecoder`] and reports what happened through a
//! [`SessionSink`]. It knows nothing about retries; the client decides what
//! to do after [`SessionSignal::Ended`] or [`SessionSignal::Failed`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::StreamError;
use crate::sse::{FrameDecoder, StreamEvent};
use crate::traits::{Headers, HttpClient};

/// URL and headers for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub url: String,
    pub headers: Headers,
}

impl SessionRequest {
    pub fn new(url: impl Into<String>, headers: Headers) -> Self {
        Self {
            url: url.into(),
            headers,
        }
    }
}

/// Everything a session reports, in delivery order.
///
/// A session delivers at most one `Opened`, any number of `Event`s, and then
/// exactly one terminal signal (`Ended` or `Failed`) unless it is cancelled
/// first.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSignal {
    /// The response was accepted and the body is being read
    Opened { status: u16 },
    /// A decoded event
    Event(StreamEvent),
    /// The server ended the body cleanly
    Ended,
    /// The attempt failed before or while reading
    Failed(StreamError),
}

impl SessionSignal {
    /// Returns true for `Ended` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionSignal::Ended | SessionSignal::Failed(_))
    }
}

/// Receiver of session signals.
///
/// `deliver` returns false when the receiver is gone, which stops the
/// session's read loop.
pub trait SessionSink: Send + Sync + 'static {
    fn deliver(&self, signal: SessionSignal) -> bool;
}

impl SessionSink for mpsc::UnboundedSender<SessionSignal> {
    fn deliver(&self, signal: SessionSignal) -> bool {
        self.send(signal).is_ok()
    }
}

/// Spawns connection attempts.
pub struct StreamSession;

impl StreamSession {
    /// Start one attempt on the current Tokio runtime.
    ///
    /// The returned handle cancels the attempt when [`SessionHandle::cancel`]
    /// is called or when it is dropped.
    pub fn open<S: SessionSink>(
        http: Arc<dyn HttpClient>,
        request: SessionRequest,
        sink: S,
    ) -> SessionHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let task = tokio::spawn(async move {
            run_session(http, request, sink, flag).await;
        });

        SessionHandle {
            cancelled,
            task: Some(task),
        }
    }
}

/// Cancel handle for an open session.
#[derive(Debug)]
pub struct SessionHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Stop the attempt. No signal is delivered after this returns.
    ///
    /// The read task is aborted, so a pending read is dropped rather than
    /// left to finish in the background.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns true once the read task has exited or been aborted.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn deliver<S: SessionSink>(sink: &S, cancelled: &AtomicBool, signal: SessionSignal) -> bool {
    if cancelled.load(Ordering::SeqCst) {
        return false;
    }
    sink.deliver(signal)
}

async fn run_session<S: SessionSink>(
    http: Arc<dyn HttpClient>,
    request: SessionRequest,
    sink: S,
    cancelled: Arc<AtomicBool>,
) {
    debug!(url = %request.url, "Opening event stream");

    let response = match http.get_stream(&request.url, &request.headers).await {
        Ok(response) => response,
        Err(err) => {
            deliver(&sink, &cancelled, SessionSignal::Failed(StreamError::ConnectFailed(err)));
            return;
        }
    };

    let status = response.status;
    if !response.is_success() {
        deliver(&sink, &cancelled, SessionSignal::Failed(StreamError::HttpStatus { status }));
        return;
    }

    let Some(mut body) = response.body else {
        deliver(&sink, &cancelled, SessionSignal::Failed(StreamError::MissingBody { status }));
        return;
    };

    if !deliver(&sink, &cancelled, SessionSignal::Opened { status }) {
        return;
    }

    let mut decoder = FrameDecoder::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(bytes) => {
                trace!(len = bytes.len(), "Received chunk");
                for event in decoder.feed(&bytes) {
                    if !deliver(&sink, &cancelled, SessionSignal::Event(event)) {
                        return;
                    }
                }
            }
            Err(err) => {
                deliver(&sink, &cancelled, SessionSignal::Failed(StreamError::ReadFailed(err)));
                return;
            }
        }
    }

    if !decoder.is_drained() {
        debug!(
            buffered = decoder.buffered_len(),
            "Stream ended inside an event block, discarding it"
        );
    }
    deliver(&sink, &cancelled, SessionSignal::Ended);
}

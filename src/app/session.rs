//! Background load sessions for interactive front-ends.
//!
//! The runner keeps at most one worker thread alive. Requesting a new load
//! while one is running cancels the running session and parks the request
//! until the worker reports back; only then is the next session started, so
//! the pipeline's busy check never trips. Events from a cancelled session
//! are dropped on receipt, which keeps a superseded load from touching the
//! chart of its successor.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::app::pipeline::{ChartSink, LoadOutcome, LoadRequest, Pipeline};
use crate::chart::UpdateMode;
use crate::data::CancelToken;
use crate::domain::Dataset;
use crate::error::AppError;

#[derive(Debug)]
pub enum SessionEventKind {
    Rebuild {
        labels: Vec<String>,
        datasets: Vec<Dataset>,
    },
    Update {
        datasets: Vec<Dataset>,
        mode: UpdateMode,
    },
    Finished(Result<LoadOutcome, AppError>),
}

#[derive(Debug)]
pub struct SessionEvent {
    pub session: u64,
    pub request: LoadRequest,
    pub kind: SessionEventKind,
}

struct ChannelSink {
    session: u64,
    request: LoadRequest,
    tx: Sender<SessionEvent>,
}

impl ChannelSink {
    fn send(&self, kind: SessionEventKind) {
        // The receiver only goes away on shutdown; nothing left to notify then.
        let _ = self.tx.send(SessionEvent {
            session: self.session,
            request: self.request.clone(),
            kind,
        });
    }
}

impl ChartSink for ChannelSink {
    fn rebuild(&mut self, labels: Vec<String>, datasets: Vec<Dataset>) {
        self.send(SessionEventKind::Rebuild { labels, datasets });
    }

    fn update(&mut self, datasets: Vec<Dataset>, mode: UpdateMode) {
        self.send(SessionEventKind::Update { datasets, mode });
    }
}

struct Active {
    id: u64,
    request: LoadRequest,
    token: CancelToken,
    handle: JoinHandle<()>,
}

pub struct SessionRunner {
    pipeline: Arc<Pipeline>,
    tx: Sender<SessionEvent>,
    rx: Receiver<SessionEvent>,
    active: Option<Active>,
    pending: Option<LoadRequest>,
    next_id: u64,
}

impl SessionRunner {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            pipeline,
            tx,
            rx,
            active: None,
            pending: None,
            next_id: 1,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// A session is running or about to be started.
    pub fn is_busy(&self) -> bool {
        self.active.is_some() || self.pending.is_some()
    }

    /// Request currently running (or queued behind a cancelled one).
    pub fn current_request(&self) -> Option<&LoadRequest> {
        self.pending
            .as_ref()
            .or_else(|| self.active.as_ref().map(|a| &a.request))
    }

    /// Start `request`, superseding whatever is running.
    pub fn request(&mut self, request: LoadRequest) -> Result<(), AppError> {
        match &self.active {
            Some(active) => {
                debug!(session = active.id, "superseding running session");
                active.token.cancel();
                self.pending = Some(request);
                Ok(())
            }
            None => self.spawn(request),
        }
    }

    /// Cancel the running session and drop any queued request.
    pub fn cancel(&mut self) {
        self.pending = None;
        if let Some(active) = &self.active {
            active.token.cancel();
        }
    }

    /// Drain worker events. Only events of the live, uncancelled session are returned.
    pub fn poll(&mut self) -> Result<Vec<SessionEvent>, AppError> {
        let mut delivered = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            let Some(active) = &self.active else {
                continue;
            };
            if event.session != active.id {
                continue;
            }

            let stale = active.token.is_cancelled();
            let finished = matches!(event.kind, SessionEventKind::Finished(_));

            if finished {
                if let Some(done) = self.active.take() {
                    let _ = done.handle.join();
                }
            }
            if stale {
                debug!(session = event.session, "dropping event of cancelled session");
            } else {
                delivered.push(event);
            }
            if finished {
                if let Some(next) = self.pending.take() {
                    self.spawn(next)?;
                }
            }
        }
        Ok(delivered)
    }

    /// Cancel everything without waiting on a worker stuck in a request.
    ///
    /// A worker that has already exited is joined. A cancelled one still
    /// blocked on the network is detached; it stops at its next cancellation
    /// check and its events go nowhere.
    pub fn shutdown(&mut self) {
        self.cancel();
        if let Some(active) = self.active.take() {
            if active.handle.is_finished() {
                let _ = active.handle.join();
            } else {
                debug!(session = active.id, "detaching cancelled worker");
            }
        }
        while self.rx.try_recv().is_ok() {}
    }

    fn spawn(&mut self, request: LoadRequest) -> Result<(), AppError> {
        let id = self.next_id;
        self.next_id += 1;

        let token = CancelToken::new();
        let pipeline = Arc::clone(&self.pipeline);
        let mut sink = ChannelSink {
            session: id,
            request: request.clone(),
            tx: self.tx.clone(),
        };
        let worker_request = request.clone();
        let worker_token = token.clone();

        let handle = thread::Builder::new()
            .name(format!("load-{id}"))
            .spawn(move || {
                let result = pipeline.load(&worker_request, &worker_token, &mut sink);
                sink.send(SessionEventKind::Finished(result));
            })
            .map_err(|e| AppError::io(format!("Failed to start load worker: {e}")))?;

        debug!(session = id, indicator = %request.indicator, "session started");
        self.active = Some(Active {
            id,
            request,
            token,
            handle,
        });
        Ok(())
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

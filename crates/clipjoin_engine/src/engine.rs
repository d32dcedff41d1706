use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tokio::sync::oneshot;

use crate::ffmpeg::{EngineSettings, FfmpegEngine};
use crate::join::{run_join, ChannelProgressSink, EventLogSink, ProgressSink};
use crate::media::MediaEngine;
use crate::{ClipSource, EngineEvent, JoinError};

enum EngineCommand {
    EnsureReady,
    Join { clips: Vec<ClipSource> },
}

/// Handle to the engine worker: commands in, events out.
///
/// The worker thread owns a tokio runtime; each command becomes one spawned
/// task. One join runs at a time by construction of the session core, and
/// initialization is single-flight through [`InitGate`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_engine(Arc::new(FfmpegEngine::new(settings)))
    }

    /// Test seam: run the worker over any engine implementation.
    pub fn with_engine(engine: Arc<dyn MediaEngine>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let gate = Arc::new(InitGate::new());

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let engine = engine.clone();
                let gate = gate.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(engine, command, gate, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Idempotent warm-up. Requests arriving while a load is in flight
    /// share its outcome; a request after a failed load starts fresh.
    pub fn ensure_ready(&self) {
        let _ = self.cmd_tx.send(EngineCommand::EnsureReady);
    }

    /// Submits one join over a frozen snapshot.
    pub fn join(&self, clips: Vec<ClipSource>) {
        let _ = self.cmd_tx.send(EngineCommand::Join { clips });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    engine: Arc<dyn MediaEngine>,
    command: EngineCommand,
    gate: Arc<InitGate>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelProgressSink::new(event_tx);
    match command {
        EngineCommand::EnsureReady => {
            let _ = gate.ensure(engine.as_ref(), &sink).await;
        }
        EngineCommand::Join { clips } => {
            let result = match gate.ensure(engine.as_ref(), &sink).await {
                Ok(()) => run_join(engine.as_ref(), &clips, &sink).await,
                Err(message) => Err(JoinError::EngineLoad(message)),
            };
            sink.emit(EngineEvent::JoinCompleted { result });
        }
    }
}

/// Single-flight guard for engine initialization.
///
/// The first caller in becomes the flight owner and runs the load; callers
/// that arrive during the flight park on a oneshot and receive the owner's
/// outcome, failure included. A failed flight resets the gate to `Idle` so
/// the next request retries. Only the owner emits `LoadCompleted`.
struct InitGate {
    inner: Mutex<GateState>,
}

enum GateState {
    Idle,
    InFlight(Vec<oneshot::Sender<Result<(), String>>>),
    Ready,
}

impl InitGate {
    fn new() -> Self {
        Self {
            inner: Mutex::new(GateState::Idle),
        }
    }

    async fn ensure(
        &self,
        engine: &dyn MediaEngine,
        sink: &dyn ProgressSink,
    ) -> Result<(), String> {
        let waiter = {
            let mut guard = self.inner.lock().expect("init gate lock");
            match &mut *guard {
                GateState::Ready => return Ok(()),
                GateState::InFlight(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                GateState::Idle => {
                    *guard = GateState::InFlight(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            return rx
                .await
                .unwrap_or_else(|_| Err("engine load was dropped".to_string()));
        }

        let logs = EventLogSink::new(sink);
        let result = engine
            .initialize(&logs)
            .await
            .map_err(|err| err.message);

        let waiters = {
            let mut guard = self.inner.lock().expect("init gate lock");
            let waiters = match std::mem::replace(&mut *guard, GateState::Idle) {
                GateState::InFlight(waiters) => waiters,
                _ => Vec::new(),
            };
            if result.is_ok() {
                *guard = GateState::Ready;
            }
            waiters
        };

        sink.emit(EngineEvent::LoadCompleted {
            result: result.clone(),
        });
        for tx in waiters {
            let _ = tx.send(result.clone());
        }
        result
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tempfile::TempDir;

use clipjoin_engine::{
    ClipSource, EngineEvent, EngineHandle, JoinError, LogSink, MediaEngine, MediaError,
    OUTPUT_NAME,
};

/// In-memory engine with a configurable number of failing load attempts and
/// a deliberate load delay, so concurrent ensures overlap one flight.
struct FakeEngine {
    init_calls: AtomicUsize,
    init_delay: Duration,
    failing_inits: usize,
    storage: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeEngine {
    fn new(init_delay: Duration, failing_inits: usize) -> Self {
        Self {
            init_calls: AtomicUsize::new(0),
            init_delay,
            failing_inits,
            storage: Mutex::new(HashMap::new()),
        }
    }

    fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn initialize(&self, sink: &dyn LogSink) -> Result<(), MediaError> {
        let attempt = self.init_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.init_delay).await;
        if attempt < self.failing_inits {
            return Err(MediaError::new("version probe failed"));
        }
        sink.line("fake engine 1.0");
        Ok(())
    }

    async fn stage_file(&self, name: &str, bytes: &[u8]) -> Result<(), MediaError> {
        self.storage
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn release_file(&self, name: &str) -> Result<(), MediaError> {
        self.storage
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MediaError::new("no such entry"))
    }

    async fn run_operation(&self, _argv: &[String], sink: &dyn LogSink) -> Result<(), MediaError> {
        sink.line("stream copy");
        self.storage
            .lock()
            .unwrap()
            .insert(OUTPUT_NAME.to_string(), b"joined".to_vec());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, MediaError> {
        self.storage
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| MediaError::new("no such entry"))
    }
}

/// Polls the handle until `done` says enough or the deadline passes.
fn collect_events(
    handle: &EngineHandle,
    deadline: Duration,
    mut done: impl FnMut(&[EngineEvent]) -> bool,
) -> Vec<EngineEvent> {
    let start = Instant::now();
    let mut events = Vec::new();
    while start.elapsed() < deadline {
        match handle.try_recv() {
            Some(event) => {
                events.push(event);
                if done(&events) {
                    break;
                }
            }
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }
    events
}

fn load_completions(events: &[EngineEvent]) -> Vec<Result<(), String>> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::LoadCompleted { result } => Some(result.clone()),
            _ => None,
        })
        .collect()
}

fn write_clips(dir: &TempDir, names: &[&str]) -> Vec<ClipSource> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, name.as_bytes()).unwrap();
            ClipSource {
                file_name: name.to_string(),
                path,
            }
        })
        .collect()
}

#[test]
fn concurrent_ensures_trigger_one_underlying_load() {
    let engine = Arc::new(FakeEngine::new(Duration::from_millis(100), 0));
    let handle = EngineHandle::with_engine(engine.clone());

    handle.ensure_ready();
    handle.ensure_ready();

    let events = collect_events(&handle, Duration::from_secs(5), |events| {
        !load_completions(events).is_empty()
    });
    // Drain a little longer to catch any duplicate completion.
    std::thread::sleep(Duration::from_millis(200));
    let mut events = events;
    while let Some(event) = handle.try_recv() {
        events.push(event);
    }

    assert_eq!(load_completions(&events), vec![Ok(())]);
    assert_eq!(engine.init_calls(), 1);
}

#[test]
fn failed_load_is_shared_then_retried_fresh() {
    let engine = Arc::new(FakeEngine::new(Duration::from_millis(50), 1));
    let handle = EngineHandle::with_engine(engine.clone());

    handle.ensure_ready();
    let events = collect_events(&handle, Duration::from_secs(5), |events| {
        !load_completions(events).is_empty()
    });
    assert_eq!(
        load_completions(&events),
        vec![Err("version probe failed".to_string())]
    );

    // A fresh request after the failure starts a new attempt.
    handle.ensure_ready();
    let events = collect_events(&handle, Duration::from_secs(5), |events| {
        !load_completions(events).is_empty()
    });
    assert_eq!(load_completions(&events), vec![Ok(())]);
    assert_eq!(engine.init_calls(), 2);
}

#[test]
fn ready_engine_does_not_reload() {
    let engine = Arc::new(FakeEngine::new(Duration::from_millis(10), 0));
    let handle = EngineHandle::with_engine(engine.clone());

    handle.ensure_ready();
    collect_events(&handle, Duration::from_secs(5), |events| {
        !load_completions(events).is_empty()
    });

    handle.ensure_ready();
    std::thread::sleep(Duration::from_millis(100));
    assert!(handle.try_recv().is_none());
    assert_eq!(engine.init_calls(), 1);
}

#[test]
fn join_from_cold_engine_loads_then_completes() {
    let dir = TempDir::new().unwrap();
    let clips = write_clips(&dir, &["a.mp4", "b.mp4"]);
    let engine = Arc::new(FakeEngine::new(Duration::from_millis(10), 0));
    let handle = EngineHandle::with_engine(engine.clone());

    handle.join(clips);

    let events = collect_events(&handle, Duration::from_secs(5), |events| {
        events
            .iter()
            .any(|event| matches!(event, EngineEvent::JoinCompleted { .. }))
    });

    assert_eq!(load_completions(&events), vec![Ok(())]);
    let completion = events
        .iter()
        .find_map(|event| match event {
            EngineEvent::JoinCompleted { result } => Some(result.clone()),
            _ => None,
        })
        .expect("join completed");
    let output = completion.expect("join succeeded");
    assert_eq!(output.bytes, b"joined");
    // Working storage was fully released by the transaction.
    assert!(engine.storage.lock().unwrap().is_empty());
}

#[test]
fn join_fails_as_engine_load_error_when_the_load_fails() {
    let dir = TempDir::new().unwrap();
    let clips = write_clips(&dir, &["a.mp4", "b.mp4"]);
    let engine = Arc::new(FakeEngine::new(Duration::from_millis(10), usize::MAX));
    let handle = EngineHandle::with_engine(engine.clone());

    handle.join(clips);

    let events = collect_events(&handle, Duration::from_secs(5), |events| {
        events
            .iter()
            .any(|event| matches!(event, EngineEvent::JoinCompleted { .. }))
    });
    let completion = events
        .iter()
        .find_map(|event| match event {
            EngineEvent::JoinCompleted { result } => Some(result.clone()),
            _ => None,
        })
        .expect("join completed");
    assert_eq!(
        completion.unwrap_err(),
        JoinError::EngineLoad("version probe failed".to_string())
    );
    // Nothing was staged before the failed load.
    assert!(engine.storage.lock().unwrap().is_empty());
}

use crate::media::{LogSink, MediaEngine};
use crate::playlist::{build_playlist, concat_argv, staged_clip_name, OUTPUT_NAME, PLAYLIST_NAME};
use crate::{ClipSource, EngineEvent, JoinError, JoinOutput, JoinStage, DEFAULT_OUTPUT_FILE_NAME};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Forwards engine diagnostic lines into the event stream.
pub(crate) struct EventLogSink<'a> {
    sink: &'a dyn ProgressSink,
}

impl<'a> EventLogSink<'a> {
    pub(crate) fn new(sink: &'a dyn ProgressSink) -> Self {
        Self { sink }
    }
}

impl LogSink for EventLogSink<'_> {
    fn line(&self, line: &str) {
        self.sink.emit(EngineEvent::Log(line.to_string()));
    }
}

/// Runs one join over a frozen clip snapshot as a single logical
/// transaction.
///
/// Staging is strictly sequential so the temporary-name-to-order mapping
/// stays trivially auditable; the playlist therefore lists the snapshot
/// order by construction. Every temporary name is released afterwards,
/// success or failure; release errors are swallowed.
pub async fn run_join(
    engine: &dyn MediaEngine,
    clips: &[ClipSource],
    sink: &dyn ProgressSink,
) -> Result<JoinOutput, JoinError> {
    if clips.len() < 2 {
        return Err(JoinError::InsufficientClips);
    }

    let result = stage_and_concat(engine, clips, sink).await;
    release_all(engine, clips).await;
    result
}

async fn stage_and_concat(
    engine: &dyn MediaEngine,
    clips: &[ClipSource],
    sink: &dyn ProgressSink,
) -> Result<JoinOutput, JoinError> {
    sink.emit(EngineEvent::JoinProgress {
        stage: JoinStage::Preparing,
    });

    let mut staged = Vec::with_capacity(clips.len());
    for (index, clip) in clips.iter().enumerate() {
        let name = staged_clip_name(index, &clip.file_name);
        let bytes = tokio::fs::read(&clip.path)
            .await
            .map_err(|err| JoinError::Staging {
                name: clip.file_name.clone(),
                message: err.to_string(),
            })?;
        engine
            .stage_file(&name, &bytes)
            .await
            .map_err(|err| JoinError::Staging {
                name: name.clone(),
                message: err.message,
            })?;
        staged.push(name);
    }

    let playlist = build_playlist(&staged);
    engine
        .stage_file(PLAYLIST_NAME, playlist.as_bytes())
        .await
        .map_err(|err| JoinError::Staging {
            name: PLAYLIST_NAME.to_string(),
            message: err.message,
        })?;

    sink.emit(EngineEvent::JoinProgress {
        stage: JoinStage::Joining,
    });
    let logs = EventLogSink::new(sink);
    let argv = concat_argv(PLAYLIST_NAME, OUTPUT_NAME);
    engine
        .run_operation(&argv, &logs)
        .await
        .map_err(|err| JoinError::Operation(err.message))?;

    // The engine's buffer lifetime ends with the release below; copy into a
    // freshly owned artifact first.
    let bytes = engine
        .read_file(OUTPUT_NAME)
        .await
        .map_err(|err| JoinError::Readback(err.message))?;
    if bytes.is_empty() {
        return Err(JoinError::Readback("joined output was empty".to_string()));
    }

    Ok(JoinOutput {
        file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
        bytes,
    })
}

/// Best-effort cleanup: every name the snapshot could have staged, the
/// playlist, and the output. Attempted unconditionally so no entry survives
/// a partial failure.
async fn release_all(engine: &dyn MediaEngine, clips: &[ClipSource]) {
    for (index, clip) in clips.iter().enumerate() {
        let name = staged_clip_name(index, &clip.file_name);
        if let Err(err) = engine.release_file(&name).await {
            log::debug!("release of '{name}' failed: {err}");
        }
    }
    for name in [PLAYLIST_NAME, OUTPUT_NAME] {
        if let Err(err) = engine.release_file(name).await {
            log::debug!("release of '{name}' failed: {err}");
        }
    }
}

use clipjoin_core::{Clip, Effect, JobFailure, JobFailureKind, JobStage, Msg, OutputArtifact};
use clipjoin_engine::{
    ClipSource, EngineEvent, EngineHandle, EngineSettings, JoinError, JoinStage,
};

/// Bridges the pure core to the engine worker: effects out, messages in.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new() -> Self {
        Self {
            engine: EngineHandle::new(EngineSettings::default()),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::EnsureEngineReady => {
                    log::info!("EnsureEngineReady");
                    self.engine.ensure_ready();
                }
                Effect::StartJoin { clips } => {
                    log::info!("StartJoin clip_count={}", clips.len());
                    self.engine
                        .join(clips.into_iter().map(to_source).collect());
                }
            }
        }
    }

    /// Drains pending engine events into core messages.
    pub fn poll(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_event(event));
        }
        msgs
    }
}

fn to_source(clip: Clip) -> ClipSource {
    ClipSource {
        file_name: clip.file.file_name,
        path: clip.file.path,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Log(line) => Msg::EngineLog(line),
        EngineEvent::LoadCompleted { result } => Msg::EngineLoadFinished { result },
        EngineEvent::JoinProgress { stage } => Msg::JobProgress {
            stage: map_stage(stage),
        },
        EngineEvent::JoinCompleted { result } => {
            if let Err(err) = &result {
                log::warn!("join failed: {err}");
            }
            Msg::JobFinished {
                result: result
                    .map(|output| OutputArtifact {
                        file_name: output.file_name,
                        bytes: output.bytes,
                    })
                    .map_err(map_failure),
            }
        }
    }
}

fn map_stage(stage: JoinStage) -> JobStage {
    match stage {
        JoinStage::Preparing => JobStage::Preparing,
        JoinStage::Joining => JobStage::Joining,
    }
}

fn map_failure(err: JoinError) -> JobFailure {
    match err {
        JoinError::EngineLoad(message) => JobFailure {
            kind: JobFailureKind::EngineLoad,
            message,
        },
        // The core rejects short lists before any effect; this arm is
        // defense against a desynchronized snapshot.
        JoinError::InsufficientClips => JobFailure {
            kind: JobFailureKind::Staging,
            message: "at least two clips are required".to_string(),
        },
        JoinError::Staging { name, message } => JobFailure {
            kind: JobFailureKind::Staging,
            message: format!("{name}: {message}"),
        },
        JoinError::Operation(message) => JobFailure {
            kind: JobFailureKind::Operation,
            message,
        },
        JoinError::Readback(message) => JobFailure {
            kind: JobFailureKind::Readback,
            message,
        },
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Default filename offered for the produced artifact.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "joined-video.mp4";

/// One input of a join, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipSource {
    pub file_name: String,
    pub path: PathBuf,
}

/// The joined result. `bytes` is a freshly owned copy; the engine's working
/// storage is released before this value is handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStage {
    Preparing,
    Joining,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Verbatim diagnostic line from the engine; advisory only.
    Log(String),
    /// Engine initialization settled. Emitted once per actual load.
    LoadCompleted { result: Result<(), String> },
    JoinProgress {
        stage: JoinStage,
    },
    JoinCompleted {
        result: Result<JoinOutput, JoinError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The engine binary could not be booted. Retryable by a fresh attempt.
    #[error("video engine failed to load: {0}")]
    EngineLoad(String),
    /// Guarded in the core before any engine call; kept here so the
    /// transaction's precondition is locally visible.
    #[error("at least two clips are required")]
    InsufficientClips,
    /// A clip's bytes could not be read or written into working storage.
    #[error("could not stage '{name}': {message}")]
    Staging { name: String, message: String },
    /// The concat call failed; the message is the engine's own text when
    /// it produced any.
    #[error("concat operation failed: {0}")]
    Operation(String),
    /// The output was missing, unreadable, or empty after the engine
    /// reported success.
    #[error("could not read joined output: {0}")]
    Readback(String),
}

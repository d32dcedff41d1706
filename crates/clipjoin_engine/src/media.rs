use async_trait::async_trait;
use thiserror::Error;

/// Failure at the engine boundary; the message is whatever the engine had
/// to say about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MediaError {
    pub message: String,
}

impl MediaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sink for free-text diagnostic lines. Zero or more calls during
/// `initialize` and `run_operation`; purely advisory.
pub trait LogSink: Send + Sync {
    fn line(&self, line: &str);
}

/// The opaque media collaborator: a private flat working storage of named
/// byte buffers plus one operation entry point.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// One-time boot; must succeed before any file or operation call.
    async fn initialize(&self, sink: &dyn LogSink) -> Result<(), MediaError>;

    /// Writes a named buffer into working storage. Names are caller-chosen
    /// and flat; no directories.
    async fn stage_file(&self, name: &str, bytes: &[u8]) -> Result<(), MediaError>;

    /// Deletes a named entry. Callers may ignore failures.
    async fn release_file(&self, name: &str) -> Result<(), MediaError>;

    /// Executes one operation against working storage with the exact
    /// documented argument sequence. Diagnostic lines stream to `sink`
    /// verbatim.
    async fn run_operation(&self, argv: &[String], sink: &dyn LogSink) -> Result<(), MediaError>;

    /// Retrieves the full contents of a named entry.
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, MediaError>;
}

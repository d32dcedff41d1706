#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Idempotent engine warm-up; concurrent requests share one load.
    EnsureEngineReady,
    /// Run one join over a frozen snapshot of the clip sequence.
    StartJoin { clips: Vec<crate::Clip> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// App shell finished booting; warm-load the engine.
    AppStarted,
    /// User picked files in the file dialog.
    ClipsPicked(Vec<crate::ClipFile>),
    /// Per-row remove control.
    RemoveClicked { clip_id: crate::ClipId },
    /// Per-row reorder control.
    MoveClicked {
        index: usize,
        direction: crate::MoveDirection,
    },
    /// Global clear control.
    ClearClicked,
    /// User submitted the current sequence for joining.
    JoinClicked,
    /// Engine initialization settled.
    EngineLoadFinished { result: Result<(), String> },
    /// Join progress from the engine.
    JobProgress { stage: crate::JobStage },
    /// Join completion from the engine.
    JobFinished {
        result: Result<crate::OutputArtifact, crate::JobFailure>,
    },
    /// Verbatim diagnostic line from the engine; advisory only.
    EngineLog(String),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

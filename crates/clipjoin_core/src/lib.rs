//! Clipjoin core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, Clip, ClipFile, ClipId, EngineState, JobFailure, JobFailureKind, JobStage, JobState,
    MoveDirection, OutputArtifact, CODEC_GUIDANCE, STATUS_DONE, STATUS_ENGINE_FAILED,
    STATUS_ENGINE_LOADING, STATUS_ENGINE_READY, STATUS_JOINING, STATUS_JOIN_FAILED,
    STATUS_NEED_TWO_CLIPS, STATUS_PICK_CLIPS, STATUS_PREPARING,
};
pub use update::update;
pub use view_model::{AppViewModel, ArtifactView, ClipRowView};

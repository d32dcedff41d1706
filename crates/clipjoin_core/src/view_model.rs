use crate::{ClipId, EngineState, JobState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub engine: EngineState,
    pub job: JobState,
    pub clips: Vec<ClipRowView>,
    /// Submit control is enabled only with at least two clips and no job
    /// in flight.
    pub can_join: bool,
    pub status: String,
    pub diagnostic: Option<String>,
    pub artifact: Option<ArtifactView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRowView {
    pub clip_id: ClipId,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactView {
    pub file_name: String,
    pub byte_len: u64,
}

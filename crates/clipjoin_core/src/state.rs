use std::path::PathBuf;

use crate::view_model::{AppViewModel, ArtifactView, ClipRowView};

pub type ClipId = u64;

pub const STATUS_PICK_CLIPS: &str = "Select at least two videos to join.";
pub const STATUS_ENGINE_LOADING: &str = "Loading video engine...";
pub const STATUS_ENGINE_READY: &str = "Video engine ready.";
pub const STATUS_ENGINE_FAILED: &str = "Video engine failed to load.";
pub const STATUS_NEED_TWO_CLIPS: &str = "Add at least two clips to join.";
pub const STATUS_PREPARING: &str = "Preparing files...";
pub const STATUS_JOINING: &str = "Joining videos...";
pub const STATUS_DONE: &str = "Combined video ready!";
pub const STATUS_JOIN_FAILED: &str = "Could not join the videos.";

/// Shown when the concat operation fails without a usable engine message.
/// Stream copy requires identical stream parameters across inputs.
pub const CODEC_GUIDANCE: &str =
    "Make sure every clip uses the same codec, resolution, and bitrate.";

/// Reference to one user-selected file. The bytes stay on disk; they are
/// read only when a job stages them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipFile {
    pub file_name: String,
    pub path: PathBuf,
}

/// One entry of the ordered clip sequence. The id exists for list identity
/// (reordering/removal) only and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub id: ClipId,
    pub file: ClipFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    LoadFailed,
}

/// Job sub-state; at most one join runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Toward index 0.
    Up,
    /// Toward the end of the list.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Preparing,
    Joining,
}

/// The joined output, retained until replaced or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFailureKind {
    EngineLoad,
    Staging,
    Operation,
    Readback,
}

/// A failed join; the message lands on the diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub kind: JobFailureKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    clips: Vec<Clip>,
    next_clip_id: ClipId,
    engine: EngineState,
    job: JobState,
    status: String,
    diagnostic: Option<String>,
    artifact: Option<OutputArtifact>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            next_clip_id: 1,
            engine: EngineState::default(),
            job: JobState::default(),
            status: STATUS_PICK_CLIPS.to_string(),
            diagnostic: None,
            artifact: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            engine: self.engine,
            job: self.job,
            clips: self
                .clips
                .iter()
                .map(|clip| ClipRowView {
                    clip_id: clip.id,
                    file_name: clip.file.file_name.clone(),
                })
                .collect(),
            can_join: self.clips.len() >= 2 && self.job == JobState::Idle,
            status: self.status.clone(),
            diagnostic: self.diagnostic.clone(),
            artifact: self.artifact.as_ref().map(|artifact| ArtifactView {
                file_name: artifact.file_name.clone(),
                byte_len: artifact.bytes.len() as u64,
            }),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// The retained output, for the save affordance. The view model carries
    /// only its metadata.
    pub fn artifact(&self) -> Option<&OutputArtifact> {
        self.artifact.as_ref()
    }

    pub(crate) fn job(&self) -> JobState {
        self.job
    }

    pub(crate) fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Appends one clip per file with a fresh id each; input order is
    /// preserved and nothing is deduplicated. Empty input is a no-op.
    pub(crate) fn add_clips(&mut self, files: Vec<ClipFile>) {
        if files.is_empty() {
            return;
        }
        for file in files {
            let id = self.next_clip_id;
            self.next_clip_id += 1;
            self.clips.push(Clip { id, file });
        }
        self.mark_dirty();
    }

    /// Removes the clip with this id; silent no-op if it is not present.
    pub(crate) fn remove_clip(&mut self, clip_id: ClipId) {
        let before = self.clips.len();
        self.clips.retain(|clip| clip.id != clip_id);
        if self.clips.len() != before {
            self.mark_dirty();
        }
    }

    /// Swaps the clip at `index` with its neighbor; silent no-op when the
    /// move would leave the list bounds.
    pub(crate) fn move_clip(&mut self, index: usize, direction: MoveDirection) {
        let neighbor = match direction {
            MoveDirection::Up => {
                if index == 0 || index >= self.clips.len() {
                    return;
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 >= self.clips.len() {
                    return;
                }
                index + 1
            }
        };
        self.clips.swap(index, neighbor);
        self.mark_dirty();
    }

    /// Empties the sequence and drops any retained artifact.
    pub(crate) fn clear_all(&mut self) {
        if self.clips.is_empty() && self.artifact.is_none() {
            return;
        }
        self.clips.clear();
        self.artifact = None;
        self.status = STATUS_PICK_CLIPS.to_string();
        self.diagnostic = None;
        self.mark_dirty();
    }

    /// Starts an engine load if one is warranted. Returns false when the
    /// engine is already loading or ready, so no duplicate effect is emitted.
    pub(crate) fn begin_engine_load(&mut self) -> bool {
        match self.engine {
            EngineState::Loading | EngineState::Ready => false,
            EngineState::Uninitialized | EngineState::LoadFailed => {
                self.engine = EngineState::Loading;
                self.status = STATUS_ENGINE_LOADING.to_string();
                self.mark_dirty();
                true
            }
        }
    }

    pub(crate) fn engine_load_finished(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.engine = EngineState::Ready;
                // Mid-job the status line belongs to the job stages.
                if self.job == JobState::Idle {
                    self.status = STATUS_ENGINE_READY.to_string();
                }
            }
            Err(message) => {
                self.engine = EngineState::LoadFailed;
                if self.job == JobState::Idle {
                    self.status = STATUS_ENGINE_FAILED.to_string();
                    self.diagnostic = Some(message);
                }
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn reject_short_join(&mut self) {
        self.status = STATUS_NEED_TWO_CLIPS.to_string();
        self.diagnostic = None;
        self.mark_dirty();
    }

    /// Freezes the clip order for one job, releases the previous artifact,
    /// and enters `Running`. The returned snapshot travels inside the effect.
    pub(crate) fn begin_job(&mut self) -> Vec<Clip> {
        self.artifact = None;
        self.job = JobState::Running;
        self.status = STATUS_PREPARING.to_string();
        self.diagnostic = None;
        if self.engine != EngineState::Ready {
            self.engine = EngineState::Loading;
        }
        self.mark_dirty();
        self.clips.clone()
    }

    pub(crate) fn job_progress(&mut self, stage: JobStage) {
        if self.job != JobState::Running {
            return;
        }
        self.status = match stage {
            JobStage::Preparing => STATUS_PREPARING.to_string(),
            JobStage::Joining => STATUS_JOINING.to_string(),
        };
        self.mark_dirty();
    }

    pub(crate) fn job_finished(&mut self, result: Result<OutputArtifact, JobFailure>) {
        self.job = JobState::Idle;
        match result {
            Ok(artifact) => {
                self.artifact = Some(artifact);
                self.status = STATUS_DONE.to_string();
                self.diagnostic = None;
            }
            Err(failure) => {
                self.artifact = None;
                match failure.kind {
                    JobFailureKind::EngineLoad => {
                        self.status = STATUS_ENGINE_FAILED.to_string();
                        self.diagnostic = Some(failure.message);
                    }
                    JobFailureKind::Operation => {
                        self.status = STATUS_JOIN_FAILED.to_string();
                        self.diagnostic = if failure.message.trim().is_empty() {
                            Some(CODEC_GUIDANCE.to_string())
                        } else {
                            Some(failure.message)
                        };
                    }
                    JobFailureKind::Staging | JobFailureKind::Readback => {
                        self.status = STATUS_JOIN_FAILED.to_string();
                        self.diagnostic = Some(failure.message);
                    }
                }
            }
        }
        self.mark_dirty();
    }

    /// Advisory engine output; shown verbatim, never drives control flow.
    pub(crate) fn record_log(&mut self, line: String) {
        self.diagnostic = Some(line);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

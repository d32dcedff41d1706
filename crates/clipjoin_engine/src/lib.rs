//! Clipjoin engine: media-engine boundary and join execution.
mod engine;
mod ffmpeg;
mod join;
mod media;
mod playlist;
mod types;

pub use engine::EngineHandle;
pub use ffmpeg::{EngineSettings, FfmpegEngine};
pub use join::{run_join, ChannelProgressSink, ProgressSink};
pub use media::{LogSink, MediaEngine, MediaError};
pub use playlist::{build_playlist, concat_argv, staged_clip_name, OUTPUT_NAME, PLAYLIST_NAME};
pub use types::{
    ClipSource, EngineEvent, JoinError, JoinOutput, JoinStage, DEFAULT_OUTPUT_FILE_NAME,
};

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::media::{LogSink, MediaEngine, MediaError};

/// Stderr lines kept for the failure message when an operation exits
/// non-zero.
const STDERR_TAIL_LINES: usize = 8;

/// How the subprocess engine is located.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Binary name or absolute path; resolved through PATH when bare.
    pub ffmpeg_path: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

/// FFmpeg subprocess engine.
///
/// Working storage is a private flat temporary directory created by
/// `initialize`, which also probes the binary so a missing installation
/// fails the load rather than the first job.
pub struct FfmpegEngine {
    settings: EngineSettings,
    storage: Mutex<Option<Arc<TempDir>>>,
}

impl FfmpegEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            storage: Mutex::new(None),
        }
    }

    fn storage_dir(&self) -> Result<Arc<TempDir>, MediaError> {
        self.storage
            .lock()
            .expect("storage lock")
            .clone()
            .ok_or_else(|| MediaError::new("engine is not initialized"))
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf, MediaError> {
        validate_name(name)?;
        Ok(self.storage_dir()?.path().join(name))
    }

    #[cfg(test)]
    fn open_storage_for_tests(&self) {
        let dir = TempDir::new().expect("tempdir");
        *self.storage.lock().expect("storage lock") = Some(Arc::new(dir));
    }
}

/// Working storage is flat: reject separators and traversal outright.
fn validate_name(name: &str) -> Result<(), MediaError> {
    let flat = !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != "..";
    if flat {
        Ok(())
    } else {
        Err(MediaError::new(format!(
            "invalid working-storage name '{name}'"
        )))
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn initialize(&self, sink: &dyn LogSink) -> Result<(), MediaError> {
        let output = Command::new(&self.settings.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| {
                MediaError::new(format!(
                    "could not start {}: {err}",
                    self.settings.ffmpeg_path.display()
                ))
            })?;
        if !output.status.success() {
            return Err(MediaError::new(format!(
                "version probe failed with {}",
                output.status
            )));
        }
        if let Some(first_line) = String::from_utf8_lossy(&output.stdout).lines().next() {
            sink.line(first_line);
        }

        let dir = TempDir::new()
            .map_err(|err| MediaError::new(format!("could not create working storage: {err}")))?;
        *self.storage.lock().expect("storage lock") = Some(Arc::new(dir));
        Ok(())
    }

    async fn stage_file(&self, name: &str, bytes: &[u8]) -> Result<(), MediaError> {
        let path = self.entry_path(name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| MediaError::new(format!("write '{name}': {err}")))
    }

    async fn release_file(&self, name: &str) -> Result<(), MediaError> {
        let path = self.entry_path(name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|err| MediaError::new(format!("remove '{name}': {err}")))
    }

    async fn run_operation(&self, argv: &[String], sink: &dyn LogSink) -> Result<(), MediaError> {
        let dir = self.storage_dir()?;
        let mut child = Command::new(&self.settings.ffmpeg_path)
            .args(argv)
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| MediaError::new(format!("could not start engine: {err}")))?;

        // FFmpeg talks on stderr; forward every line verbatim and keep a
        // short tail for the failure message.
        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        if let Some(stderr) = child.stderr.take() {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line.clone());
                sink.line(&line);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|err| MediaError::new(format!("engine did not exit cleanly: {err}")))?;
        if status.success() {
            Ok(())
        } else {
            let message = tail.into_iter().collect::<Vec<_>>().join("\n");
            Err(MediaError::new(if message.is_empty() {
                format!("engine exited with {status}")
            } else {
                message
            }))
        }
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, MediaError> {
        let path = self.entry_path(name)?;
        tokio::fs::read(&path)
            .await
            .map_err(|err| MediaError::new(format!("read '{name}': {err}")))
    }
}

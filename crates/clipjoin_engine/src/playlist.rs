//! Staged-name derivation and the concat manifest handed to the engine.

/// Fixed working-storage name for the playlist.
pub const PLAYLIST_NAME: &str = "concat.txt";
/// Fixed working-storage name for the produced output.
pub const OUTPUT_NAME: &str = "joined-output.mp4";

/// Temporary name for the clip at `index`, keeping the original extension
/// so the demuxer recognizes the container. Falls back to `mp4` when the
/// original name has no usable extension.
pub fn staged_clip_name(index: usize, original_name: &str) -> String {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("mp4");
    format!("clip-{index}.{ext}")
}

/// One `file '<name>'` line per staged clip, in snapshot order. Staged names
/// are generated by [`staged_clip_name`] and never contain quotes, so no
/// escaping is needed.
pub fn build_playlist(names: &[String]) -> String {
    let mut playlist = String::new();
    for name in names {
        playlist.push_str("file '");
        playlist.push_str(name);
        playlist.push_str("'\n");
    }
    playlist
}

/// The exact argument sequence for demux-concat with stream copy: playlist
/// input, no re-encoding, single named output.
pub fn concat_argv(playlist: &str, output: &str) -> Vec<String> {
    ["-f", "concat", "-safe", "0", "-i", playlist, "-c", "copy", output]
        .into_iter()
        .map(str::to_string)
        .collect()
}

use std::path::{Path, PathBuf};

use crate::{export::ExportFormat, video::VideoDescriptor};

/// Directory exports land in when no path is given.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytknow")
}

/// File name for an export of the given segment.
pub fn export_file_name(video: &VideoDescriptor, format: ExportFormat) -> String {
    let id: String = video
        .video_id()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    let id = if id.is_empty() { "video".to_string() } else { id };
    format!(
        "knowledge_{}_{}-{}.{}",
        id,
        video.start_seconds(),
        video.end_seconds(),
        format.extension()
    )
}

pub fn get_export_path(dir: &Path, video: &VideoDescriptor, format: ExportFormat) -> PathBuf {
    dir.join(export_file_name(video, format))
}

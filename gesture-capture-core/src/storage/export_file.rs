use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::archive::builder::ArchiveOutput;
use crate::models::error::CaptureError;
use crate::models::session::{Session, SessionSummary};

/// Metadata stored alongside an exported archive.
///
/// Serializable for JSON export to a backend or the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub id: String,
    pub label: String,
    pub file_name: String,
    pub checksum: String,
    pub session_count: u32,
    pub total_frame_count: u32,
    pub created_at: String,
    pub sessions: Vec<SessionSummary>,
}

impl ExportMetadata {
    pub fn new(output: &ArchiveOutput, label: &str, sessions: &[Session]) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.to_string(),
            file_name: output.file_name.clone(),
            checksum: output.checksum.clone(),
            session_count: sessions.len() as u32,
            total_frame_count: sessions.iter().map(|s| s.frame_count() as u32).sum(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sessions: sessions.iter().map(Session::summary).collect(),
        }
    }
}

/// Write the archive bytes into `directory` under the generated file name.
///
/// Creates the directory if needed. Returns the full path of the written
/// archive. The save step is presentation-layer convenience; the builder
/// itself never touches the filesystem.
pub fn save_archive(output: &ArchiveOutput, directory: &Path) -> Result<PathBuf, CaptureError> {
    fs::create_dir_all(directory)
        .map_err(|e| CaptureError::Storage(format!("failed to create directory: {}", e)))?;

    let path = directory.join(&output.file_name);
    fs::write(&path, &output.bytes)
        .map_err(|e| CaptureError::Storage(format!("failed to write archive: {}", e)))?;
    Ok(path)
}

/// Write export metadata as a JSON sidecar file.
///
/// Creates `{archive_path}.metadata.json` next to the archive.
pub fn write_metadata(metadata: &ExportMetadata, archive_path: &Path) -> Result<(), CaptureError> {
    let metadata_path = archive_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CaptureError::Storage(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&metadata_path, json)
        .map_err(|e| CaptureError::Storage(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read export metadata from a JSON sidecar file.
pub fn read_metadata(archive_path: &Path) -> Result<ExportMetadata, CaptureError> {
    let metadata_path = archive_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| CaptureError::Storage(format!("failed to read metadata: {}", e)))?;
    let metadata: ExportMetadata = serde_json::from_str(&json)
        .map_err(|e| CaptureError::Storage(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

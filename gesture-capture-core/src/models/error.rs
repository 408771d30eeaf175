use thiserror::Error;

/// Errors that can occur during capture and export operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("a capture session is already running")]
    AlreadyRunning,

    #[error("capture device error: {0}")]
    CaptureDevice(String),

    #[error("session cancelled")]
    Cancelled,

    #[error("invalid label: {0}")]
    InvalidLabel(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("nothing to export")]
    EmptyExport,

    #[error("archive engine not available")]
    DependencyUnavailable,

    #[error("archive structure error: {0}")]
    ArchiveStructure(String),

    #[error("invalid frame data in recording {recording}, frame {frame}: {reason}")]
    InvalidFrameData {
        recording: u32,
        frame: u32,
        reason: String,
    },

    #[error("archive encoding failed: {0}")]
    ArchiveEncoding(String),

    #[error("an export is already in progress")]
    ExportInProgress,

    #[error("storage error: {0}")]
    Storage(String),
}

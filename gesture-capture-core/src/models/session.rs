use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::frame::Frame;
use super::label::Label;

/// One completed capture run.
///
/// Minted by the session store, which owns index assignment. Frames keep
/// insertion order; that order is temporal and must not be rearranged.
/// A session with zero frames is legal and is skipped, not rejected, at
/// export time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    label: Label,
    recording_index: u32,
    frames: Vec<Frame>,
    completed_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(
        label: Label,
        recording_index: u32,
        frames: Vec<Frame>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            label,
            recording_index,
            frames,
            completed_at,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// 1-based recording index, unique within the owning label workflow.
    pub fn recording_index(&self) -> u32 {
        self.recording_index
    }

    /// Frames in capture order. Read-only; the archive builder borrows them.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Presentation-facing summary of this session.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: uuid::Uuid::new_v4().to_string(),
            label: self.label.as_str().to_string(),
            recording_index: self.recording_index,
            frame_count: self.frames.len() as u32,
            duration_ms: self.frames.last().map(Frame::elapsed_ms).unwrap_or(0),
            completed_at: self.completed_at.to_rfc3339(),
        }
    }
}

/// Serializable session record for the presentation layer and the export
/// metadata sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub label: String,
    pub recording_index: u32,
    pub frame_count: u32,
    pub duration_ms: u64,
    pub completed_at: String,
}

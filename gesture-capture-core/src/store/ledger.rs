use chrono::Utc;

use crate::models::frame::Frame;
use crate::models::label::Label;
use crate::models::session::Session;

/// Append-only in-memory ledger of completed capture sessions.
///
/// Owns recording-index assignment: indices start at 1 and increase
/// strictly, with no gaps or reuse, for the lifetime of a label workflow.
/// A later export failure never rolls an index back. `reset` is the only
/// deletion path; sessions are never removed singly.
#[derive(Debug)]
pub struct SessionStore {
    label: Label,
    sessions: Vec<Session>,
    next_index: u32,
}

impl SessionStore {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            sessions: Vec::new(),
            next_index: 1,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Commit one completed capture run.
    ///
    /// Assigns the next recording index, stamps the owning label and a
    /// completion timestamp, and appends. Frame content is not validated
    /// here; validation belongs to export.
    pub fn append(&mut self, frames: Vec<Frame>) -> &Session {
        let index = self.next_index;
        self.next_index += 1;

        let session = Session::new(self.label.clone(), index, frames, Utc::now());
        log::debug!(
            "committed recording {} for {:?} ({} frame(s))",
            index,
            self.label.as_str(),
            session.frame_count()
        );
        self.sessions.push(session);
        self.sessions.last().expect("session was just pushed")
    }

    /// Clear all sessions and restart indexing for a new label workflow.
    pub fn reset(&mut self, label: Label) {
        self.label = label;
        self.sessions.clear();
        self.next_index = 1;
    }

    /// Sessions in commit order (ascending recording index).
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn total_frame_count(&self) -> usize {
        self.sessions.iter().map(Session::frame_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

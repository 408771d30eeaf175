use crate::models::error::CaptureError;
use crate::models::session::SessionSummary;
use crate::models::state::SchedulerState;

/// Event observer for capture workflow notifications.
///
/// All methods are called from the thread driving the session, not the UI
/// thread. Implementations should marshal to the UI thread if needed.
pub trait CaptureObserver: Send + Sync {
    /// Called when the scheduler state changes.
    fn on_state_changed(&self, state: &SchedulerState);

    /// Called once per second during the countdown lead-in.
    fn on_countdown_tick(&self, seconds_remaining: u32);

    /// Called after every captured frame with overall session progress.
    ///
    /// Values are in `0..=100` and monotonically non-decreasing within one
    /// session.
    fn on_progress(&self, percent: u8);

    /// Called when a completed session has been committed to the store.
    fn on_session_committed(&self, session: &SessionSummary);

    /// Called when a session or export attempt fails.
    fn on_error(&self, error: &CaptureError);
}

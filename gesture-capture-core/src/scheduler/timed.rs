use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::frame::Frame;
use crate::models::label::Label;
use crate::models::state::SchedulerState;
use crate::traits::capture_observer::CaptureObserver;
use crate::traits::frame_source::FrameSource;

/// State shared between the scheduler, its cancel handles, and any thread
/// querying session state.
struct SchedulerShared {
    state: Mutex<SchedulerState>,
    active: AtomicBool,
    cancel_requested: AtomicBool,
}

impl SchedulerShared {
    fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState::Idle),
            active: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
        }
    }
}

/// Handle for cancelling an in-flight session from another thread.
///
/// Cancellation is cooperative: it takes effect at the next countdown or
/// sampling tick, bounded by one interval. The flag is re-armed when the
/// next session starts, so a cancel issued while idle has no effect.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<SchedulerShared>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.shared.cancel_requested.store(true, Ordering::SeqCst);
    }
}

/// Releases the active-session flag and restores `Idle` on every exit path,
/// including panics and early error returns.
struct ActiveGuard<'a> {
    shared: &'a SchedulerShared,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        *self.shared.state.lock() = SchedulerState::Idle;
        self.shared.active.store(false, Ordering::SeqCst);
    }
}

/// Timed capture scheduler.
///
/// Drives one session at a time against a [`FrameSource`]: a countdown
/// lead-in with one tick per second, then a sampling phase that captures
/// `target_frame_count` stills evenly spaced over `sampling_duration_ms`.
///
/// Tick deadlines are computed from absolute elapsed time
/// (`sampling_start + k * interval`), not from "interval after the previous
/// capture returned", so device-side jitter does not accumulate drift over
/// a session. If a capture overruns one or more intervals the missed ticks
/// are skipped, never replayed back-to-back, and the session may end with
/// fewer frames than the target.
pub struct CaptureScheduler<S: FrameSource> {
    source: Mutex<S>,
    config: CaptureConfiguration,
    observer: Option<Arc<dyn CaptureObserver>>,
    shared: Arc<SchedulerShared>,
}

impl<S: FrameSource> CaptureScheduler<S> {
    pub fn new(source: S, config: CaptureConfiguration) -> Self {
        Self {
            source: Mutex::new(source),
            config,
            observer: None,
            shared: Arc::new(SchedulerShared::new()),
        }
    }

    pub fn set_observer(&mut self, observer: Arc<dyn CaptureObserver>) {
        self.observer = Some(observer);
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.state.lock().clone()
    }

    pub fn config(&self) -> &CaptureConfiguration {
        &self.config
    }

    /// Handle for cancelling the in-flight session from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Run one capture session to completion.
    ///
    /// Blocks the calling thread for the countdown plus the sampling window.
    /// At most one session runs at a time; an overlapping call fails
    /// immediately with `AlreadyRunning` and does not disturb the running
    /// session.
    ///
    /// On success returns the captured frames, in order, ready to be
    /// committed to a session store. On error or cancellation the frames
    /// captured so far are discarded and nothing is committed.
    pub fn start_session(&self, label: &Label) -> Result<Vec<Frame>, CaptureError> {
        if self
            .shared
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CaptureError::AlreadyRunning);
        }
        // Cancel applies to the session it was issued against, not the next.
        self.shared.cancel_requested.store(false, Ordering::SeqCst);
        let _guard = ActiveGuard {
            shared: &self.shared,
        };

        let result = self.run_session(label);
        match &result {
            Ok(frames) => {
                log::info!(
                    "capture session for {:?} completed with {} frame(s)",
                    label.as_str(),
                    frames.len()
                );
                self.set_state(SchedulerState::Completed {
                    frame_count: frames.len() as u32,
                });
            }
            Err(err) => {
                log::warn!("capture session for {:?} aborted: {}", label.as_str(), err);
                self.set_state(SchedulerState::Aborted(err.clone()));
                if let Some(ref observer) = self.observer {
                    observer.on_error(err);
                }
            }
        }
        result
    }

    fn run_session(&self, label: &Label) -> Result<Vec<Frame>, CaptureError> {
        if !self.source.lock().is_available() {
            return Err(CaptureError::CaptureDevice(
                "frame source is not available".into(),
            ));
        }
        log::debug!("starting capture session for label {:?}", label.as_str());

        self.run_countdown()?;
        self.run_sampling()
    }

    /// Countdown lead-in: no frames, one state change and observer tick per
    /// second, cancellable at each tick.
    fn run_countdown(&self) -> Result<(), CaptureError> {
        let secs = self.config.countdown_secs;
        if secs == 0 {
            return Ok(());
        }

        let started = Instant::now();
        for tick in 0..secs {
            self.check_cancelled()?;

            let remaining = secs - tick;
            self.set_state(SchedulerState::Countdown {
                seconds_remaining: remaining,
            });
            if let Some(ref observer) = self.observer {
                observer.on_countdown_tick(remaining);
            }

            sleep_until(started + Duration::from_secs(u64::from(tick) + 1));
        }
        self.check_cancelled()
    }

    fn run_sampling(&self) -> Result<Vec<Frame>, CaptureError> {
        let target = self.config.target_frame_count;
        let duration = self.config.sampling_duration();
        let interval = self.config.sampling_interval();

        self.set_state(SchedulerState::Recording { captured: 0 });

        let mut frames: Vec<Frame> = Vec::with_capacity(target as usize);
        let started = Instant::now();
        let mut tick: u32 = 0;

        loop {
            let elapsed = started.elapsed();
            if frames.len() as u32 >= target || elapsed >= duration {
                break;
            }
            self.check_cancelled()?;

            // Offset is taken at capture request, before the device call, so
            // it stays within the sampling window regardless of encode time.
            let elapsed_ms = elapsed.as_millis() as u64;
            let image = self.source.lock().capture_still()?;

            let position = frames.len() as u32 + 1;
            frames.push(Frame::new(image, elapsed_ms, position));

            let captured = frames.len() as u32;
            self.set_state(SchedulerState::Recording { captured });
            if let Some(ref observer) = self.observer {
                observer.on_progress((u64::from(captured) * 100 / u64::from(target)) as u8);
            }

            tick += 1;
            let next_due = first_future_tick(started.elapsed(), interval);
            if next_due > tick {
                log::warn!(
                    "capture overran the schedule, skipping {} tick(s)",
                    next_due - tick
                );
                tick = next_due;
            }
            sleep_until(started + interval * tick);
        }

        Ok(frames)
    }

    fn check_cancelled(&self) -> Result<(), CaptureError> {
        if self.shared.cancel_requested.load(Ordering::SeqCst) {
            Err(CaptureError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn set_state(&self, new_state: SchedulerState) {
        {
            let mut state = self.shared.state.lock();
            *state = new_state.clone();
        }
        if let Some(ref observer) = self.observer {
            observer.on_state_changed(&new_state);
        }
    }
}

/// Index of the first tick whose absolute deadline is still in the future.
fn first_future_tick(elapsed: Duration, interval: Duration) -> u32 {
    (elapsed.as_nanos() / interval.as_nanos()) as u32 + 1
}

fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if deadline > now {
        thread::sleep(deadline - now);
    }
}

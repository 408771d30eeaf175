use std::sync::Arc;

use crate::archive::builder::{ArchiveBuilder, ArchiveOutput};
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::label::Label;
use crate::models::session::Session;
use crate::models::state::SchedulerState;
use crate::scheduler::timed::{CancelHandle, CaptureScheduler};
use crate::store::ledger::SessionStore;
use crate::traits::archive_engine::ArchiveEngine;
use crate::traits::capture_observer::CaptureObserver;
use crate::traits::frame_source::FrameSource;

/// Owns all mutable state of one label workflow.
///
/// Created when the user commits to a label, discarded or restarted when
/// the workflow resets. The label, session ledger, scheduler flags, and
/// export flag all live here; there are no ambient globals.
///
/// ```text
/// [FrameSource] → CaptureScheduler → SessionStore → ArchiveBuilder → [bytes]
///                        │                                │
///                        └────────── CaptureObserver ─────┘
/// ```
pub struct CaptureWorkflow<S: FrameSource, E: ArchiveEngine> {
    config: CaptureConfiguration,
    scheduler: CaptureScheduler<S>,
    store: SessionStore,
    archiver: ArchiveBuilder<E>,
    observer: Option<Arc<dyn CaptureObserver>>,
}

impl<S: FrameSource, E: ArchiveEngine> CaptureWorkflow<S, E> {
    /// Validate the configuration and label, then assemble the workflow.
    pub fn new(
        raw_label: &str,
        config: CaptureConfiguration,
        source: S,
        engine: E,
    ) -> Result<Self, CaptureError> {
        config
            .validate()
            .map_err(CaptureError::ConfigurationFailed)?;
        let label = Label::parse(raw_label, &config.label_rules)?;

        let scheduler = CaptureScheduler::new(source, config.clone());
        let archiver = ArchiveBuilder::new(engine, config.frame_extension.clone());
        Ok(Self {
            config,
            scheduler,
            store: SessionStore::new(label),
            archiver,
            observer: None,
        })
    }

    pub fn set_observer(&mut self, observer: Arc<dyn CaptureObserver>) {
        self.scheduler.set_observer(observer.clone());
        self.observer = Some(observer);
    }

    pub fn label(&self) -> &Label {
        self.store.label()
    }

    pub fn config(&self) -> &CaptureConfiguration {
        &self.config
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn session_count(&self) -> usize {
        self.store.count()
    }

    pub fn total_frame_count(&self) -> usize {
        self.store.total_frame_count()
    }

    pub fn sessions(&self) -> &[Session] {
        self.store.sessions()
    }

    /// Handle for cancelling an in-flight session from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.scheduler.cancel_handle()
    }

    /// Run one capture session and commit it to the ledger.
    ///
    /// A failed or cancelled session commits nothing; the assigned index
    /// sequence only advances on success.
    pub fn record(&mut self) -> Result<&Session, CaptureError> {
        let frames = self.scheduler.start_session(self.store.label())?;
        let session = self.store.append(frames);
        if let Some(ref observer) = self.observer {
            observer.on_session_committed(&session.summary());
        }
        Ok(session)
    }

    /// Build the export archive from everything recorded so far.
    ///
    /// Never consumes or mutates the ledger: a failed export can be retried
    /// without re-recording.
    pub fn export(&self) -> Result<ArchiveOutput, CaptureError> {
        let result = self.archiver.build(self.store.label(), self.store.sessions());
        if let Err(ref err) = result {
            if let Some(ref observer) = self.observer {
                observer.on_error(err);
            }
        }
        result
    }

    /// Start over under a new label: clears the ledger and restarts
    /// recording indices at 1. This is the only deletion path.
    pub fn restart(&mut self, raw_label: &str) -> Result<(), CaptureError> {
        let label = Label::parse(raw_label, &self.config.label_rules)?;
        log::info!(
            "restarting workflow: {:?} → {:?}",
            self.store.label().as_str(),
            label.as_str()
        );
        self.store.reset(label);
        Ok(())
    }
}

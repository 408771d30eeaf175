//! # gesture-capture-core
//!
//! Platform-agnostic gesture capture core library.
//!
//! Drives timed still-image capture sessions against a pluggable frame
//! source, keeps a per-label ledger of completed recordings, and packages
//! everything into a ZIP archive for download. Device backends (cameras,
//! the synthetic source in `gesture-capture-sim`) implement the
//! `FrameSource` trait and plug into the generic `CaptureWorkflow`.
//!
//! ## Architecture
//!
//! ```text
//! gesture-capture-core (this crate)
//! ├── traits/       ← FrameSource, CaptureObserver, ArchiveEngine
//! ├── models/       ← CaptureError, SchedulerState, CaptureConfiguration, Label, Frame, Session
//! ├── processing/   ← data-URL decoding, archive entry naming
//! ├── scheduler/    ← CaptureScheduler (countdown + anchored sampling loop)
//! ├── store/        ← SessionStore (append-only recording ledger)
//! ├── archive/      ← ArchiveBuilder, ZipEngine
//! ├── storage/      ← archive save + metadata sidecar
//! └── workflow/     ← CaptureWorkflow (per-label orchestrator)
//! ```

pub mod archive;
pub mod models;
pub mod processing;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod traits;
pub mod workflow;

// Re-export key types at crate root for convenience.
pub use archive::builder::{ArchiveBuilder, ArchiveOutput};
pub use archive::zip_engine::ZipEngine;
pub use models::config::{CaptureConfiguration, LabelRules};
pub use models::error::CaptureError;
pub use models::frame::{EncodedImage, Frame};
pub use models::label::Label;
pub use models::session::{Session, SessionSummary};
pub use models::state::SchedulerState;
pub use scheduler::timed::{CancelHandle, CaptureScheduler};
pub use storage::export_file::ExportMetadata;
pub use store::ledger::SessionStore;
pub use traits::archive_engine::{ArchiveEngine, ArchiveJob};
pub use traits::capture_observer::CaptureObserver;
pub use traits::frame_source::FrameSource;
pub use workflow::context::CaptureWorkflow;

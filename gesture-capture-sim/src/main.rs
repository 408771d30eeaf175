//! Demo driver: records two synthetic capture sessions and exports them.
//!
//! ```text
//! cargo run -p gesture-capture-sim -- <label>
//! ```

use std::sync::Arc;

use gesture_capture_core::storage::export_file::{save_archive, write_metadata};
use gesture_capture_core::{
    CaptureConfiguration, CaptureError, CaptureObserver, CaptureWorkflow, ExportMetadata,
    SchedulerState, SessionSummary, ZipEngine,
};
use gesture_capture_sim::SyntheticFrameSource;

struct ConsoleObserver;

impl CaptureObserver for ConsoleObserver {
    fn on_state_changed(&self, state: &SchedulerState) {
        if let SchedulerState::Completed { frame_count } = state {
            println!("recording complete: {} frame(s)", frame_count);
        }
    }

    fn on_countdown_tick(&self, seconds_remaining: u32) {
        println!("starting in {}...", seconds_remaining);
    }

    fn on_progress(&self, percent: u8) {
        if percent % 25 == 0 {
            println!("  {}%", percent);
        }
    }

    fn on_session_committed(&self, session: &SessionSummary) {
        println!(
            "committed recording {} ({} frames, {} ms)",
            session.recording_index, session.frame_count, session.duration_ms
        );
    }

    fn on_error(&self, error: &CaptureError) {
        eprintln!("capture error: {}", error);
    }
}

fn run(label: &str) -> Result<(), CaptureError> {
    let config = CaptureConfiguration {
        sampling_duration_ms: 2000,
        target_frame_count: 20,
        countdown_secs: 3,
        ..Default::default()
    };

    let mut workflow = CaptureWorkflow::new(
        label,
        config,
        SyntheticFrameSource::new(),
        ZipEngine::default(),
    )?;
    workflow.set_observer(Arc::new(ConsoleObserver));

    for _ in 0..2 {
        workflow.record()?;
    }

    let output = workflow.export()?;
    let directory = std::env::temp_dir().join("gesture-capture-demo");
    let path = save_archive(&output, &directory)?;

    let metadata = ExportMetadata::new(&output, workflow.label().as_str(), workflow.sessions());
    write_metadata(&metadata, &path)?;

    println!(
        "wrote {} ({} bytes, sha256 {})",
        path.display(),
        output.bytes.len(),
        output.checksum
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let label = std::env::args().nth(1).unwrap_or_else(|| "hola".into());
    if let Err(err) = run(&label) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

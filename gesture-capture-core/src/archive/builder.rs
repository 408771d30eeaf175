use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::models::error::CaptureError;
use crate::models::label::Label;
use crate::models::session::Session;
use crate::processing::data_url;
use crate::processing::naming;
use crate::traits::archive_engine::{ArchiveEngine, ArchiveJob as _};

/// The finished export artifact: container bytes plus the generated
/// download file name and a SHA-256 hex digest of the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutput {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub checksum: String,
}

/// Releases the in-progress flag on every exit path.
struct BuildGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Assembles one export archive from the session store contents.
///
/// Layout contract:
/// ```text
/// <label>/
///   <label>_<NNN>/          one per non-empty session, ledger index
///     frame_<NNN>.<ext>     one per frame with a payload, stored position
/// ```
///
/// Per-item tolerance: zero-frame sessions and empty-payload frames are
/// skipped with a log line. Malformed payloads are fatal to the whole
/// export; a silently missing frame inside an otherwise numbered sequence
/// would corrupt downstream training-data consumption, so nothing partial
/// is ever returned. Frame entry numbering uses the stored sequence
/// position, never the post-filter loop index, so skips leave gaps instead
/// of renumbering frames out of sync with their capture order.
///
/// The builder never mutates the store it reads, and at most one build may
/// be in flight per builder instance.
pub struct ArchiveBuilder<E: ArchiveEngine> {
    engine: E,
    frame_extension: String,
    in_progress: AtomicBool,
}

impl<E: ArchiveEngine> ArchiveBuilder<E> {
    pub fn new(engine: E, frame_extension: impl Into<String>) -> Self {
        Self {
            engine,
            frame_extension: frame_extension.into(),
            in_progress: AtomicBool::new(false),
        }
    }

    /// Build an archive from `sessions`, in stored order.
    ///
    /// Fails up front with `EmptyExport` when there is nothing to pack and
    /// `DependencyUnavailable` when the engine is gone; fails during
    /// assembly per the tolerance rules above. A concurrent invocation is
    /// rejected with `ExportInProgress`, not queued.
    pub fn build(&self, label: &Label, sessions: &[Session]) -> Result<ArchiveOutput, CaptureError> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CaptureError::ExportInProgress);
        }
        let _guard = BuildGuard {
            flag: &self.in_progress,
        };

        if sessions.iter().all(Session::is_empty) {
            return Err(CaptureError::EmptyExport);
        }
        if !self.engine.is_available() {
            return Err(CaptureError::DependencyUnavailable);
        }

        let mut job = self
            .engine
            .begin()
            .map_err(CaptureError::ArchiveEncoding)?;

        job.add_directory(label.as_str())
            .map_err(CaptureError::ArchiveStructure)?;

        for session in sessions {
            if session.is_empty() {
                log::info!(
                    "skipping recording {} of {:?}: no frames",
                    session.recording_index(),
                    label.as_str()
                );
                continue;
            }

            let dir = format!(
                "{}/{}",
                label,
                naming::session_dir_name(label, session.recording_index())
            );
            job.add_directory(&dir)
                .map_err(CaptureError::ArchiveStructure)?;

            for frame in session.frames() {
                if frame.image().is_empty() {
                    log::warn!(
                        "skipping frame {} of recording {}: no payload",
                        frame.position(),
                        session.recording_index()
                    );
                    continue;
                }

                let decoded = data_url::decode_image_data_url(frame.image().as_str()).map_err(
                    |reason| CaptureError::InvalidFrameData {
                        recording: session.recording_index(),
                        frame: frame.position(),
                        reason,
                    },
                )?;

                let path = format!(
                    "{}/{}",
                    dir,
                    naming::frame_file_name(frame.position(), &self.frame_extension)
                );
                job.add_file(&path, &decoded.bytes)
                    .map_err(CaptureError::ArchiveStructure)?;
            }
        }

        let bytes = job.finish().map_err(CaptureError::ArchiveEncoding)?;
        if bytes.is_empty() {
            return Err(CaptureError::ArchiveEncoding(
                "encoder produced no output".into(),
            ));
        }

        let checksum = hex_encode(&Sha256::digest(&bytes));
        let file_name = naming::archive_file_name(label, Utc::now());
        log::info!(
            "built archive {} ({} bytes, {} session(s))",
            file_name,
            bytes.len(),
            sessions.iter().filter(|s| !s.is_empty()).count()
        );

        Ok(ArchiveOutput {
            bytes,
            file_name,
            checksum,
        })
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    use crate::archive::zip_engine::ZipEngine;
    use crate::models::config::LabelRules;
    use crate::models::frame::{EncodedImage, Frame};
    use crate::traits::archive_engine::ArchiveJob;

    fn label(s: &str) -> Label {
        Label::parse(s, &LabelRules::default()).unwrap()
    }

    fn jpeg_frame(position: u32) -> Frame {
        let payload = format!(
            "data:image/jpeg;base64,{}",
            STANDARD.encode([0xFFu8, 0xD8, position as u8, 0xD9])
        );
        Frame::new(EncodedImage::new(payload), u64::from(position) * 100, position)
    }

    fn session(label_str: &str, index: u32, frames: Vec<Frame>) -> Session {
        Session::new(label(label_str), index, frames, Utc::now())
    }

    fn builder() -> ArchiveBuilder<ZipEngine> {
        ArchiveBuilder::new(ZipEngine::default(), "jpg")
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn builds_documented_layout() {
        let sessions = vec![
            session("hola", 1, (1..=3).map(jpeg_frame).collect()),
            session("hola", 2, (1..=2).map(jpeg_frame).collect()),
        ];

        let output = builder().build(&label("hola"), &sessions).unwrap();
        assert!(output.file_name.starts_with("hola_"));
        assert!(output.file_name.ends_with(".zip"));
        assert_eq!(output.checksum.len(), 64);

        assert_eq!(
            entry_names(output.bytes),
            vec![
                "hola/",
                "hola/hola_001/",
                "hola/hola_001/frame_001.jpg",
                "hola/hola_001/frame_002.jpg",
                "hola/hola_001/frame_003.jpg",
                "hola/hola_002/",
                "hola/hola_002/frame_001.jpg",
                "hola/hola_002/frame_002.jpg",
            ]
        );
    }

    #[test]
    fn entries_hold_raw_decoded_bytes() {
        use std::io::Read;

        let sessions = vec![session("hola", 1, vec![jpeg_frame(1)])];
        let output = builder().build(&label("hola"), &sessions).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(output.bytes)).unwrap();
        let mut entry = archive.by_name("hola/hola_001/frame_001.jpg").unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, vec![0xFF, 0xD8, 0x01, 0xD9]);
    }

    #[test]
    fn empty_store_fails_with_empty_export() {
        let err = builder().build(&label("hola"), &[]).unwrap_err();
        assert_eq!(err, CaptureError::EmptyExport);
    }

    #[test]
    fn all_zero_frame_sessions_fail_with_empty_export() {
        let sessions = vec![session("hola", 1, Vec::new()), session("hola", 2, Vec::new())];
        let err = builder().build(&label("hola"), &sessions).unwrap_err();
        assert_eq!(err, CaptureError::EmptyExport);
    }

    #[test]
    fn zero_frame_session_is_skipped_not_fatal() {
        let sessions = vec![
            session("hola", 1, vec![jpeg_frame(1)]),
            session("hola", 2, Vec::new()),
            session("hola", 3, vec![jpeg_frame(1)]),
        ];

        let output = builder().build(&label("hola"), &sessions).unwrap();
        // Recording 2 leaves a numbering gap; indices come from the ledger.
        assert_eq!(
            entry_names(output.bytes),
            vec![
                "hola/",
                "hola/hola_001/",
                "hola/hola_001/frame_001.jpg",
                "hola/hola_003/",
                "hola/hola_003/frame_001.jpg",
            ]
        );
    }

    #[test]
    fn empty_payload_frame_keeps_its_position_in_names() {
        let frames = vec![
            jpeg_frame(1),
            Frame::new(EncodedImage::new(""), 100, 2),
            jpeg_frame(3),
        ];
        let sessions = vec![session("hola", 1, frames)];

        let output = builder().build(&label("hola"), &sessions).unwrap();
        assert_eq!(
            entry_names(output.bytes),
            vec![
                "hola/",
                "hola/hola_001/",
                "hola/hola_001/frame_001.jpg",
                "hola/hola_001/frame_003.jpg",
            ]
        );
    }

    #[test]
    fn malformed_payload_fails_whole_export() {
        let frames = vec![
            jpeg_frame(1),
            Frame::new(EncodedImage::new("data:text/plain;base64,aGk="), 100, 2),
        ];
        let sessions = vec![session("hola", 1, frames)];

        let err = builder().build(&label("hola"), &sessions).unwrap_err();
        match err {
            CaptureError::InvalidFrameData {
                recording, frame, ..
            } => {
                assert_eq!(recording, 1);
                assert_eq!(frame, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn undecodable_payload_names_offending_frame() {
        let sessions = vec![session(
            "hola",
            2,
            vec![Frame::new(
                EncodedImage::new("data:image/jpeg;base64,%%%"),
                0,
                1,
            )],
        )];

        // Recording index comes from the session, not the slice position.
        let err = builder().build(&label("hola"), &sessions).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::InvalidFrameData { recording: 2, frame: 1, .. }
        ));
    }

    /// Engine doubles for the failure paths.
    struct UnavailableEngine;

    impl ArchiveEngine for UnavailableEngine {
        fn is_available(&self) -> bool {
            false
        }

        fn begin(&self) -> Result<Box<dyn ArchiveJob>, String> {
            Err("unavailable".into())
        }
    }

    struct SabotagedJob {
        fail_on_directory: bool,
    }

    impl ArchiveJob for SabotagedJob {
        fn add_directory(&mut self, _path: &str) -> Result<(), String> {
            if self.fail_on_directory {
                Err("disk full".into())
            } else {
                Ok(())
            }
        }

        fn add_file(&mut self, _path: &str, _bytes: &[u8]) -> Result<(), String> {
            Ok(())
        }

        fn finish(self: Box<Self>) -> Result<Vec<u8>, String> {
            Ok(Vec::new())
        }
    }

    struct SabotagedEngine {
        fail_on_directory: bool,
    }

    impl ArchiveEngine for SabotagedEngine {
        fn is_available(&self) -> bool {
            true
        }

        fn begin(&self) -> Result<Box<dyn ArchiveJob>, String> {
            Ok(Box::new(SabotagedJob {
                fail_on_directory: self.fail_on_directory,
            }))
        }
    }

    struct SlowJob {
        inner: Box<dyn ArchiveJob>,
        delay: Duration,
    }

    impl ArchiveJob for SlowJob {
        fn add_directory(&mut self, path: &str) -> Result<(), String> {
            self.inner.add_directory(path)
        }

        fn add_file(&mut self, path: &str, bytes: &[u8]) -> Result<(), String> {
            self.inner.add_file(path, bytes)
        }

        fn finish(self: Box<Self>) -> Result<Vec<u8>, String> {
            thread::sleep(self.delay);
            let SlowJob { inner, .. } = *self;
            inner.finish()
        }
    }

    struct SlowEngine {
        delay: Duration,
    }

    impl ArchiveEngine for SlowEngine {
        fn is_available(&self) -> bool {
            true
        }

        fn begin(&self) -> Result<Box<dyn ArchiveJob>, String> {
            Ok(Box::new(SlowJob {
                inner: ZipEngine::default().begin()?,
                delay: self.delay,
            }))
        }
    }

    #[test]
    fn unavailable_engine_fails_before_any_work() {
        let builder = ArchiveBuilder::new(UnavailableEngine, "jpg");
        let sessions = vec![session("hola", 1, vec![jpeg_frame(1)])];
        let err = builder.build(&label("hola"), &sessions).unwrap_err();
        assert_eq!(err, CaptureError::DependencyUnavailable);
    }

    #[test]
    fn directory_failure_is_archive_structure_error() {
        let builder = ArchiveBuilder::new(
            SabotagedEngine {
                fail_on_directory: true,
            },
            "jpg",
        );
        let sessions = vec![session("hola", 1, vec![jpeg_frame(1)])];
        let err = builder.build(&label("hola"), &sessions).unwrap_err();
        assert!(matches!(err, CaptureError::ArchiveStructure(_)));
    }

    #[test]
    fn empty_encoder_output_is_encoding_error() {
        let builder = ArchiveBuilder::new(
            SabotagedEngine {
                fail_on_directory: false,
            },
            "jpg",
        );
        let sessions = vec![session("hola", 1, vec![jpeg_frame(1)])];
        let err = builder.build(&label("hola"), &sessions).unwrap_err();
        assert!(matches!(err, CaptureError::ArchiveEncoding(_)));
    }

    #[test]
    fn concurrent_build_is_rejected_not_queued() {
        let builder = Arc::new(ArchiveBuilder::new(
            SlowEngine {
                delay: Duration::from_millis(200),
            },
            "jpg",
        ));
        let sessions = Arc::new(vec![session("hola", 1, vec![jpeg_frame(1)])]);

        let background = {
            let builder = Arc::clone(&builder);
            let sessions = Arc::clone(&sessions);
            thread::spawn(move || builder.build(&label("hola"), &sessions))
        };
        thread::sleep(Duration::from_millis(50));

        let second = builder.build(&label("hola"), &sessions);
        assert_eq!(second.unwrap_err(), CaptureError::ExportInProgress);

        // The first build settles normally and the flag is released.
        assert!(background.join().unwrap().is_ok());
        assert!(builder.build(&label("hola"), &sessions).is_ok());
    }

    #[test]
    fn failed_build_releases_in_progress_flag() {
        let builder = ArchiveBuilder::new(
            SabotagedEngine {
                fail_on_directory: true,
            },
            "jpg",
        );
        let sessions = vec![session("hola", 1, vec![jpeg_frame(1)])];
        assert!(builder.build(&label("hola"), &sessions).is_err());
        // Second attempt reaches the same structural error, not ExportInProgress.
        assert!(matches!(
            builder.build(&label("hola"), &sessions).unwrap_err(),
            CaptureError::ArchiveStructure(_)
        ));
    }

    #[test]
    fn builder_does_not_mutate_sessions() {
        let sessions = vec![session("hola", 1, vec![jpeg_frame(1), jpeg_frame(2)])];
        let snapshot = sessions.clone();
        let _ = builder().build(&label("hola"), &sessions).unwrap();
        assert_eq!(sessions, snapshot);
    }
}

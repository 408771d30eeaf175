//! # gesture-capture-sim
//!
//! Synthetic frame-source backend for gesture-capture-core.
//!
//! Provides `SyntheticFrameSource`, a deterministic in-process stand-in for
//! a camera: every capture returns the same tiny embedded JPEG as a
//! data-URL payload. Useful for demos, integration tests, and driving the
//! capture pipeline on machines without a camera.
//!
//! ## Usage
//! ```ignore
//! use gesture_capture_core::{CaptureConfiguration, CaptureWorkflow, ZipEngine};
//! use gesture_capture_sim::SyntheticFrameSource;
//!
//! let workflow = CaptureWorkflow::new(
//!     "hola",
//!     CaptureConfiguration::default(),
//!     SyntheticFrameSource::new(),
//!     ZipEngine::default(),
//! )?;
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use gesture_capture_core::{CaptureError, EncodedImage, FrameSource};

/// A minimal valid JPEG stream (1x1 pixel, arithmetic-coded).
///
/// The capture pipeline never decodes image contents, it only validates
/// the data-URL envelope, so one embedded image serves every frame.
const TINY_JPEG: &[u8] = &[
    0xFF, 0xD8, // SOI
    0xFF, 0xDB, 0x00, 0x43, 0x00, // DQT, table 0
    0x03, 0x02, 0x02, 0x03, 0x02, 0x02, 0x03, 0x03, 0x03, 0x03, 0x04, 0x03, 0x03, 0x04, 0x05,
    0x08, 0x05, 0x05, 0x04, 0x04, 0x05, 0x0A, 0x07, 0x07, 0x06, 0x08, 0x0C, 0x0A, 0x0C, 0x0C,
    0x0B, 0x0A, 0x0B, 0x0B, 0x0D, 0x0E, 0x12, 0x10, 0x0D, 0x0E, 0x11, 0x0E, 0x0B, 0x0B, 0x10,
    0x16, 0x10, 0x11, 0x13, 0x14, 0x15, 0x15, 0x15, 0x0C, 0x0F, 0x17, 0x18, 0x16, 0x14, 0x18,
    0x12, 0x14, 0x15, 0x14, //
    0xFF, 0xC9, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, // SOF9 1x1
    0xFF, 0xCC, 0x00, 0x06, 0x00, 0x10, 0x10, 0x05, // DAC
    0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, // SOS
    0xD2, 0xCF, 0x20, // entropy-coded data
    0xFF, 0xD9, // EOI
];

/// Deterministic frame source backed by an embedded JPEG.
pub struct SyntheticFrameSource {
    captures: u64,
    available: bool,
}

impl SyntheticFrameSource {
    pub fn new() -> Self {
        Self {
            captures: 0,
            available: true,
        }
    }

    /// A source that reports itself missing, for exercising the
    /// device-unavailable path in demos and tests.
    pub fn unavailable() -> Self {
        Self {
            captures: 0,
            available: false,
        }
    }

    /// Number of stills captured so far.
    pub fn captures(&self) -> u64 {
        self.captures
    }
}

impl Default for SyntheticFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for SyntheticFrameSource {
    fn is_available(&self) -> bool {
        self.available
    }

    fn capture_still(&mut self) -> Result<EncodedImage, CaptureError> {
        if !self.available {
            return Err(CaptureError::CaptureDevice(
                "synthetic source marked unavailable".into(),
            ));
        }
        self.captures += 1;
        log::trace!("synthetic capture #{}", self.captures);
        Ok(EncodedImage::new(format!(
            "data:image/jpeg;base64,{}",
            STANDARD.encode(TINY_JPEG)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gesture_capture_core::processing::data_url::decode_image_data_url;
    use gesture_capture_core::{CaptureConfiguration, CaptureWorkflow, ZipEngine};

    #[test]
    fn payload_passes_export_validation() {
        let mut source = SyntheticFrameSource::new();
        let image = source.capture_still().unwrap();

        let decoded = decode_image_data_url(image.as_str()).unwrap();
        assert_eq!(decoded.media_type, "image/jpeg");
        assert_eq!(decoded.bytes, TINY_JPEG);
        assert_eq!(source.captures(), 1);
    }

    #[test]
    fn unavailable_source_reports_and_fails() {
        let mut source = SyntheticFrameSource::unavailable();
        assert!(!source.is_available());
        assert!(source.capture_still().is_err());
    }

    #[test]
    fn drives_the_full_pipeline() {
        let config = CaptureConfiguration {
            sampling_duration_ms: 100,
            target_frame_count: 2,
            countdown_secs: 0,
            ..Default::default()
        };
        let mut workflow = CaptureWorkflow::new(
            "smoke",
            config,
            SyntheticFrameSource::new(),
            ZipEngine::default(),
        )
        .unwrap();

        workflow.record().unwrap();
        let output = workflow.export().unwrap();
        assert!(!output.bytes.is_empty());
        assert!(output.file_name.starts_with("smoke_"));
    }
}

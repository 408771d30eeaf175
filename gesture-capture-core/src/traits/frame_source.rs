use crate::models::error::CaptureError;
use crate::models::frame::EncodedImage;

/// Interface for still-image producing devices.
///
/// Implemented by camera backends and by the synthetic source in
/// `gesture-capture-sim`. The contract is minimal: produce one encoded
/// still image on demand, cropped/scaled to a fixed pre-negotiated
/// resolution.
pub trait FrameSource: Send {
    /// Whether the device is currently available.
    fn is_available(&self) -> bool;

    /// Capture one still image.
    ///
    /// May take non-trivial time (image encode); the scheduler accounts for
    /// that by anchoring its tick schedule to absolute elapsed time.
    fn capture_still(&mut self) -> Result<EncodedImage, CaptureError>;
}

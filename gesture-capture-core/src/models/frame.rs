/// An encoded still image as delivered by a frame source.
///
/// Carried as a data-URL string (`data:image/jpeg;base64,...`). The wrapper
/// is transport-opaque: validation and decoding happen at export time, not
/// at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the payload is missing (empty or whitespace-only).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// One still image captured during a session.
///
/// Immutable once created. `position` is 1-based within the owning session
/// and reflects capture order; `elapsed_ms` is measured from the start of
/// the sampling phase at the moment the capture was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    image: EncodedImage,
    elapsed_ms: u64,
    position: u32,
}

impl Frame {
    pub fn new(image: EncodedImage, elapsed_ms: u64, position: u32) -> Self {
        Self {
            image,
            elapsed_ms,
            position,
        }
    }

    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn position(&self) -> u32 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_detection() {
        assert!(EncodedImage::new("").is_empty());
        assert!(EncodedImage::new("   ").is_empty());
        assert!(!EncodedImage::new("data:image/jpeg;base64,AA==").is_empty());
    }

    #[test]
    fn frame_accessors() {
        let frame = Frame::new(EncodedImage::new("data:image/jpeg;base64,AA=="), 120, 3);
        assert_eq!(frame.elapsed_ms(), 120);
        assert_eq!(frame.position(), 3);
        assert_eq!(frame.image().as_str(), "data:image/jpeg;base64,AA==");
    }
}

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Data-URL payload decoding for captured frames.
///
/// Frame sources deliver images as data-URL strings:
/// ```text
/// data:image/jpeg;base64,<payload>
/// ```
/// Only base64-encoded `image/*` media types from a fixed whitelist are
/// accepted; everything else is rejected so that a malformed frame fails an
/// export loudly instead of producing a corrupt archive entry.
/// Image media types the export pipeline recognizes.
const RECOGNIZED_FORMATS: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Raw image bytes recovered from a data-URL payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Media type as tagged in the payload (e.g. `image/jpeg`).
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Decode an image data-URL into raw bytes.
///
/// Fails if the payload lacks the `data:` scheme, carries an unrecognized
/// media type, is not base64-encoded, does not decode, or decodes to zero
/// bytes.
pub fn decode_image_data_url(payload: &str) -> Result<DecodedImage, String> {
    let rest = payload
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| "payload is not a data URL".to_string())?;

    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| "data URL has no payload separator".to_string())?;

    let media_type = match header.strip_suffix(";base64") {
        Some(mt) => mt,
        None => return Err("data URL payload is not base64-encoded".into()),
    };

    if !RECOGNIZED_FORMATS.contains(&media_type) {
        return Err(format!("unrecognized image format tag: {:?}", media_type));
    }

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| format!("base64 decode failed: {}", e))?;

    if bytes.is_empty() {
        return Err("payload decoded to zero bytes".into());
    }

    Ok(DecodedImage {
        media_type: media_type.to_string(),
        bytes,
    })
}

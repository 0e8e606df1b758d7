//! Image decoding and upload re-encoding.

use std::io::Cursor;

use image::{codecs::jpeg::JpegEncoder, DynamicImage, GenericImageView};

/// JPEG quality used for every shared image.
pub const JPEG_QUALITY: u8 = 80;

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Re-encoded upload payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode any supported image format from memory.
pub fn decode_image(source_bytes: &[u8]) -> Result<DynamicImage, String> {
    if source_bytes.is_empty() {
        return Err("image data is empty".to_string());
    }

    image::load_from_memory(source_bytes).map_err(|error| format!("failed to decode image: {error}"))
}

/// Re-encode an image as JPEG at [`JPEG_QUALITY`].
///
/// Alpha is dropped; JPEG has no transparency.
pub fn encode_jpeg(image: &DynamicImage) -> Result<EncodedImage, String> {
    let (width, height) = image.dimensions();
    let rgb = image.to_rgb8();

    let mut cursor = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|error| format!("failed to encode JPEG: {error}"))?;

    Ok(EncodedImage {
        bytes: cursor.into_inner(),
        width,
        height,
    })
}

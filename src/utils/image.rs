//! Image payload decoding.
//!
//! Requests carry images as base64 text, optionally wrapped in a data URI
//! (`data:image/png;base64,<payload>`). This module turns such a string into an
//! [`RgbImage`], sniffing the actual image format from the decoded bytes.

use crate::core::errors::{ClassifierError, ClassifierResult};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use image::{DynamicImage, ImageReader, RgbImage};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

const DATA_URI_IMAGE_PREFIX: &str = "data:image";

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Strips a `data:image...,` header if present.
///
/// Payloads without the header are returned unchanged.
///
/// # Errors
///
/// Returns [`ClassifierError::DataUri`] if the header is present but no `,` follows it.
pub fn strip_data_uri(payload: &str) -> ClassifierResult<&str> {
    if !payload.starts_with(DATA_URI_IMAGE_PREFIX) {
        return Ok(payload);
    }
    payload
        .split_once(',')
        .map(|(_, data)| data)
        .ok_or_else(|| ClassifierError::data_uri("missing ',' after data URI header"))
}

/// Decodes standard (padded) base64, ignoring ASCII whitespace such as line breaks.
pub fn decode_base64(payload: &str) -> ClassifierResult<Vec<u8>> {
    let compact: Cow<'_, str> = if payload.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(
            payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect(),
        )
    } else {
        Cow::Borrowed(payload)
    };
    Ok(BASE64_STANDARD.decode(compact.as_bytes())?)
}

/// Decodes image bytes, letting the content decide the decoder.
pub fn load_image_from_memory(bytes: &[u8]) -> ClassifierResult<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Decodes a base64 or data-URI image payload into an RGB image.
pub fn decode_image_payload(payload: &str) -> ClassifierResult<RgbImage> {
    let data = strip_data_uri(payload)?;
    let bytes = decode_base64(data)?;
    tracing::debug!("Decoded {} image bytes", bytes.len());
    load_image_from_memory(&bytes).map(dynamic_to_rgb)
}

/// Reads an image file and returns it as a base64 payload.
pub fn encode_image_file(path: &Path) -> ClassifierResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(BASE64_STANDARD.encode(bytes))
}

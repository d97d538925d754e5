//! Photo Transcoder: validates an uploaded portrait, shrinks it and re-encodes it so the
//! stored data URL stays small enough to travel inside the saved record.
//!
//! Limits:
//! - accepted types: JPEG, PNG, WebP
//! - raw upload ≤ 5 MiB
//! - output ≤ 400 px on the longer side, JPEG quality 80
//! - stored data URL ≤ 500 KiB
//!
//! Decoding and encoding go through [`ImageTranscoder`] so the imaging backend can be
//! swapped; [`transcoder::JpegTranscoder`] is the default.

pub mod handlers;
pub mod transcoder;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_DIMENSION: u32 = 400;
pub const JPEG_QUALITY: u8 = 80;
pub const MAX_ENCODED_BYTES: usize = 500 * 1024;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Unsupported image type '{0}'. Use JPEG, PNG or WebP.")]
    UnsupportedType(String),

    #[error("Image is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),

    #[error("Compressed photo is still {size} bytes; the limit is {limit} bytes")]
    EncodedTooLarge { size: usize, limit: usize },

    #[error("Photo is not a base64 data URL")]
    InvalidDataUrl,
}

impl PhotoError {
    /// Size-limit rejections, as opposed to malformed input.
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            PhotoError::TooLarge { .. } | PhotoError::EncodedTooLarge { .. }
        )
    }
}

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// decode → resize preserving aspect ratio → encode at a lossy quality.
pub trait ImageTranscoder: Send + Sync {
    fn transcode(
        &self,
        bytes: &[u8],
        max_dimension: u32,
        quality: u8,
    ) -> Result<EncodedImage, PhotoError>;
}

/// Validates and transcodes an upload, returning the data URL to store.
///
/// CPU-bound: callers on the async runtime run this under `spawn_blocking`.
pub fn process_upload(
    transcoder: &dyn ImageTranscoder,
    upload: &PhotoUpload,
) -> Result<String, PhotoError> {
    let content_type = upload.content_type.trim().to_ascii_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(PhotoError::UnsupportedType(upload.content_type.clone()));
    }
    if upload.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(PhotoError::TooLarge {
            size: upload.bytes.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let encoded = transcoder.transcode(&upload.bytes, MAX_DIMENSION, JPEG_QUALITY)?;
    debug!(
        "Transcoded photo to {}x{} ({} bytes)",
        encoded.width,
        encoded.height,
        encoded.bytes.len()
    );

    let data_url = to_data_url(encoded.mime, &encoded.bytes);
    if data_url.len() > MAX_ENCODED_BYTES {
        return Err(PhotoError::EncodedTooLarge {
            size: data_url.len(),
            limit: MAX_ENCODED_BYTES,
        });
    }

    info!(
        "Accepted photo: {} bytes in, {} bytes stored",
        upload.bytes.len(),
        data_url.len()
    );
    Ok(data_url)
}

/// Target size so the longer side is at most `max`. Never upscales.
pub fn scaled_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max || longer == 0 {
        return (width, height);
    }
    let scale = max as f64 / longer as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max);
    (fit(width), fit(height))
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Raw bytes behind a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, PhotoError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or(PhotoError::InvalidDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(PhotoError::InvalidDataUrl)?;
    if !meta.ends_with(";base64") {
        return Err(PhotoError::InvalidDataUrl);
    }
    BASE64
        .decode(payload.trim())
        .map_err(|_| PhotoError::InvalidDataUrl)
}

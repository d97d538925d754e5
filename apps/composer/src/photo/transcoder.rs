//! Default [`ImageTranscoder`] backed by the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::photo::{scaled_dimensions, EncodedImage, ImageTranscoder, PhotoError};

/// Decodes any supported format and writes a baseline JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegTranscoder;

impl ImageTranscoder for JpegTranscoder {
    fn transcode(
        &self,
        bytes: &[u8],
        max_dimension: u32,
        quality: u8,
    ) -> Result<EncodedImage, PhotoError> {
        let img = image::load_from_memory(bytes).map_err(|e| PhotoError::Decode(e.to_string()))?;
        let (orig_w, orig_h) = img.dimensions();
        let (width, height) = scaled_dimensions(orig_w, orig_h, max_dimension);

        let resized = if (width, height) == (orig_w, orig_h) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        // JPEG has no alpha channel
        let flattened = flatten_onto(&resized, Rgba([255, 255, 255, 255]));
        let rgb = DynamicImage::ImageRgba8(flattened).to_rgb8();

        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| PhotoError::Encode(e.to_string()))?;

        Ok(EncodedImage {
            mime: "image/jpeg",
            bytes: out,
            width,
            height,
        })
    }
}

/// Composites `img` over a solid background of the same size.
pub fn flatten_onto(img: &DynamicImage, background: Rgba<u8>) -> RgbaImage {
    let top = img.to_rgba8();
    let (w, h) = top.dimensions();
    let mut base = RgbaImage::from_pixel(w, h, background);
    image::imageops::overlay(&mut base, &top, 0, 0);
    base
}

//! JPEG encoding of the enhanced capture

use crate::errors::ScanError;
use crate::types::{Frame, PixelFormat};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct EncodedImage {
    #[serde(skip)]
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
    /// JPEG quality the image was written at
    pub quality: u8,
}

/// Encode as baseline JPEG. RGBA input loses its alpha channel.
pub fn encode_jpeg(frame: Frame, quality: u8) -> Result<EncodedImage, ScanError> {
    let (width, height) = (frame.width, frame.height);
    let rgb = match frame.format {
        PixelFormat::Rgb8 => frame.data,
        PixelFormat::Rgba8 => frame
            .data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
    };

    let img = RgbImage::from_vec(width, height, rgb).ok_or_else(|| {
        ScanError::InvalidFrame(format!("buffer does not match {}x{}", width, height))
    })?;

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    DynamicImage::ImageRgb8(img).write_with_encoder(encoder)?;

    Ok(EncodedImage {
        bytes: Bytes::from(buf),
        width,
        height,
        quality,
    })
}

//! Frame preprocessing
//!
//! Reduces a full-resolution frame to a fixed `SAMPLE_SIZE` x `SAMPLE_SIZE`
//! grid so that per-tick analysis cost does not depend on camera resolution.

use crate::types::{Frame, PixelFormat};
use image::imageops::{self, FilterType};
use image::{GenericImageView, ImageBuffer, Pixel, Rgb, Rgba};
use serde::{Deserialize, Serialize};

/// Side length of the analysis grid
pub const SAMPLE_SIZE: u32 = 200;

/// Downsampled analysis grid.
///
/// Keeps the RGBA bytes of the sample (alpha forced to 255) alongside the
/// per-cell intensity, the mean of the R, G and B channels.
#[derive(Debug, Clone)]
pub struct IntensitySample {
    size: u32,
    rgba: Vec<u8>,
    intensity: Vec<f64>,
}

/// Mean and population standard deviation of cell intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LuminanceStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl IntensitySample {
    /// Downsample a frame onto the analysis grid.
    ///
    /// The frame bytes are read through a borrowed view; only the grid is
    /// allocated. Bilinear filtering keeps cell boundaries consistent across
    /// camera resolutions.
    pub fn from_frame(frame: &Frame) -> Self {
        let (width, height, data) = (frame.width, frame.height, frame.data.as_slice());
        let sample = match frame.format {
            PixelFormat::Rgb8 => ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(width, height, data)
                .map(|view| Self::from_view(&view)),
            PixelFormat::Rgba8 => ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(width, height, data)
                .map(|view| Self::from_view(&view)),
        };
        // Frame::new already checked the geometry
        sample.unwrap_or_else(|| Self::blank(SAMPLE_SIZE))
    }

    fn from_view<I, P>(view: &I) -> Self
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = u8> + 'static,
    {
        if view.dimensions() == (SAMPLE_SIZE, SAMPLE_SIZE) {
            return Self::from_pixels(SAMPLE_SIZE, view.pixels().map(|(_, _, p)| p));
        }
        let grid = imageops::resize(view, SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle);
        Self::from_pixels(SAMPLE_SIZE, grid.pixels().copied())
    }

    fn from_pixels<P>(size: u32, pixels: impl Iterator<Item = P>) -> Self
    where
        P: Pixel<Subpixel = u8>,
    {
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        let mut intensity = Vec::with_capacity((size * size) as usize);

        for pixel in pixels {
            let [r, g, b] = pixel.to_rgb().0;
            rgba.extend_from_slice(&[r, g, b, 255]);
            intensity.push((r as f64 + g as f64 + b as f64) / 3.0);
        }

        Self {
            size,
            rgba,
            intensity,
        }
    }

    fn blank(size: u32) -> Self {
        Self::from_pixels(size, (0..size * size).map(|_| Rgb([0u8, 0, 0])))
    }

    /// Grid side length
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Intensity of cell `(x, y)`
    #[inline]
    pub fn intensity_at(&self, x: u32, y: u32) -> f64 {
        self.intensity[(y * self.size + x) as usize]
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensity
    }

    /// Raw RGBA bytes of the sample, row-major
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn luminance_stats(&self) -> LuminanceStats {
        if self.intensity.is_empty() {
            return LuminanceStats {
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let count = self.intensity.len() as f64;
        let mean = self.intensity.iter().sum::<f64>() / count;
        let variance = self
            .intensity
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / count;

        LuminanceStats {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

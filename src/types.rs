//! Core frame and configuration value types shared across the engine.

use crate::errors::ScanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Byte layout of a frame's pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Rgb8 => "RGB8",
            PixelFormat::Rgba8 => "RGBA8",
        }
    }
}

/// A full-resolution camera frame.
///
/// The geometry is checked on construction, so every `Frame` in the engine
/// satisfies `data.len() == width * height * format.channels()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub timestamp: DateTime<Utc>,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, ScanError> {
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidFrame(format!(
                "empty frame geometry {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(ScanError::InvalidFrame(format!(
                "{} bytes for {}x{} {} (expected {})",
                data.len(),
                width,
                height,
                format.as_str(),
                expected
            )));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            data,
            width,
            height,
            format,
            timestamp: Utc::now(),
        })
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// RGB triple of the pixel at `(x, y)`.
    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let channels = self.format.channels();
        let idx = (y as usize * self.width as usize + x as usize) * channels;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// How capture is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Capture fires on its own once quality gates hold
    #[default]
    Auto,
    /// Capture only on an explicit request
    Manual,
    /// Triggered like manual; analysis keeps running for guidance
    Burst,
}

impl ScanMode {
    pub fn allows_auto_capture(&self) -> bool {
        matches!(self, ScanMode::Auto)
    }
}

/// Output quality tier, which also selects the camera resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Standard,
    #[default]
    High,
    Ultra,
}

impl QualityTier {
    /// Encoder quality parameter in [0, 1]
    pub fn encode_quality(&self) -> f32 {
        match self {
            QualityTier::Standard => 0.85,
            QualityTier::High => 0.92,
            QualityTier::Ultra => 0.98,
        }
    }

    /// Encoder quality as a JPEG percentage
    pub fn jpeg_quality(&self) -> u8 {
        (self.encode_quality() * 100.0).round() as u8
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            QualityTier::Standard => Resolution::new(1280, 720),
            QualityTier::High => Resolution::new(1920, 1080),
            QualityTier::Ultra => Resolution::new(2560, 1440),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Which camera the stream comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    Front,
    #[default]
    Back,
}

impl FacingMode {
    pub fn toggled(&self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Back,
            FacingMode::Back => FacingMode::Front,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_geometry_checked() {
        assert!(Frame::new(vec![0; 12], 2, 2, PixelFormat::Rgb8).is_ok());
        assert!(Frame::new(vec![0; 16], 2, 2, PixelFormat::Rgba8).is_ok());
        assert!(Frame::new(vec![0; 11], 2, 2, PixelFormat::Rgb8).is_err());
        assert!(Frame::new(vec![], 0, 0, PixelFormat::Rgb8).is_err());
    }

    #[test]
    fn test_rgb_at_skips_alpha() {
        let data = vec![1, 2, 3, 255, 4, 5, 6, 255];
        let frame = Frame::new(data, 2, 1, PixelFormat::Rgba8).unwrap();
        assert_eq!(frame.rgb_at(1, 0), [4, 5, 6]);
    }

    #[test]
    fn test_quality_tiers() {
        assert_eq!(QualityTier::Standard.jpeg_quality(), 85);
        assert_eq!(QualityTier::High.jpeg_quality(), 92);
        assert_eq!(QualityTier::Ultra.jpeg_quality(), 98);
        assert_eq!(QualityTier::Ultra.resolution(), Resolution::new(2560, 1440));
    }

    #[test]
    fn test_facing_toggle() {
        assert_eq!(FacingMode::Back.toggled(), FacingMode::Front);
        assert_eq!(FacingMode::Front.toggled().toggled(), FacingMode::Front);
    }
}

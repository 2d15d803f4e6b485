//! Post-capture enhancement
//!
//! Applied once to the frame selected for capture: brightness, then
//! contrast, then an optional sharpen, then JPEG encoding at the quality
//! tier's setting.

pub mod adjust;
pub mod encode;

pub use adjust::{adjust_tone, sharpen, tone_curve};
pub use encode::{encode_jpeg, EncodedImage};

use crate::config::EnhancementSettings;
use crate::errors::ScanError;
use crate::types::{Frame, QualityTier};

#[derive(Debug, Clone, Copy)]
pub struct Enhancer {
    settings: EnhancementSettings,
}

impl Enhancer {
    pub fn new(settings: EnhancementSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EnhancementSettings {
        &self.settings
    }

    /// Adjust `frame` in place. Alpha bytes pass through unchanged.
    pub fn enhance(&self, mut frame: Frame) -> Frame {
        if !self.settings.auto_enhance {
            return frame;
        }

        let channels = frame.format.channels();
        adjust_tone(
            &mut frame.data,
            channels,
            self.settings.brightness,
            self.settings.contrast,
        );
        sharpen(
            &mut frame.data,
            frame.width as usize,
            frame.height as usize,
            channels,
            self.settings.sharpness,
        );
        frame
    }

    /// Enhance and encode for hand-off
    pub fn process(&self, frame: Frame, tier: QualityTier) -> Result<EncodedImage, ScanError> {
        let encoded = encode_jpeg(self.enhance(frame), tier.jpeg_quality())?;
        log::info!(
            "Encoded capture {}x{} at quality {} ({} bytes)",
            encoded.width,
            encoded.height,
            encoded.quality,
            encoded.bytes.len()
        );
        Ok(encoded)
    }
}

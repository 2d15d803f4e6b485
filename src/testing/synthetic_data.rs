//! Synthetic frames for offline testing
//!
//! Scenes are drawn in fractions of the frame so the same document lands on
//! the same analysis cells whatever resolution is rendered.

use crate::types::{Frame, PixelFormat};
use chrono::Utc;

/// Wrap an RGB buffer that is known to match `width * height * 3`
pub fn frame_from_rgb(data: Vec<u8>, width: u32, height: u32) -> Frame {
    debug_assert_eq!(data.len(), width as usize * height as usize * 3);
    Frame {
        id: uuid::Uuid::new_v4().to_string(),
        data,
        width,
        height,
        format: PixelFormat::Rgb8,
        timestamp: Utc::now(),
    }
}

/// Uniform colour, no edges anywhere
pub fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
    let data = rgb
        .iter()
        .copied()
        .cycle()
        .take(width as usize * height as usize * 3)
        .collect();
    frame_from_rgb(data, width, height)
}

/// Gradient that shifts every frame, for a camera that never holds still
pub fn synthetic_video_frame(frame_number: u64, width: u32, height: u32) -> Frame {
    let mut data = vec![0u8; width as usize * height as usize * 3];

    let base = (frame_number.wrapping_mul(37) % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = (y as usize * width as usize + x as usize) * 3;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }

    frame_from_rgb(data, width, height)
}

/// A flat rectangular document over a flat background
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentScene {
    /// left, top, right, bottom as fractions of the frame
    pub bounds: (f64, f64, f64, f64),
    pub document: [u8; 3],
    pub background: [u8; 3],
}

impl DocumentScene {
    /// Light page filling the middle 70% of a dark desk
    pub fn centered() -> Self {
        Self {
            bounds: (0.15, 0.15, 0.85, 0.85),
            document: [230, 230, 230],
            background: [40, 40, 40],
        }
    }

    /// Dark blue booklet cover
    pub fn passport() -> Self {
        Self {
            bounds: (0.15, 0.15, 0.85, 0.85),
            document: [30, 50, 150],
            background: [10, 10, 40],
        }
    }

    /// Mid-grey card on a near-black surface
    pub fn id_card() -> Self {
        Self {
            bounds: (0.15, 0.15, 0.85, 0.85),
            document: [120, 120, 120],
            background: [20, 20, 20],
        }
    }

    /// White sheet covering most of the frame
    pub fn paper() -> Self {
        Self {
            bounds: (0.05, 0.05, 0.95, 0.95),
            document: [240, 240, 240],
            background: [60, 60, 60],
        }
    }

    /// Move the document horizontally by a fraction of the frame width
    pub fn shifted(mut self, dx: f64) -> Self {
        self.bounds.0 += dx;
        self.bounds.2 += dx;
        self
    }

    pub fn render(&self, width: u32, height: u32) -> Frame {
        let (left, top, right, bottom) = self.bounds;
        let x0 = (left * width as f64).round() as i64;
        let x1 = (right * width as f64).round() as i64;
        let y0 = (top * height as f64).round() as i64;
        let y1 = (bottom * height as f64).round() as i64;

        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height as i64 {
            for x in 0..width as i64 {
                let inside = x >= x0 && x < x1 && y >= y0 && y < y1;
                let rgb = if inside { self.document } else { self.background };
                data.extend_from_slice(&rgb);
            }
        }

        frame_from_rgb(data, width, height)
    }
}

/// Centred light document on a dark background
pub fn synthetic_document_frame(width: u32, height: u32) -> Frame {
    DocumentScene::centered().render(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_video_frame_correct_size() {
        let frame = synthetic_video_frame(0, 1920, 1080);
        assert_eq!(frame.width, 1920);
        assert_eq!(frame.height, 1080);
        assert_eq!(frame.data.len(), 1920 * 1080 * 3);
    }

    #[test]
    fn test_synthetic_video_frames_differ() {
        let frame0 = synthetic_video_frame(0, 320, 240);
        let frame1 = synthetic_video_frame(1, 320, 240);
        assert_ne!(frame0.data[0], frame1.data[0]);
    }

    #[test]
    fn test_document_covers_expected_cells() {
        let frame = synthetic_document_frame(200, 200);
        assert_eq!(frame.rgb_at(29, 100), [40, 40, 40]);
        assert_eq!(frame.rgb_at(30, 100), [230, 230, 230]);
        assert_eq!(frame.rgb_at(169, 169), [230, 230, 230]);
        assert_eq!(frame.rgb_at(170, 100), [40, 40, 40]);
    }

    #[test]
    fn test_solid_frame() {
        let frame = solid_frame(4, 3, [1, 2, 3]);
        assert_eq!(frame.data.len(), 36);
        assert_eq!(frame.rgb_at(3, 2), [1, 2, 3]);
    }
}

//! Sobel edge detection and document boundary presence
//!
//! Runs the 3x3 Sobel operator over every interior cell of the analysis grid,
//! counts strong edges in the four border bands, and declares a document
//! present when every band has enough of them.

use super::preprocess::IntensitySample;
use serde::{Deserialize, Serialize};

/// Gradient magnitude above which a cell is an edge pixel
pub const EDGE_MAGNITUDE_THRESHOLD: f64 = 100.0;

/// Each band needs strictly more edge pixels than this
pub const MIN_EDGES_PER_SIDE: u32 = 15;

/// Border band width as a fraction of the grid side
pub const BAND_FRACTION: f64 = 0.3;

const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Edge pixel tallies per border band.
///
/// A cell lands in at most one of top/bottom and at most one of left/right,
/// so corner cells count towards two bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantCounts {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl QuadrantCounts {
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Mirror the counts across both axes
    pub fn mirrored(&self) -> Self {
        Self {
            top: self.bottom,
            bottom: self.top,
            left: self.right,
            right: self.left,
        }
    }
}

/// Per-cell gradient magnitude over the interior of the grid
#[derive(Debug, Clone)]
pub struct EdgeMap {
    size: u32,
    magnitudes: Vec<f64>,
    counts: QuadrantCounts,
}

impl EdgeMap {
    pub fn detect(sample: &IntensitySample) -> Self {
        let size = sample.size();
        let interior = size.saturating_sub(2) as usize;
        let mut magnitudes = Vec::with_capacity(interior * interior);
        let mut counts = QuadrantCounts::default();

        let n = size as f64;
        let top_limit = n * BAND_FRACTION;
        let bottom_limit = n * (1.0 - BAND_FRACTION);

        for y in 1..size.saturating_sub(1) {
            for x in 1..size - 1 {
                let mut gx = 0.0;
                let mut gy = 0.0;
                for ky in 0..3u32 {
                    for kx in 0..3u32 {
                        let pixel = sample.intensity_at(x + kx - 1, y + ky - 1);
                        gx += pixel * SOBEL_X[ky as usize][kx as usize];
                        gy += pixel * SOBEL_Y[ky as usize][kx as usize];
                    }
                }
                let magnitude = (gx * gx + gy * gy).sqrt();
                magnitudes.push(magnitude);

                if magnitude > EDGE_MAGNITUDE_THRESHOLD {
                    let (fx, fy) = (x as f64, y as f64);
                    if fy < top_limit {
                        counts.top += 1;
                    } else if fy > bottom_limit {
                        counts.bottom += 1;
                    }
                    if fx < top_limit {
                        counts.left += 1;
                    } else if fx > bottom_limit {
                        counts.right += 1;
                    }
                }
            }
        }

        log::trace!("Edge tallies: {:?}", counts);

        Self {
            size,
            magnitudes,
            counts,
        }
    }

    pub fn counts(&self) -> QuadrantCounts {
        self.counts
    }

    /// Gradient magnitude at interior cell `(x, y)`, 1-based on the full grid
    pub fn magnitude_at(&self, x: u32, y: u32) -> f64 {
        let interior = self.size - 2;
        self.magnitudes[((y - 1) * interior + (x - 1)) as usize]
    }

    /// Mean gradient magnitude over all interior cells
    pub fn mean_magnitude(&self) -> f64 {
        if self.magnitudes.is_empty() {
            return 0.0;
        }
        self.magnitudes.iter().sum::<f64>() / self.magnitudes.len() as f64
    }
}

/// How much of each document side is visible, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideVisibility {
    pub top: u8,
    pub bottom: u8,
    pub left: u8,
    pub right: u8,
}

/// Document presence verdict for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDetection {
    pub detected: bool,
    /// Only reported while a document is detected
    pub visibility: Option<SideVisibility>,
}

impl DocumentDetection {
    pub fn from_counts(counts: &QuadrantCounts) -> Self {
        let detected = [counts.top, counts.bottom, counts.left, counts.right]
            .iter()
            .all(|&c| c > MIN_EDGES_PER_SIDE);

        let visibility = detected.then(|| SideVisibility {
            top: side_visibility(counts.top),
            bottom: side_visibility(counts.bottom),
            left: side_visibility(counts.left),
            right: side_visibility(counts.right),
        });

        Self {
            detected,
            visibility,
        }
    }
}

fn side_visibility(count: u32) -> u8 {
    count.saturating_mul(2).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Frame, PixelFormat};

    fn sample_from_fn(f: impl Fn(u32, u32) -> u8) -> IntensitySample {
        let mut data = Vec::with_capacity(200 * 200 * 3);
        for y in 0..200 {
            for x in 0..200 {
                let v = f(x, y);
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let frame = Frame::new(data, 200, 200, PixelFormat::Rgb8).unwrap();
        IntensitySample::from_frame(&frame)
    }

    #[test]
    fn test_flat_sample_has_no_edges() {
        let edges = EdgeMap::detect(&sample_from_fn(|_, _| 128));
        assert_eq!(edges.counts(), QuadrantCounts::default());
        assert_eq!(edges.mean_magnitude(), 0.0);
    }

    #[test]
    fn test_vertical_step_magnitude() {
        // Step from 0 to 100 between x=99 and x=100
        let edges = EdgeMap::detect(&sample_from_fn(|x, _| if x < 100 { 0 } else { 100 }));
        // Both cells adjacent to the step see the full 4 * 100 response
        assert_eq!(edges.magnitude_at(99, 50), 400.0);
        assert_eq!(edges.magnitude_at(100, 50), 400.0);
        assert_eq!(edges.magnitude_at(50, 50), 0.0);
        // Centre columns sit in neither side band
        let counts = edges.counts();
        assert_eq!(counts.left, 0);
        assert_eq!(counts.right, 0);
        // Rows 1..60 are top band, 141..199 bottom band, two columns each
        assert_eq!(counts.top, 59 * 2);
        assert_eq!(counts.bottom, 58 * 2);
    }

    #[test]
    fn test_centered_rectangle_detected() {
        let edges = EdgeMap::detect(&sample_from_fn(|x, y| {
            if (30..170).contains(&x) && (30..170).contains(&y) {
                230
            } else {
                40
            }
        }));
        // Band limits are y < 60 and y > 140, so the top band sees one more
        // row of side edges than the bottom band does
        let counts = edges.counts();
        assert_eq!(counts, QuadrantCounts::new(400, 396, 400, 396));
        let detection = DocumentDetection::from_counts(&counts);
        assert!(detection.detected);
        assert_eq!(detection.visibility.unwrap().top, 100);
    }

    #[test]
    fn test_detection_threshold_is_strict() {
        let at_limit = QuadrantCounts::new(16, 16, 16, 15);
        assert!(!DocumentDetection::from_counts(&at_limit).detected);
        assert!(DocumentDetection::from_counts(&at_limit).visibility.is_none());

        let above = QuadrantCounts::new(16, 16, 16, 16);
        let detection = DocumentDetection::from_counts(&above);
        assert!(detection.detected);
        assert_eq!(
            detection.visibility,
            Some(SideVisibility {
                top: 32,
                bottom: 32,
                left: 32,
                right: 32
            })
        );
    }

    #[test]
    fn test_visibility_clamped() {
        let counts = QuadrantCounts::new(20, 49, 50, 5000);
        let visibility = DocumentDetection::from_counts(&counts).visibility.unwrap();
        assert_eq!(visibility.top, 40);
        assert_eq!(visibility.bottom, 98);
        assert_eq!(visibility.left, 100);
        assert_eq!(visibility.right, 100);
    }
}

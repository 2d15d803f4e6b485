//! Composite quality scoring
//!
//! Fuses brightness, contrast, edge density and alignment into one
//! figure of merit, then scales it by how steady the camera is and whether a
//! document boundary was found.

use serde::{Deserialize, Serialize};

pub const BRIGHTNESS_WEIGHT: f64 = 0.2;
pub const CONTRAST_WEIGHT: f64 = 0.3;
pub const EDGE_WEIGHT: f64 = 0.3;
pub const ALIGNMENT_WEIGHT: f64 = 0.2;

/// Mean luminance the brightness penalty is measured from
pub const BRIGHTNESS_TARGET: f64 = 130.0;

/// Everything the scorer needs from one tick's analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub mean_luminance: f64,
    pub luminance_std_dev: f64,
    pub mean_edge_magnitude: f64,
    pub alignment: u8,
    /// `None` on the first tick of a session
    pub stability: Option<u8>,
    pub document_detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Final score in [0, 100]
    pub score: u8,
    pub brightness_score: f64,
    /// Standard deviation of intensity; not clamped
    pub contrast_score: f64,
    pub edge_score: f64,
    pub alignment_score: u8,
    pub raw_score: f64,
    pub stability_factor: f64,
    pub document_factor: f64,
}

impl QualityAssessment {
    pub fn compute(inputs: &ScoreInputs) -> Self {
        let brightness_score = brightness_score(inputs.mean_luminance);
        let contrast_score = inputs.luminance_std_dev;
        let edge_score = edge_score(inputs.mean_edge_magnitude);

        let raw_score = brightness_score * BRIGHTNESS_WEIGHT
            + contrast_score * CONTRAST_WEIGHT
            + edge_score * EDGE_WEIGHT
            + inputs.alignment as f64 * ALIGNMENT_WEIGHT;

        let stability_factor = stability_factor(inputs.stability);
        let document_factor = document_factor(inputs.document_detected);
        let score = (raw_score * stability_factor * document_factor)
            .round()
            .clamp(0.0, 100.0) as u8;

        Self {
            score,
            brightness_score,
            contrast_score,
            edge_score,
            alignment_score: inputs.alignment,
            raw_score,
            stability_factor,
            document_factor,
        }
    }
}

/// Full marks inside the (60, 200) band, otherwise one point per level away from 130
pub fn brightness_score(mean_luminance: f64) -> f64 {
    if mean_luminance > 60.0 && mean_luminance < 200.0 {
        100.0
    } else {
        (100.0 - (mean_luminance - BRIGHTNESS_TARGET).abs()).max(0.0)
    }
}

pub fn edge_score(mean_edge_magnitude: f64) -> f64 {
    (mean_edge_magnitude * 1.5).min(100.0)
}

/// Undefined stability (first tick) falls in the lowest tier
pub fn stability_factor(stability: Option<u8>) -> f64 {
    match stability {
        Some(s) if s > 80 => 1.1,
        Some(s) if s > 50 => 1.0,
        _ => 0.8,
    }
}

pub fn document_factor(document_detected: bool) -> f64 {
    if document_detected {
        1.15
    } else {
        0.9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ScoreInputs {
        ScoreInputs {
            mean_luminance: 130.0,
            luminance_std_dev: 40.0,
            mean_edge_magnitude: 50.0,
            alignment: 100,
            stability: Some(100),
            document_detected: true,
        }
    }

    #[test]
    fn test_brightness_band() {
        assert_eq!(brightness_score(130.0), 100.0);
        assert_eq!(brightness_score(60.5), 100.0);
        assert_eq!(brightness_score(199.9), 100.0);
        // Band edges are exclusive
        assert_eq!(brightness_score(60.0), 30.0);
        assert_eq!(brightness_score(200.0), 30.0);
        assert_eq!(brightness_score(0.0), 0.0);
        assert_eq!(brightness_score(255.0), 0.0);
    }

    #[test]
    fn test_factors() {
        assert_eq!(stability_factor(None), 0.8);
        assert_eq!(stability_factor(Some(50)), 0.8);
        assert_eq!(stability_factor(Some(51)), 1.0);
        assert_eq!(stability_factor(Some(80)), 1.0);
        assert_eq!(stability_factor(Some(81)), 1.1);
        assert_eq!(document_factor(true), 1.15);
        assert_eq!(document_factor(false), 0.9);
    }

    #[test]
    fn test_edge_score_capped() {
        assert_eq!(edge_score(50.0), 75.0);
        assert_eq!(edge_score(80.0), 100.0);
    }

    #[test]
    fn test_reference_composite() {
        let assessment = QualityAssessment::compute(&inputs());
        // 100*0.2 + 40*0.3 + 75*0.3 + 100*0.2 = 74.5
        assert!((assessment.raw_score - 74.5).abs() < 1e-9);
        // 74.5 * 1.1 * 1.15 = 94.2425
        assert_eq!(assessment.score, 94);
        assert_eq!(assessment.stability_factor, 1.1);
        assert_eq!(assessment.document_factor, 1.15);
    }

    #[test]
    fn test_first_tick_uses_lowest_stability_tier() {
        let first = QualityAssessment::compute(&ScoreInputs {
            stability: None,
            ..inputs()
        });
        // 74.5 * 0.8 * 1.15 = 68.54
        assert_eq!(first.score, 69);
    }

    #[test]
    fn test_score_clamped_high() {
        let assessment = QualityAssessment::compute(&ScoreInputs {
            luminance_std_dev: 127.5,
            ..inputs()
        });
        assert!(assessment.raw_score * 1.1 * 1.15 > 100.0);
        assert_eq!(assessment.score, 100);
    }
}

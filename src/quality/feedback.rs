//! Operator guidance derived from a tick's scores
//!
//! Coarse tiers the host can show next to the preview: overall quality,
//! whether the document is centred, whether the camera is steady, and
//! whether the scene is too dark or too bright.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentHint {
    Centered,
    Near,
    Far,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityHint {
    Stable,
    Moving,
    Unstable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureHint {
    TooDark,
    Ok,
    TooBright,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFeedback {
    pub quality: QualityLevel,
    pub alignment: AlignmentHint,
    pub stability: StabilityHint,
    pub exposure: ExposureHint,
    /// Score is low enough that retaking under better light is worth suggesting
    pub rescan_advised: bool,
}

impl CaptureFeedback {
    pub fn new(score: u8, alignment: u8, stability: Option<u8>, mean_luminance: f64) -> Self {
        Self {
            quality: QualityLevel::from_score(score),
            alignment: AlignmentHint::from_score(alignment),
            stability: StabilityHint::from_score(stability),
            exposure: ExposureHint::from_luminance(mean_luminance),
            rescan_advised: score < 50,
        }
    }
}

impl QualityLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => QualityLevel::Good,
            50..=74 => QualityLevel::Fair,
            _ => QualityLevel::Poor,
        }
    }
}

impl AlignmentHint {
    pub fn from_score(alignment: u8) -> Self {
        match alignment {
            70.. => AlignmentHint::Centered,
            40..=69 => AlignmentHint::Near,
            _ => AlignmentHint::Far,
        }
    }
}

impl StabilityHint {
    pub fn from_score(stability: Option<u8>) -> Self {
        match stability {
            Some(80..) => StabilityHint::Stable,
            Some(50..=79) => StabilityHint::Moving,
            _ => StabilityHint::Unstable,
        }
    }
}

impl ExposureHint {
    /// Brightness as a percentage of full scale: under 30% is dark, over 90% bright
    pub fn from_luminance(mean_luminance: f64) -> Self {
        let percent = (mean_luminance / 255.0 * 100.0).round();
        if percent < 30.0 {
            ExposureHint::TooDark
        } else if percent > 90.0 {
            ExposureHint::TooBright
        } else {
            ExposureHint::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(QualityLevel::from_score(75), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(74), QualityLevel::Fair);
        assert_eq!(QualityLevel::from_score(49), QualityLevel::Poor);

        assert_eq!(AlignmentHint::from_score(70), AlignmentHint::Centered);
        assert_eq!(AlignmentHint::from_score(40), AlignmentHint::Near);
        assert_eq!(AlignmentHint::from_score(39), AlignmentHint::Far);

        assert_eq!(StabilityHint::from_score(Some(80)), StabilityHint::Stable);
        assert_eq!(StabilityHint::from_score(Some(50)), StabilityHint::Moving);
        assert_eq!(StabilityHint::from_score(Some(10)), StabilityHint::Unstable);
        assert_eq!(StabilityHint::from_score(None), StabilityHint::Unstable);
    }

    #[test]
    fn test_exposure_hint() {
        assert_eq!(ExposureHint::from_luminance(20.0), ExposureHint::TooDark);
        assert_eq!(ExposureHint::from_luminance(130.0), ExposureHint::Ok);
        assert_eq!(ExposureHint::from_luminance(245.0), ExposureHint::TooBright);
    }

    #[test]
    fn test_rescan_advice() {
        assert!(CaptureFeedback::new(49, 100, Some(100), 130.0).rescan_advised);
        assert!(!CaptureFeedback::new(50, 100, Some(100), 130.0).rescan_advised);
    }
}

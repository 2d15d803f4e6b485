//! Heuristic document type classification
//!
//! Labels the likely document from colour and luminance statistics of the
//! analysis sample. Rules are checked in order and the first match wins.

use super::preprocess::IntensitySample;
use serde::{Deserialize, Serialize};

/// Cell intensity below this counts as dark
pub const DARK_LUMINANCE: f64 = 80.0;
/// Cell intensity above this counts as light
pub const LIGHT_LUMINANCE: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentClassification {
    #[default]
    None,
    PassportLike,
    IdCardLike,
    PaperDocument,
    GenericDocument,
}

impl DocumentClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentClassification::None => "none",
            DocumentClassification::PassportLike => "passport-like",
            DocumentClassification::IdCardLike => "id-card-like",
            DocumentClassification::PaperDocument => "paper-document",
            DocumentClassification::GenericDocument => "generic-document",
        }
    }
}

/// Category label handed to the upload side with the captured image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    Passport,
    IdCard,
    #[default]
    Other,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Passport => "PASSPORT",
            DocumentCategory::IdCard => "ID_CARD",
            DocumentCategory::Other => "OTHER",
        }
    }
}

impl From<DocumentClassification> for DocumentCategory {
    fn from(classification: DocumentClassification) -> Self {
        match classification {
            DocumentClassification::PassportLike => DocumentCategory::Passport,
            DocumentClassification::IdCardLike => DocumentCategory::IdCard,
            _ => DocumentCategory::Other,
        }
    }
}

/// Channel means and luminance ratios of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStats {
    pub mean_r: f64,
    pub mean_g: f64,
    pub mean_b: f64,
    /// Fraction of cells with intensity below `DARK_LUMINANCE`
    pub dark_ratio: f64,
    /// Fraction of cells with intensity above `LIGHT_LUMINANCE`
    pub light_ratio: f64,
}

impl ColorStats {
    pub fn from_sample(sample: &IntensitySample) -> Self {
        let mut sums = [0u64; 3];
        let mut dark = 0usize;
        let mut light = 0usize;

        for pixel in sample.rgba().chunks_exact(4) {
            sums[0] += pixel[0] as u64;
            sums[1] += pixel[1] as u64;
            sums[2] += pixel[2] as u64;
        }
        for &luminance in sample.intensities() {
            if luminance < DARK_LUMINANCE {
                dark += 1;
            }
            if luminance > LIGHT_LUMINANCE {
                light += 1;
            }
        }

        let count = sample.intensities().len().max(1) as f64;
        Self {
            mean_r: sums[0] as f64 / count,
            mean_g: sums[1] as f64 / count,
            mean_b: sums[2] as f64 / count,
            dark_ratio: dark as f64 / count,
            light_ratio: light as f64 / count,
        }
    }

    pub fn classify(&self, document_detected: bool) -> DocumentClassification {
        if self.mean_b > self.mean_r + 20.0 && self.mean_b > self.mean_g + 10.0 {
            DocumentClassification::PassportLike
        } else if self.dark_ratio > 0.4 && self.light_ratio < 0.3 {
            DocumentClassification::IdCardLike
        } else if self.light_ratio > 0.6 {
            DocumentClassification::PaperDocument
        } else if document_detected {
            DocumentClassification::GenericDocument
        } else {
            DocumentClassification::None
        }
    }
}

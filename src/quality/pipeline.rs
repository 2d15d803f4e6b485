//! One analysis tick as a pure function
//!
//! Takes the current frame and the previous tick's sample and returns the
//! tick's findings together with the sample to keep for the next tick.

use super::alignment::alignment_score;
use super::classifier::{ColorStats, DocumentClassification};
use super::edges::{DocumentDetection, EdgeMap, QuadrantCounts};
use super::feedback::CaptureFeedback;
use super::preprocess::{IntensitySample, LuminanceStats};
use super::scorer::{QualityAssessment, ScoreInputs};
use super::stability::stability_score;
use crate::types::Frame;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub counts: QuadrantCounts,
    pub detection: DocumentDetection,
    pub alignment: u8,
    /// `None` when there was no previous sample
    pub stability: Option<u8>,
    pub classification: DocumentClassification,
    pub luminance: LuminanceStats,
    pub mean_edge_magnitude: f64,
    pub assessment: QualityAssessment,
    pub feedback: CaptureFeedback,
}

impl FrameAnalysis {
    pub fn score(&self) -> u8 {
        self.assessment.score
    }
}

/// Analyse a full-resolution frame; returns the findings and the new previous sample
pub fn analyze_frame(
    frame: &Frame,
    previous: Option<&IntensitySample>,
) -> (FrameAnalysis, IntensitySample) {
    let sample = IntensitySample::from_frame(frame);
    let analysis = analyze_sample(&sample, previous);
    (analysis, sample)
}

/// Analyse an already downsampled grid
pub fn analyze_sample(
    sample: &IntensitySample,
    previous: Option<&IntensitySample>,
) -> FrameAnalysis {
    let edges = EdgeMap::detect(sample);
    let counts = edges.counts();
    let detection = DocumentDetection::from_counts(&counts);
    let alignment = alignment_score(&counts);
    let stability = previous.map(|prev| stability_score(sample, prev));
    let classification = ColorStats::from_sample(sample).classify(detection.detected);
    let luminance = sample.luminance_stats();
    let mean_edge_magnitude = edges.mean_magnitude();

    let assessment = QualityAssessment::compute(&ScoreInputs {
        mean_luminance: luminance.mean,
        luminance_std_dev: luminance.std_dev,
        mean_edge_magnitude,
        alignment,
        stability,
        document_detected: detection.detected,
    });
    let feedback = CaptureFeedback::new(assessment.score, alignment, stability, luminance.mean);

    log::debug!(
        "Tick analysis: score={} detected={} alignment={} stability={:?} class={}",
        assessment.score,
        detection.detected,
        alignment,
        stability,
        classification.as_str()
    );

    FrameAnalysis {
        counts,
        detection,
        alignment,
        stability,
        classification,
        luminance,
        mean_edge_magnitude,
        assessment,
        feedback,
    }
}

/// Document capture quality analysis
///
/// Everything that runs once per analysis tick: downsampling to a fixed
/// intensity grid, Sobel edge detection with quadrant tallies, alignment and
/// stability scoring, document-type heuristics, and the composite score that
/// gates auto-capture.
pub mod alignment;
pub mod classifier;
pub mod edges;
pub mod feedback;
pub mod pipeline;
pub mod preprocess;
pub mod scorer;
pub mod stability;

pub use alignment::alignment_score;
pub use classifier::{ColorStats, DocumentCategory, DocumentClassification};
pub use edges::{DocumentDetection, EdgeMap, QuadrantCounts, SideVisibility};
pub use feedback::{AlignmentHint, CaptureFeedback, ExposureHint, QualityLevel, StabilityHint};
pub use pipeline::{analyze_frame, analyze_sample, FrameAnalysis};
pub use preprocess::{IntensitySample, LuminanceStats, SAMPLE_SIZE};
pub use scorer::{QualityAssessment, ScoreInputs};
pub use stability::{stability_score, StabilityTracker};

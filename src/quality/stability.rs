//! Motion estimation between consecutive analysis samples

use super::preprocess::IntensitySample;

/// Byte stride through the RGBA sample buffer
pub const SAMPLE_STRIDE: usize = 16;

/// Summed absolute difference that costs one stability point
pub const DIFF_DIVISOR: f64 = 500.0;

/// Stability in [0, 100] between two samples; 100 means no motion
pub fn stability_score(current: &IntensitySample, previous: &IntensitySample) -> u8 {
    let current = current.rgba();
    let previous = previous.rgba();
    let len = current.len().min(previous.len());

    let diff_sum: u64 = (0..len)
        .step_by(SAMPLE_STRIDE)
        .map(|i| current[i].abs_diff(previous[i]) as u64)
        .sum();

    (100.0 - diff_sum as f64 / DIFF_DIVISOR)
        .round()
        .clamp(0.0, 100.0) as u8
}

/// Holds the previous tick's sample.
///
/// Exactly one slot; each stored sample replaces the last. Empty at the start
/// of a session, which leaves stability undefined for the first tick.
#[derive(Debug, Default)]
pub struct StabilityTracker {
    previous: Option<IntensitySample>,
}

impl StabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&IntensitySample> {
        self.previous.as_ref()
    }

    /// Score `current` against the stored sample, if any
    pub fn score(&self, current: &IntensitySample) -> Option<u8> {
        self.previous
            .as_ref()
            .map(|previous| stability_score(current, previous))
    }

    pub fn store(&mut self, sample: IntensitySample) {
        self.previous = Some(sample);
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}

//! Fuzz-style tests using proptest
//!
//! These provide fuzz-like testing without requiring nightly Rust or cargo-fuzz.
//! Run with: cargo test --test fuzz_tests

use docscan::config::EnhancementSettings;
use docscan::enhance::{tone_curve, Enhancer};
use docscan::quality::{
    alignment_score, analyze_frame, stability_score, IntensitySample, QualityAssessment,
    QuadrantCounts, ScoreInputs,
};
use docscan::types::{Frame, PixelFormat};
use proptest::prelude::*;

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (8u32..48, 8u32..48).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
            .prop_map(move |data| Frame::new(data, w, h, PixelFormat::Rgb8).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Alignment stays in range and is unchanged by mirroring
    #[test]
    fn fuzz_alignment_symmetry(
        top in 0u32..5000,
        bottom in 0u32..5000,
        left in 0u32..5000,
        right in 0u32..5000,
    ) {
        let counts = QuadrantCounts::new(top, bottom, left, right);
        let score = alignment_score(&counts);
        prop_assert!(score <= 100);
        prop_assert_eq!(score, alignment_score(&counts.mirrored()));
    }

    /// Composite score is clamped for any plausible inputs
    #[test]
    fn fuzz_composite_in_range(
        mean in 0.0f64..=255.0,
        std_dev in 0.0f64..=128.0,
        edges in 0.0f64..=1500.0,
        alignment in 0u8..=100,
        stability in prop::option::of(0u8..=100),
        detected in any::<bool>(),
    ) {
        let assessment = QualityAssessment::compute(&ScoreInputs {
            mean_luminance: mean,
            luminance_std_dev: std_dev,
            mean_edge_magnitude: edges,
            alignment,
            stability,
            document_detected: detected,
        });
        prop_assert!(assessment.score <= 100);
        prop_assert!(assessment.edge_score <= 100.0);
    }

    /// A frame compared with itself never moved
    #[test]
    fn fuzz_self_stability(frame in frame_strategy()) {
        let a = IntensitySample::from_frame(&frame);
        let b = IntensitySample::from_frame(&frame);
        prop_assert_eq!(stability_score(&a, &b), 100);
    }

    /// Analysis of arbitrary pixels never panics and keeps every figure in range
    #[test]
    fn fuzz_analyze_frame(frame in frame_strategy()) {
        let (analysis, sample) = analyze_frame(&frame, None);
        prop_assert!(analysis.score() <= 100);
        prop_assert!(analysis.alignment <= 100);
        prop_assert_eq!(analysis.detection.visibility.is_some(), analysis.detection.detected);
        prop_assert!(analysis.luminance.mean >= 0.0 && analysis.luminance.mean <= 255.0);

        let (second, _) = analyze_frame(&frame, Some(&sample));
        prop_assert_eq!(second.stability, Some(100));
    }

    /// Tone curve is monotone for every allowed setting
    #[test]
    fn fuzz_tone_curve_monotone(brightness in 50u8..=150, contrast in 50u8..=150) {
        let lut = tone_curve(brightness, contrast);
        for pair in lut.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    /// Enhancement keeps geometry and format
    #[test]
    fn fuzz_enhance_geometry(
        frame in frame_strategy(),
        brightness in 50u8..=150,
        contrast in 50u8..=150,
        sharpness in 100u8..=150,
    ) {
        let settings = EnhancementSettings { auto_enhance: true, brightness, contrast, sharpness };
        let out = Enhancer::new(settings).enhance(frame.clone());
        prop_assert_eq!(out.data.len(), frame.data.len());
        prop_assert_eq!((out.width, out.height, out.format), (frame.width, frame.height, frame.format));
    }

    /// Frames with inconsistent buffers are rejected, not analysed
    #[test]
    fn fuzz_frame_geometry_checked(w in 0u32..64, h in 0u32..64, len in 0usize..10_000) {
        let result = Frame::new(vec![0; len], w, h, PixelFormat::Rgb8);
        let valid = w > 0 && h > 0 && len == (w * h * 3) as usize;
        prop_assert_eq!(result.is_ok(), valid);
    }
}

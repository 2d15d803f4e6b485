//! Alignment scoring from edge band balance
//!
//! A centred document produces roughly equal edge counts on opposite sides.

use super::edges::QuadrantCounts;

/// Centering score in [0, 100]
pub fn alignment_score(counts: &QuadrantCounts) -> u8 {
    let horizontal = 100.0 - (counts.left as f64 - counts.right as f64).abs() * 2.0;
    let vertical = 100.0 - (counts.top as f64 - counts.bottom as f64).abs() * 2.0;
    ((horizontal + vertical) / 2.0).round().clamp(0.0, 100.0) as u8
}

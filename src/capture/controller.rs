//! Capture state machine
//!
//! Idle -> Analyzing -> PendingCapture -> Captured, with retake and stop
//! returning to Idle. A pending capture fires once its due time passes.

use crate::errors::ScanError;
use crate::quality::FrameAnalysis;
use crate::types::ScanMode;
use serde::{Deserialize, Serialize};

/// Delay between the gates opening and the auto capture firing
pub const CAPTURE_DELAY_MS: u64 = 800;
/// Analysis tick period
pub const TICK_INTERVAL_MS: u64 = 500;

pub const MIN_CAPTURE_SCORE: u8 = 70;
/// Stability must be strictly above this
pub const MIN_CAPTURE_STABILITY: u8 = 80;
/// Alignment must be strictly above this
pub const MIN_CAPTURE_ALIGNMENT: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Idle,
    Analyzing,
    PendingCapture {
        due_at_ms: u64,
    },
    Captured,
}

impl CaptureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Analyzing => "analyzing",
            CaptureState::PendingCapture { .. } => "pending_capture",
            CaptureState::Captured => "captured",
        }
    }
}

/// The tick values the auto capture conditions look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureGate {
    pub score: u8,
    pub stability: Option<u8>,
    pub document_detected: bool,
    pub alignment: u8,
}

impl CaptureGate {
    pub fn from_analysis(analysis: &FrameAnalysis) -> Self {
        Self {
            score: analysis.score(),
            stability: analysis.stability,
            document_detected: analysis.detection.detected,
            alignment: analysis.alignment,
        }
    }

    /// All four conditions on the same tick
    pub fn is_open(&self) -> bool {
        self.score >= MIN_CAPTURE_SCORE
            && self.stability.is_some_and(|s| s > MIN_CAPTURE_STABILITY)
            && self.document_detected
            && self.alignment > MIN_CAPTURE_ALIGNMENT
    }
}

/// What the controller did with a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum CaptureDecision {
    /// Keep analysing
    Continue,
    /// Gates held and a capture is now pending
    Scheduled { due_at_ms: u64 },
    /// Gates held but the mode leaves triggering to the operator
    ManualOnly,
    /// Not in the analysing state; the tick changed nothing
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CaptureController {
    state: CaptureState,
    delay_ms: u64,
}

impl CaptureController {
    pub fn new() -> Self {
        Self::with_delay(CAPTURE_DELAY_MS)
    }

    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            state: CaptureState::Idle,
            delay_ms,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_captured(&self) -> bool {
        self.state == CaptureState::Captured
    }

    pub fn due_at(&self) -> Option<u64> {
        match self.state {
            CaptureState::PendingCapture { due_at_ms } => Some(due_at_ms),
            _ => None,
        }
    }

    /// Idle -> Analyzing; other states are left alone
    pub fn begin_analysis(&mut self) {
        if self.state == CaptureState::Idle {
            self.transition(CaptureState::Analyzing);
        }
    }

    /// Apply a tick's gate values at `now_ms`
    pub fn evaluate(&mut self, mode: ScanMode, gate: &CaptureGate, now_ms: u64) -> CaptureDecision {
        if self.state != CaptureState::Analyzing {
            return CaptureDecision::Ignored;
        }
        if !gate.is_open() {
            return CaptureDecision::Continue;
        }
        if !mode.allows_auto_capture() {
            return CaptureDecision::ManualOnly;
        }

        let due_at_ms = now_ms.saturating_add(self.delay_ms);
        self.transition(CaptureState::PendingCapture { due_at_ms });
        CaptureDecision::Scheduled { due_at_ms }
    }

    /// A pending capture whose delay has run out
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.due_at().is_some_and(|due| now_ms >= due)
    }

    /// PendingCapture -> Captured
    pub fn complete_capture(&mut self) {
        if self.due_at().is_some() {
            self.transition(CaptureState::Captured);
        } else {
            log::warn!(
                "complete_capture in state {}; ignoring",
                self.state.as_str()
            );
        }
    }

    /// Operator request; captures from any state except Captured
    pub fn trigger_manual(&mut self) -> Result<(), ScanError> {
        if self.is_captured() {
            return Err(ScanError::AlreadyCaptured);
        }
        self.transition(CaptureState::Captured);
        Ok(())
    }

    /// PendingCapture -> Analyzing
    pub fn cancel_pending(&mut self) {
        if self.due_at().is_some() {
            self.transition(CaptureState::Analyzing);
        }
    }

    /// Discard the capture and start over
    pub fn retake(&mut self) {
        self.transition(CaptureState::Idle);
    }

    pub fn reset(&mut self) {
        self.transition(CaptureState::Idle);
    }

    fn transition(&mut self, next: CaptureState) {
        if self.state != next {
            log::debug!("Capture state {} -> {}", self.state.as_str(), next.as_str());
            self.state = next;
        }
    }
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::new()
    }
}

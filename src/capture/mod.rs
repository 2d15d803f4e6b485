//! Capture control: state machine, session and async driver

pub mod controller;
pub mod driver;
pub mod session;

pub use controller::{
    CaptureController, CaptureDecision, CaptureGate, CaptureState, CAPTURE_DELAY_MS,
    TICK_INTERVAL_MS,
};
pub use driver::{DriveOutcome, SessionCommand, SessionDriver};
pub use session::{
    CaptureSession, CaptureTrigger, CapturedImage, SkipReason, TickOutcome, TickReport,
};

use thiserror::Error;

/// Errors produced by the capture engine.
///
/// Camera acquisition failures are terminal for a session. Frame reads and
/// readiness checks are transient: the tick that hit them is skipped and the
/// next tick retries.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Camera acquisition error: {0}")]
    CameraAcquisition(String),
    #[error("Camera is not ready")]
    CameraNotReady,
    #[error("Frame read error: {0}")]
    FrameRead(String),
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("An image has already been captured in this session")]
    AlreadyCaptured,
    #[error("Capture session is not active")]
    SessionInactive,
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl ScanError {
    /// Whether the failure should be retried on the next tick instead of surfaced.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScanError::CameraNotReady | ScanError::FrameRead(_))
    }
}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        ScanError::Encoding(err.to_string())
    }
}

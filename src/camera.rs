//! Camera collaborator boundary
//!
//! The engine never talks to hardware. The host supplies a [`CameraSource`]
//! that opens a [`FrameStream`] at the requested resolution and facing; the
//! session holds the stream in an [`ActiveStream`] guard so it is stopped on
//! every exit path, including drop.

use crate::config::ScannerConfig;
use crate::errors::ScanError;
use crate::types::{FacingMode, Frame, Resolution};
use serde::{Deserialize, Serialize};

/// What the session asks the camera for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    pub resolution: Resolution,
    pub facing: FacingMode,
}

impl StreamRequest {
    pub fn for_scanner(scanner: &ScannerConfig) -> Self {
        Self {
            resolution: scanner.quality.resolution(),
            facing: scanner.facing,
        }
    }
}

/// Opens camera streams
pub trait CameraSource {
    type Stream: FrameStream;

    /// Acquire the camera. Errors here are terminal for the session.
    fn acquire(&mut self, request: &StreamRequest) -> Result<Self::Stream, ScanError>;
}

/// A live stream of full-resolution frames
pub trait FrameStream {
    /// Read the most recent frame.
    ///
    /// `ScanError::CameraNotReady` while the stream warms up and
    /// `ScanError::FrameRead` for a dropped frame; both are retried next tick.
    fn read_frame(&mut self) -> Result<Frame, ScanError>;

    /// Stop all underlying capture tracks
    fn stop(&mut self);
}

/// Owns an acquired stream and stops it when dropped
pub struct ActiveStream<S: FrameStream> {
    stream: Option<S>,
    request: StreamRequest,
}

impl<S: FrameStream> ActiveStream<S> {
    pub fn new(stream: S, request: StreamRequest) -> Self {
        log::info!(
            "Camera stream acquired: {}x{} facing {:?}",
            request.resolution.width,
            request.resolution.height,
            request.facing
        );
        Self {
            stream: Some(stream),
            request,
        }
    }

    pub fn request(&self) -> &StreamRequest {
        &self.request
    }

    pub fn read_frame(&mut self) -> Result<Frame, ScanError> {
        match self.stream.as_mut() {
            Some(stream) => stream.read_frame(),
            None => Err(ScanError::CameraNotReady),
        }
    }

    /// Stop the stream now rather than at drop
    pub fn release(mut self) {
        self.stop_inner();
    }

    fn stop_inner(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::info!("Camera stream released (facing {:?})", self.request.facing);
        }
    }
}

impl<S: FrameStream> Drop for ActiveStream<S> {
    fn drop(&mut self) {
        self.stop_inner();
    }
}

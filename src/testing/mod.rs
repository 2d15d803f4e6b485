//! Testing utilities for docscan
//!
//! Synthetic document scenes and a scripted camera, so the analysis
//! pipeline and capture sessions can be exercised without hardware.

pub mod scripted_camera;
pub mod synthetic_data;

pub use scripted_camera::{CameraTracker, ScriptHandle, ScriptStep, ScriptedCamera, ScriptedStream};
pub use synthetic_data::{
    frame_from_rgb, solid_frame, synthetic_document_frame, synthetic_video_frame, DocumentScene,
};

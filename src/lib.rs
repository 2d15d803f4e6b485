//! docscan: real-time document capture quality engine
//!
//! Analyses live camera frames for document presence, alignment, stability
//! and image quality, auto-captures once the scene is good enough, and
//! enhances the captured frame before handing it off for upload.
//!
//! # Features
//! - Sobel edge detection on a 200x200 intensity grid
//! - Quadrant alignment and frame-to-frame stability scores
//! - Heuristic document classification
//! - Composite quality score gating a delayed auto-capture
//! - Brightness, contrast and sharpening on the captured frame
//!
//! # Usage
//! ```rust,ignore
//! use docscan::{CaptureSession, ScanConfig, SessionDriver};
//!
//! let mut session = CaptureSession::new(my_camera, ScanConfig::load_or_default())?;
//! let (tx, mut rx) = tokio::sync::mpsc::channel(8);
//! let outcome = SessionDriver::new().run(&mut session, &mut rx).await?;
//! ```
pub mod camera;
pub mod capture;
pub mod config;
pub mod enhance;
pub mod errors;
pub mod quality;
pub mod timing;
pub mod types;

// Testing utilities - synthetic scenes and a scripted camera
pub mod testing;

// Re-exports for convenience
pub use camera::{ActiveStream, CameraSource, FrameStream, StreamRequest};
pub use capture::{
    CaptureSession, CaptureState, CapturedImage, DriveOutcome, SessionCommand, SessionDriver,
    TickOutcome,
};
pub use config::{EnhancementSettings, ScanConfig, ScannerConfig};
pub use enhance::Enhancer;
pub use errors::ScanError;
pub use quality::{analyze_frame, DocumentCategory, DocumentClassification, FrameAnalysis};
pub use types::{FacingMode, Frame, PixelFormat, QualityTier, Resolution, ScanMode};

/// Initialize logging for the engine
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "docscan=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

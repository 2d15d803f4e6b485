//! Capture session
//!
//! Owns the camera stream, the previous analysis sample and the capture
//! state for one scan. Ticks are driven from outside with a millisecond
//! timestamp, so the session itself is synchronous and deterministic.

use super::controller::{CaptureController, CaptureDecision, CaptureGate, CaptureState};
use crate::camera::{ActiveStream, CameraSource, StreamRequest};
use crate::config::{EnhancementSettings, ScanConfig};
use crate::enhance::Enhancer;
use crate::errors::ScanError;
use crate::quality::{
    analyze_frame, DocumentCategory, DocumentClassification, FrameAnalysis, StabilityTracker,
};
use crate::types::{FacingMode, Frame, QualityTier, ScanMode};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a tick did no analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Inactive,
    CapturePending,
    Captured,
    /// Detection switched off in the scanner config
    DetectionDisabled,
    CameraNotReady,
    FrameUnavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    /// Analysed ticks so far, starting at 1
    pub tick: u64,
    pub at_ms: u64,
    pub analysis: FrameAnalysis,
    pub decision: CaptureDecision,
}

#[derive(Debug, Clone)]
pub enum TickOutcome {
    Skipped(SkipReason),
    Analyzed(TickReport),
}

impl TickOutcome {
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            TickOutcome::Analyzed(report) => Some(report),
            TickOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureTrigger {
    Auto,
    Manual,
}

/// The single enhanced image a session produces
#[derive(Debug, Clone, Serialize)]
pub struct CapturedImage {
    pub id: String,
    pub session_id: String,
    /// JPEG bytes
    #[serde(skip)]
    pub encoded: Bytes,
    pub width: u32,
    pub height: u32,
    pub quality: QualityTier,
    pub jpeg_quality: u8,
    pub enhancement: EnhancementSettings,
    pub classification: DocumentClassification,
    pub category: DocumentCategory,
    /// Score of the last analysed tick, if any
    pub score: Option<u8>,
    pub trigger: CaptureTrigger,
    pub source_frame_id: String,
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn size_bytes(&self) -> usize {
        self.encoded.len()
    }
}

pub struct CaptureSession<C: CameraSource> {
    id: String,
    source: C,
    config: ScanConfig,
    stream: Option<ActiveStream<C::Stream>>,
    controller: CaptureController,
    stability: StabilityTracker,
    last_analysis: Option<FrameAnalysis>,
    category_override: Option<DocumentCategory>,
    captured: Option<CapturedImage>,
    ticks: u64,
}

impl<C: CameraSource> CaptureSession<C> {
    pub fn new(source: C, config: ScanConfig) -> Result<Self, ScanError> {
        config.validate().map_err(ScanError::InvalidConfig)?;

        let id = uuid::Uuid::new_v4().to_string();
        log::debug!(
            "Created capture session {} (mode {:?}, quality {:?})",
            id,
            config.scanner.mode,
            config.scanner.quality
        );

        Ok(Self {
            id,
            source,
            config,
            stream: None,
            controller: CaptureController::new(),
            stability: StabilityTracker::new(),
            last_analysis: None,
            category_override: None,
            captured: None,
            ticks: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn state(&self) -> CaptureState {
        self.controller.state()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn facing(&self) -> FacingMode {
        self.config.scanner.facing
    }

    pub fn mode(&self) -> ScanMode {
        self.config.scanner.mode
    }

    pub fn pending_due_at(&self) -> Option<u64> {
        self.controller.due_at()
    }

    pub fn last_analysis(&self) -> Option<&FrameAnalysis> {
        self.last_analysis.as_ref()
    }

    pub fn captured(&self) -> Option<&CapturedImage> {
        self.captured.as_ref()
    }

    /// Acquire the camera and begin analysing
    pub fn start(&mut self) -> Result<(), ScanError> {
        if self.is_active() {
            log::debug!("Session {} already started", self.id);
            return Ok(());
        }

        self.acquire()?;
        self.controller.begin_analysis();
        log::info!("Capture session {} started", self.id);
        Ok(())
    }

    /// One analysis tick at `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        let Some(stream) = self.stream.as_mut() else {
            return TickOutcome::Skipped(SkipReason::Inactive);
        };

        match self.controller.state() {
            CaptureState::PendingCapture { .. } => {
                return TickOutcome::Skipped(SkipReason::CapturePending)
            }
            CaptureState::Captured => return TickOutcome::Skipped(SkipReason::Captured),
            CaptureState::Idle => self.controller.begin_analysis(),
            CaptureState::Analyzing => {}
        }

        if !self.config.scanner.ai_detection {
            return TickOutcome::Skipped(SkipReason::DetectionDisabled);
        }

        let frame = match stream.read_frame() {
            Ok(frame) => frame,
            Err(ScanError::CameraNotReady) => {
                return TickOutcome::Skipped(SkipReason::CameraNotReady)
            }
            Err(e) => {
                log::debug!("Tick at {}ms skipped: {}", now_ms, e);
                return TickOutcome::Skipped(SkipReason::FrameUnavailable);
            }
        };

        let (analysis, sample) = analyze_frame(&frame, self.stability.previous());
        self.stability.store(sample);
        self.ticks += 1;

        let gate = CaptureGate::from_analysis(&analysis);
        let decision = self
            .controller
            .evaluate(self.config.scanner.mode, &gate, now_ms);
        if let CaptureDecision::Scheduled { due_at_ms } = decision {
            log::info!(
                "Quality gates held (score {}); capture due at {}ms",
                gate.score,
                due_at_ms
            );
        }

        self.last_analysis = Some(analysis.clone());
        TickOutcome::Analyzed(TickReport {
            tick: self.ticks,
            at_ms: now_ms,
            analysis,
            decision,
        })
    }

    /// Fire a scheduled capture once its delay has elapsed
    pub fn poll_pending(&mut self, now_ms: u64) -> Result<Option<&CapturedImage>, ScanError> {
        if !self.controller.is_due(now_ms) {
            return Ok(None);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        let frame = match stream.read_frame() {
            Ok(frame) => frame,
            Err(e) if e.is_transient() => {
                log::debug!("Scheduled capture deferred: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.finish_capture(frame, CaptureTrigger::Auto).map(Some)
    }

    /// Capture immediately on operator request
    pub fn trigger_capture(&mut self) -> Result<&CapturedImage, ScanError> {
        if self.controller.is_captured() {
            return Err(ScanError::AlreadyCaptured);
        }
        let stream = self.stream.as_mut().ok_or(ScanError::SessionInactive)?;
        let frame = stream.read_frame()?;
        self.finish_capture(frame, CaptureTrigger::Manual)
    }

    /// Override the category sent with the capture
    pub fn set_category(&mut self, category: DocumentCategory) {
        self.category_override = Some(category);
        if let Some(image) = self.captured.as_mut() {
            image.category = category;
        }
    }

    /// Hand the captured image over for upload
    pub fn take_captured(&mut self) -> Option<CapturedImage> {
        self.captured.take()
    }

    /// Discard the capture and analyse afresh
    pub fn retake(&mut self) {
        self.captured = None;
        self.last_analysis = None;
        self.category_override = None;
        self.stability.reset();
        self.controller.retake();
        if self.is_active() {
            self.controller.begin_analysis();
        }
        log::info!("Session {} retake", self.id);
    }

    /// Reacquire the camera facing the other way
    pub fn switch_facing(&mut self) -> Result<(), ScanError> {
        let facing = self.config.scanner.facing.toggled();
        self.config.scanner.facing = facing;
        self.controller.cancel_pending();
        self.stability.reset();
        // The other camera sees a different scene
        self.last_analysis = None;

        if let Some(stream) = self.stream.take() {
            stream.release();
            self.acquire()?;
        }
        log::info!("Session {} now facing {:?}", self.id, facing);
        Ok(())
    }

    /// Cancel everything and release the camera
    pub fn stop(&mut self) {
        self.release_stream();
        self.controller.reset();
        self.stability.reset();
        self.last_analysis = None;
        self.category_override = None;
        self.captured = None;
        log::info!("Capture session {} stopped", self.id);
    }

    fn acquire(&mut self) -> Result<(), ScanError> {
        let request = StreamRequest::for_scanner(&self.config.scanner);
        match self.source.acquire(&request) {
            Ok(stream) => {
                self.stream = Some(ActiveStream::new(stream, request));
                Ok(())
            }
            Err(e) => {
                log::error!("Camera acquisition failed for session {}: {}", self.id, e);
                self.release_stream();
                self.controller.reset();
                self.stability.reset();
                Err(match e {
                    ScanError::CameraAcquisition(_) => e,
                    other => ScanError::CameraAcquisition(other.to_string()),
                })
            }
        }
    }

    fn release_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.release();
        }
    }

    fn finish_capture(
        &mut self,
        frame: Frame,
        trigger: CaptureTrigger,
    ) -> Result<&CapturedImage, ScanError> {
        let tier = self.config.scanner.quality;
        let enhancement = self.config.enhancement;
        let source_frame_id = frame.id.clone();
        let encoded = Enhancer::new(enhancement).process(frame, tier)?;

        match trigger {
            CaptureTrigger::Auto => self.controller.complete_capture(),
            CaptureTrigger::Manual => self.controller.trigger_manual()?,
        }

        let classification = self
            .last_analysis
            .as_ref()
            .map(|a| a.classification)
            .unwrap_or_default();
        let category = self
            .category_override
            .unwrap_or_else(|| classification.into());

        let image = CapturedImage {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: self.id.clone(),
            encoded: encoded.bytes,
            width: encoded.width,
            height: encoded.height,
            quality: tier,
            jpeg_quality: encoded.quality,
            enhancement,
            classification,
            category,
            score: self.last_analysis.as_ref().map(|a| a.score()),
            trigger,
            source_frame_id,
            captured_at: Utc::now(),
        };

        log::info!(
            "Session {} captured {} ({:?}, category {})",
            self.id,
            image.id,
            trigger,
            category.as_str()
        );
        Ok(&*self.captured.insert(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{synthetic_document_frame, ScriptStep, ScriptedCamera};

    fn session(camera: ScriptedCamera) -> CaptureSession<ScriptedCamera> {
        CaptureSession::new(camera, ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ScanConfig::default();
        config.enhancement.brightness = 10;
        let result = CaptureSession::new(ScriptedCamera::denied(), config);
        assert!(matches!(result, Err(ScanError::InvalidConfig(_))));
    }

    #[test]
    fn test_tick_before_start_is_inactive() {
        let mut session = session(ScriptedCamera::still(synthetic_document_frame(200, 200)));
        assert!(matches!(
            session.tick(0),
            TickOutcome::Skipped(SkipReason::Inactive)
        ));
    }

    #[test]
    fn test_failed_acquisition_aborts() {
        let mut session = session(ScriptedCamera::denied());
        assert!(matches!(
            session.start(),
            Err(ScanError::CameraAcquisition(_))
        ));
        assert!(!session.is_active());
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn test_transient_reads_skip_ticks() {
        let frame = synthetic_document_frame(200, 200);
        let camera = ScriptedCamera::new(vec![
            ScriptStep::NotReady,
            ScriptStep::Dropped,
            ScriptStep::Frame(frame),
        ]);
        let mut session = session(camera);
        session.start().unwrap();

        assert!(matches!(
            session.tick(0),
            TickOutcome::Skipped(SkipReason::CameraNotReady)
        ));
        assert!(matches!(
            session.tick(500),
            TickOutcome::Skipped(SkipReason::FrameUnavailable)
        ));
        let outcome = session.tick(1000);
        let report = outcome.report().unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(report.analysis.stability, None);
    }

    #[test]
    fn test_detection_disabled_skips_analysis() {
        let camera = ScriptedCamera::still(synthetic_document_frame(200, 200));
        let tracker = camera.tracker();
        let mut config = ScanConfig::default();
        config.scanner.ai_detection = false;
        let mut session = CaptureSession::new(camera, config).unwrap();
        session.start().unwrap();

        assert!(matches!(
            session.tick(0),
            TickOutcome::Skipped(SkipReason::DetectionDisabled)
        ));
        assert_eq!(tracker.reads(), 0);
        assert!(session.trigger_capture().is_ok());
    }

    #[test]
    fn test_category_override() {
        let mut session = session(ScriptedCamera::still(synthetic_document_frame(200, 200)));
        session.start().unwrap();
        session.tick(0);
        session.set_category(DocumentCategory::Passport);
        let image = session.trigger_capture().unwrap();
        assert_eq!(image.classification, DocumentClassification::GenericDocument);
        assert_eq!(image.category, DocumentCategory::Passport);

        session.set_category(DocumentCategory::IdCard);
        assert_eq!(session.captured().unwrap().category, DocumentCategory::IdCard);
    }

    #[test]
    fn test_take_captured_keeps_state() {
        let mut session = session(ScriptedCamera::still(synthetic_document_frame(200, 200)));
        session.start().unwrap();
        session.trigger_capture().unwrap();
        assert!(session.take_captured().is_some());
        assert!(session.take_captured().is_none());
        assert_eq!(session.state(), CaptureState::Captured);
        assert!(matches!(
            session.trigger_capture(),
            Err(ScanError::AlreadyCaptured)
        ));
    }
}

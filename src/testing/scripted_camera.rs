//! Scripted camera for session tests
//!
//! Plays back a queue of frames and failures. Once the queue runs dry the
//! last frame is repeated, which models a camera pointed at a still scene.

use crate::camera::{CameraSource, FrameStream, StreamRequest};
use crate::errors::ScanError;
use crate::types::Frame;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// One read from the scripted stream
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Frame(Frame),
    /// Stream still warming up
    NotReady,
    /// A frame went missing
    Dropped,
    /// The device handed back an unusable buffer
    Corrupt,
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<ScriptStep>,
    last: Option<Frame>,
}

impl Script {
    fn next(&mut self) -> Result<Frame, ScanError> {
        match self.steps.pop_front() {
            Some(ScriptStep::Frame(frame)) => {
                self.last = Some(frame.clone());
                Ok(frame)
            }
            Some(ScriptStep::NotReady) => Err(ScanError::CameraNotReady),
            Some(ScriptStep::Dropped) => Err(ScanError::FrameRead("scripted drop".to_string())),
            Some(ScriptStep::Corrupt) => {
                Err(ScanError::InvalidFrame("scripted corrupt buffer".to_string()))
            }
            None => self
                .last
                .clone()
                .ok_or_else(|| ScanError::FrameRead("script exhausted".to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    acquisitions: AtomicUsize,
    releases: AtomicUsize,
    reads: AtomicUsize,
    last_request: Mutex<Option<StreamRequest>>,
}

/// Shared view of what the session did with the camera
#[derive(Debug, Clone, Default)]
pub struct CameraTracker {
    state: Arc<TrackerState>,
}

impl CameraTracker {
    pub fn acquisitions(&self) -> usize {
        self.state.acquisitions.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.state.releases.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.state.reads.load(Ordering::SeqCst)
    }

    /// True while an acquired stream has not been stopped
    pub fn is_streaming(&self) -> bool {
        self.acquisitions() > self.releases()
    }

    pub fn last_request(&self) -> Option<StreamRequest> {
        *lock(&self.state.last_request)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct ScriptedCamera {
    script: Arc<Mutex<Script>>,
    tracker: CameraTracker,
    deny_acquire: bool,
}

impl ScriptedCamera {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                steps: steps.into(),
                last: None,
            })),
            tracker: CameraTracker::default(),
            deny_acquire: false,
        }
    }

    /// Camera that always shows the same frame
    pub fn still(frame: Frame) -> Self {
        Self::new(vec![ScriptStep::Frame(frame)])
    }

    /// Camera whose acquisition is refused, like a denied permission
    pub fn denied() -> Self {
        let mut camera = Self::new(Vec::new());
        camera.deny_acquire = true;
        camera
    }

    pub fn tracker(&self) -> CameraTracker {
        self.tracker.clone()
    }

    /// Append steps; visible to streams that are already open
    pub fn push(&self, step: ScriptStep) {
        lock(&self.script).steps.push_back(step);
    }

    /// Handle for appending steps after the camera moved into a session
    pub fn script_handle(&self) -> ScriptHandle {
        ScriptHandle {
            script: self.script.clone(),
        }
    }
}

/// Appends steps to a camera's script from outside the session
#[derive(Clone)]
pub struct ScriptHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptHandle {
    pub fn push(&self, step: ScriptStep) {
        lock(&self.script).steps.push_back(step);
    }
}

impl CameraSource for ScriptedCamera {
    type Stream = ScriptedStream;

    fn acquire(&mut self, request: &StreamRequest) -> Result<Self::Stream, ScanError> {
        if self.deny_acquire {
            return Err(ScanError::CameraAcquisition(
                "permission denied".to_string(),
            ));
        }

        self.tracker.state.acquisitions.fetch_add(1, Ordering::SeqCst);
        *lock(&self.tracker.state.last_request) = Some(*request);

        Ok(ScriptedStream {
            script: self.script.clone(),
            tracker: self.tracker.clone(),
            stopped: false,
        })
    }
}

pub struct ScriptedStream {
    script: Arc<Mutex<Script>>,
    tracker: CameraTracker,
    stopped: bool,
}

impl FrameStream for ScriptedStream {
    fn read_frame(&mut self) -> Result<Frame, ScanError> {
        if self.stopped {
            return Err(ScanError::CameraNotReady);
        }
        self.tracker.state.reads.fetch_add(1, Ordering::SeqCst);
        lock(&self.script).next()
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.tracker.state.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

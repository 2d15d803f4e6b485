//! Async driver for a capture session
//!
//! Runs the analysis tick on a tokio interval, waits out the capture delay
//! with `sleep_until`, and applies operator commands arriving on a channel.

use super::controller::TICK_INTERVAL_MS;
use super::session::{CaptureSession, CapturedImage, TickOutcome, TickReport};
use crate::camera::CameraSource;
use crate::errors::ScanError;
use crate::timing::SessionClock;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Operator input while a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Shutter button
    Capture,
    Retake,
    SwitchFacing,
    Stop,
}

#[derive(Debug)]
pub enum DriveOutcome {
    Captured(CapturedImage),
    Stopped,
}

pub struct SessionDriver {
    tick_interval: Duration,
    clock: SessionClock,
    reports: Option<mpsc::UnboundedSender<TickReport>>,
}

impl SessionDriver {
    pub fn new() -> Self {
        Self {
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            clock: SessionClock::new(),
            reports: None,
        }
    }

    /// Forward every analysed tick, for live guidance
    pub fn with_reports(mut self, reports: mpsc::UnboundedSender<TickReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Drive `session` until it captures or is stopped.
    ///
    /// Starts the session if needed. A closed command channel counts as stop.
    /// Camera acquisition and encoding errors end the run, and the session
    /// is stopped before the error is returned.
    pub async fn run<C: CameraSource>(
        &mut self,
        session: &mut CaptureSession<C>,
        commands: &mut mpsc::Receiver<SessionCommand>,
    ) -> Result<DriveOutcome, ScanError> {
        if let Some(image) = session.captured() {
            return Ok(DriveOutcome::Captured(image.clone()));
        }

        let result = self.drive(session, commands).await;
        if let Err(e) = &result {
            log::error!("Session {} ended with error: {}", session.id(), e);
            session.stop();
        }
        result
    }

    async fn drive<C: CameraSource>(
        &mut self,
        session: &mut CaptureSession<C>,
        commands: &mut mpsc::Receiver<SessionCommand>,
    ) -> Result<DriveOutcome, ScanError> {
        session.start()?;

        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Earliest retry after a scheduled capture could not read a frame
        let mut retry_at: Option<Instant> = None;

        loop {
            let due = session.pending_due_at().map(|ms| {
                let at = self.clock.instant_at(ms);
                retry_at.map_or(at, |retry| retry.max(at))
            });

            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(SessionCommand::Capture) => match session.trigger_capture() {
                            Ok(image) => return Ok(DriveOutcome::Captured(image.clone())),
                            Err(e) if e.is_transient() => {
                                log::warn!("Capture request failed, try again: {}", e);
                            }
                            Err(e) => return Err(e),
                        },
                        Some(SessionCommand::Retake) => {
                            retry_at = None;
                            session.retake();
                        }
                        Some(SessionCommand::SwitchFacing) => {
                            retry_at = None;
                            session.switch_facing()?;
                        }
                        Some(SessionCommand::Stop) | None => {
                            session.stop();
                            return Ok(DriveOutcome::Stopped);
                        }
                    }
                }
                _ = time::sleep_until(due.unwrap_or_else(Instant::now)), if due.is_some() => {
                    match session.poll_pending(self.clock.elapsed_ms())? {
                        Some(image) => return Ok(DriveOutcome::Captured(image.clone())),
                        None => retry_at = Some(Instant::now() + self.tick_interval),
                    }
                }
                _ = interval.tick() => {
                    let outcome = session.tick(self.clock.elapsed_ms());
                    if let TickOutcome::Analyzed(report) = outcome {
                        if let Some(tx) = &self.reports {
                            let _ = tx.send(report);
                        }
                    }
                }
            }
        }
    }
}

impl Default for SessionDriver {
    fn default() -> Self {
        Self::new()
    }
}

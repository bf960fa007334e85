//! The export state machine.
//!
//! `idle → selecting → recording → processing → idle`. Every exit path releases the capture
//! surface exactly once; failures drop buffered segments and return to `idle` without a file.

use std::path::PathBuf;

use crate::config::model::Theme;
use crate::export::capture::{
    Blob, BufferState, CaptureError, CaptureHost, CaptureRequest, DownloadSink, Segment,
    SurfaceHandle, VideoFormat, WallClock,
};
use crate::export::state::RecordingStatus;
use crate::export::timers::{FiredTimer, TimerKind, TimerQueue};
use crate::foundation::core::Millis;
use crate::studio::stage::StageTree;

/// Pause between surface grant and buffering start, so the UI-hide transition finishes.
pub const SETTLE_DELAY_MS: Millis = 800;
/// Time from buffering start to the stop request.
pub const CAPTURE_DURATION_MS: Millis = 6000;
/// Mime type of the assembled file.
pub const EXPORT_MIME: &str = "video/webm";

/// Download name for an export: `pac-card-<theme>-<unix-millis>.webm`.
pub fn export_file_name(theme: Theme, unix_millis: u64) -> String {
    format!("pac-card-{}-{}.webm", theme.id(), unix_millis)
}

/// Result of invoking export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportRequest {
    /// Surface granted; buffering starts after the settle delay.
    Started,
    /// A session is already active; nothing happened.
    Ignored,
    /// Acquisition failed; back to idle.
    Aborted(String),
}

/// A delivered export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutcome {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// How a session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportFinished {
    Completed(ExportOutcome),
    Aborted(String),
}

struct RecordingSession {
    id: u64,
    theme: Theme,
    format: VideoFormat,
    surface: Option<SurfaceHandle>,
    chunks: Vec<Segment>,
    buffering_since: Option<Millis>,
}

impl RecordingSession {
    fn release<H: CaptureHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(surface) = self.surface.take() {
            tracing::debug!(session = self.id, surface = surface.id, "releasing capture surface");
            host.release_surface(surface);
        }
    }
}

/// Export workflow. Owns the recording session and its timers.
pub struct ExportWorkflow {
    status: RecordingStatus,
    session: Option<RecordingSession>,
    timers: TimerQueue,
    request: CaptureRequest,
    next_session: u64,
}

impl Default for ExportWorkflow {
    fn default() -> Self {
        Self::new(CaptureRequest::default())
    }
}

impl ExportWorkflow {
    pub fn new(request: CaptureRequest) -> Self {
        Self {
            status: RecordingStatus::Idle,
            session: None,
            timers: TimerQueue::new(),
            request,
            next_session: 0,
        }
    }

    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// Capture request sent on every export.
    pub fn capture_request(&self) -> &CaptureRequest {
        &self.request
    }

    /// Format negotiated for the active session.
    pub fn active_format(&self) -> Option<VideoFormat> {
        self.session.as_ref().map(|s| s.format)
    }

    /// Earliest time [`ExportWorkflow::advance`] has timer work to do.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// When buffering started for the active session.
    pub fn buffering_since(&self) -> Option<Millis> {
        self.session.as_ref().and_then(|s| s.buffering_since)
    }

    fn set_status(&mut self, next: RecordingStatus) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal export transition {} -> {}",
            self.status,
            next
        );
        tracing::debug!(from = %self.status, to = %next, "export status");
        self.status = next;
    }

    /// Invoke export. A no-op unless idle.
    pub fn request_export<H: CaptureHost + ?Sized>(
        &mut self,
        host: &mut H,
        theme: Theme,
        now: Millis,
    ) -> ExportRequest {
        if self.status.is_active() {
            tracing::debug!(status = %self.status, "export already in progress; request ignored");
            return ExportRequest::Ignored;
        }

        self.next_session += 1;
        let id = self.next_session;
        self.set_status(RecordingStatus::Selecting);
        tracing::info!(session = id, theme = theme.id(), "requesting capture surface");

        let surface = match host.acquire_surface(&self.request) {
            Ok(surface) => surface,
            Err(err) => {
                tracing::warn!(session = id, error = %err, "recording failed or cancelled");
                self.set_status(RecordingStatus::Idle);
                return ExportRequest::Aborted(err.to_string());
            }
        };

        let format = VideoFormat::negotiate(|f| host.supports_format(f));
        tracing::info!(
            session = id,
            width = surface.width,
            height = surface.height,
            fps = surface.fps,
            mime = format.mime(),
            "capture surface granted"
        );

        self.session = Some(RecordingSession {
            id,
            theme,
            format,
            surface: Some(surface),
            chunks: Vec::new(),
            buffering_since: None,
        });
        self.set_status(RecordingStatus::Recording);
        self.timers
            .schedule(now, SETTLE_DELAY_MS, TimerKind::StartBuffering, id);
        ExportRequest::Started
    }

    /// Run everything due at `now`: fire timers in order, let the host capture the stage and
    /// finish the session when buffering has stopped.
    pub fn advance<H, D>(
        &mut self,
        host: &mut H,
        downloads: &mut D,
        clock: &dyn WallClock,
        now: Millis,
        stage: &StageTree,
    ) -> Option<ExportFinished>
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        while let Some(timer) = self.timers.pop_due(now) {
            if !self.owns(&timer) {
                tracing::debug!(?timer, "stale timer ignored");
                continue;
            }
            // Capture everything up to the deadline before acting on it.
            if let Some(done) = self.pump(host, downloads, clock, timer.deadline, stage) {
                return Some(done);
            }
            if let Some(done) = self.fire(host, downloads, clock, timer) {
                return Some(done);
            }
        }
        self.pump(host, downloads, clock, now, stage)
    }

    fn owns(&self, timer: &FiredTimer) -> bool {
        self.status == RecordingStatus::Recording
            && self.session.as_ref().is_some_and(|s| s.id == timer.session)
    }

    fn fire<H, D>(
        &mut self,
        host: &mut H,
        downloads: &mut D,
        clock: &dyn WallClock,
        timer: FiredTimer,
    ) -> Option<ExportFinished>
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        match timer.kind {
            TimerKind::StartBuffering => {
                let session = self.session.as_mut()?;
                if host.buffer_state() == BufferState::Inactive {
                    let surface = session.surface.as_ref()?;
                    if let Err(err) = host.start_buffering(surface, session.format, timer.deadline) {
                        return Some(self.abort(host, err));
                    }
                    session.buffering_since = Some(timer.deadline);
                    tracing::info!(session = session.id, at_ms = timer.deadline, "buffering started");
                } else {
                    tracing::debug!(session = session.id, "buffer already active; start skipped");
                }
                self.timers.schedule(
                    timer.deadline,
                    CAPTURE_DURATION_MS,
                    TimerKind::StopBuffering,
                    timer.session,
                );
                None
            }
            TimerKind::StopBuffering => {
                if host.buffer_state() != BufferState::Active {
                    // The host stopped on its own; run the same cleanup as a normal stop.
                    let has_data = self.session.as_ref().is_some_and(|s| !s.chunks.is_empty());
                    tracing::info!(session = timer.session, has_data, "buffer already stopped");
                    return Some(if has_data {
                        self.finish(host, downloads, clock)
                    } else {
                        self.abort(
                            host,
                            CaptureError::failed("buffer stopped before any data was captured"),
                        )
                    });
                }
                tracing::info!(session = timer.session, at_ms = timer.deadline, "stopping buffering");
                Some(self.stop_and_finish(host, downloads, clock))
            }
        }
    }

    fn pump<H, D>(
        &mut self,
        host: &mut H,
        downloads: &mut D,
        clock: &dyn WallClock,
        at: Millis,
        stage: &StageTree,
    ) -> Option<ExportFinished>
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        if self.status != RecordingStatus::Recording {
            return None;
        }
        let report = match host.pump(at, stage) {
            Ok(report) => report,
            Err(err) => return Some(self.abort(host, err)),
        };
        let session = self.session.as_mut()?;
        session.chunks.extend(report.segments);

        if !report.surface_ended {
            return None;
        }
        if session.buffering_since.is_none() {
            return Some(self.abort(
                host,
                CaptureError::failed("capture surface ended before buffering started"),
            ));
        }
        tracing::info!(session = session.id, at_ms = at, "capture surface ended early");
        if host.buffer_state() == BufferState::Active {
            Some(self.stop_and_finish(host, downloads, clock))
        } else {
            Some(self.finish(host, downloads, clock))
        }
    }

    fn stop_and_finish<H, D>(
        &mut self,
        host: &mut H,
        downloads: &mut D,
        clock: &dyn WallClock,
    ) -> ExportFinished
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        match host.stop_buffering() {
            Ok(tail) => {
                if let Some(session) = self.session.as_mut() {
                    session.chunks.extend(tail);
                }
                self.finish(host, downloads, clock)
            }
            Err(err) => self.abort(host, err),
        }
    }

    fn finish<H, D>(&mut self, host: &mut H, downloads: &mut D, clock: &dyn WallClock) -> ExportFinished
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        self.set_status(RecordingStatus::Processing);
        let Some(mut session) = self.session.take() else {
            self.set_status(RecordingStatus::Idle);
            return ExportFinished::Aborted("no active recording session".to_string());
        };

        let chunks = std::mem::take(&mut session.chunks);
        let blob = Blob::concat(chunks, EXPORT_MIME);
        let file_name = export_file_name(session.theme, clock.unix_millis());
        let delivered = downloads.deliver(&file_name, &blob);

        session.release(host);
        self.set_status(RecordingStatus::Idle);

        match delivered {
            Ok(path) => {
                tracing::info!(
                    session = session.id,
                    file = %path.display(),
                    bytes = blob.len(),
                    "export delivered"
                );
                ExportFinished::Completed(ExportOutcome {
                    file_name,
                    path,
                    bytes: blob.len(),
                })
            }
            Err(err) => {
                tracing::warn!(session = session.id, error = %err, "export delivery failed");
                ExportFinished::Aborted(err.to_string())
            }
        }
    }

    fn abort<H: CaptureHost + ?Sized>(&mut self, host: &mut H, err: CaptureError) -> ExportFinished {
        tracing::warn!(error = %err, "recording failed or cancelled");
        if let Some(mut session) = self.session.take() {
            if host.buffer_state() == BufferState::Active
                && let Err(stop_err) = host.stop_buffering()
            {
                tracing::debug!(error = %stop_err, "stop during abort failed");
            }
            session.chunks.clear();
            session.release(host);
        }
        self.status = RecordingStatus::Idle;
        ExportFinished::Aborted(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/workflow.rs"]
mod tests;

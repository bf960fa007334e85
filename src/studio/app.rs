//! Application root: owns the card configuration and the export workflow.

use std::time::{Duration, Instant};

use crate::config::model::CardConfig;
use crate::config::settings::StudioSettings;
use crate::export::capture::{CaptureHost, CaptureRequest, DownloadSink, WallClock};
use crate::export::state::RecordingStatus;
use crate::export::workflow::{ExportFinished, ExportRequest, ExportWorkflow};
use crate::foundation::core::Millis;
use crate::foundation::error::{CardError, CardResult};
use crate::panel::{ControlPanel, Edit, PanelView};
use crate::studio::stage::{StageTree, render_stage};

/// Monotonic time source for [`Studio::drive_export`].
pub trait Ticker {
    fn now(&self) -> Millis;
    fn sleep_until(&mut self, deadline: Millis);
}

/// [`Ticker`] backed by `Instant` and `thread::sleep`.
#[derive(Clone, Copy, Debug)]
pub struct RealTicker {
    epoch: Instant,
}

impl Default for RealTicker {
    fn default() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Ticker for RealTicker {
    fn now(&self) -> Millis {
        self.epoch.elapsed().as_millis() as Millis
    }

    fn sleep_until(&mut self, deadline: Millis) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(Duration::from_millis(deadline - now));
        }
    }
}

/// Configuration plus export state. Edits are rejected while an export is active so the
/// recorded card matches what was on screen when export was invoked.
pub struct Studio {
    settings: StudioSettings,
    config: CardConfig,
    workflow: ExportWorkflow,
}

impl Studio {
    pub fn new(settings: StudioSettings, config: CardConfig) -> Self {
        let request = CaptureRequest {
            ideal_width: settings.capture.width,
            ideal_height: settings.capture.height,
            ideal_fps: settings.capture.fps,
            ..CaptureRequest::default()
        };
        Self {
            settings,
            config,
            workflow: ExportWorkflow::new(request),
        }
    }

    pub fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn status(&self) -> RecordingStatus {
        self.workflow.status()
    }

    pub fn workflow(&self) -> &ExportWorkflow {
        &self.workflow
    }

    /// Apply one panel edit. Returns `false` (and changes nothing) during an export.
    pub fn apply_edit(&mut self, edit: Edit) -> bool {
        if self.status().is_active() {
            tracing::debug!(field = edit.field(), status = %self.status(), "edit ignored during export");
            return false;
        }
        self.config = ControlPanel::apply(&self.config, edit);
        true
    }

    /// Replace the whole configuration. Same rule as [`Studio::apply_edit`].
    pub fn set_config(&mut self, config: CardConfig) -> bool {
        if self.status().is_active() {
            tracing::debug!(status = %self.status(), "config replacement ignored during export");
            return false;
        }
        self.config = config;
        true
    }

    /// Current stage for the configured viewport.
    pub fn stage(&self) -> StageTree {
        render_stage(&self.config, self.status(), self.settings.viewport)
    }

    pub fn panel(&self) -> PanelView {
        ControlPanel::describe(&self.config, self.status())
    }

    pub fn request_export<H: CaptureHost + ?Sized>(&mut self, host: &mut H, now: Millis) -> ExportRequest {
        self.workflow.request_export(host, self.config.theme, now)
    }

    /// Advance the workflow to `now` against the current stage.
    pub fn tick<H, D>(
        &mut self,
        host: &mut H,
        downloads: &mut D,
        clock: &dyn WallClock,
        now: Millis,
    ) -> Option<ExportFinished>
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        let stage = self.stage();
        self.workflow.advance(host, downloads, clock, now, &stage)
    }

    /// Run one export to completion in real time.
    pub fn run_export<H, D>(
        &mut self,
        host: &mut H,
        downloads: &mut D,
        clock: &dyn WallClock,
    ) -> CardResult<ExportFinished>
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        self.drive_export(host, downloads, clock, &mut RealTicker::default())
    }

    /// Blocking event loop: request export, then sleep until the next timer deadline or frame
    /// interval and advance, until the session ends.
    #[tracing::instrument(level = "debug", skip_all, fields(theme = self.config.theme.id()))]
    pub fn drive_export<H, D>(
        &mut self,
        host: &mut H,
        downloads: &mut D,
        clock: &dyn WallClock,
        ticker: &mut dyn Ticker,
    ) -> CardResult<ExportFinished>
    where
        H: CaptureHost + ?Sized,
        D: DownloadSink + ?Sized,
    {
        match self.request_export(host, ticker.now()) {
            ExportRequest::Started => {}
            ExportRequest::Ignored => {
                return Err(CardError::validation("an export is already in progress"));
            }
            ExportRequest::Aborted(reason) => return Ok(ExportFinished::Aborted(reason)),
        }

        let frame_ms = (1000 / Millis::from(self.settings.capture.fps.max(1))).max(1);
        loop {
            let now = ticker.now();
            if let Some(done) = self.tick(host, downloads, clock, now) {
                return Ok(done);
            }
            if !self.status().is_active() {
                return Ok(ExportFinished::Aborted(
                    "export ended without a result".to_string(),
                ));
            }
            let wake = self
                .workflow
                .next_deadline()
                .map_or(now + frame_ms, |d| d.min(now + frame_ms));
            ticker.sleep_until(wake);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/app.rs"]
mod tests;

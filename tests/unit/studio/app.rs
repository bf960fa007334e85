use super::*;
use crate::config::model::Theme;
use crate::export::capture::{
    BufferState, CaptureError, PumpReport, Segment, SurfaceHandle, VideoFormat,
};
use crate::export::download::MemoryDownloads;
use crate::export::workflow::{CAPTURE_DURATION_MS, SETTLE_DELAY_MS};
use crate::studio::stage::StageMode;

#[derive(Default)]
struct ScriptedHost {
    deny: bool,
    active: bool,
    pumps: Vec<(Millis, StageMode)>,
    released: u32,
}

impl CaptureHost for ScriptedHost {
    fn acquire_surface(&mut self, request: &CaptureRequest) -> Result<SurfaceHandle, CaptureError> {
        if self.deny {
            return Err(CaptureError::Denied("cancelled".into()));
        }
        Ok(SurfaceHandle {
            id: 1,
            width: request.ideal_width,
            height: request.ideal_height,
            fps: request.ideal_fps,
        })
    }

    fn supports_format(&self, format: VideoFormat) -> bool {
        format == VideoFormat::WebmVp9
    }

    fn buffer_state(&self) -> BufferState {
        if self.active {
            BufferState::Active
        } else {
            BufferState::Inactive
        }
    }

    fn start_buffering(
        &mut self,
        _surface: &SurfaceHandle,
        _format: VideoFormat,
        _at: Millis,
    ) -> Result<(), CaptureError> {
        self.active = true;
        Ok(())
    }

    fn pump(&mut self, now: Millis, stage: &StageTree) -> Result<PumpReport, CaptureError> {
        self.pumps.push((now, stage.mode));
        let segments = if self.active { vec![Segment(vec![7])] } else { Vec::new() };
        Ok(PumpReport {
            segments,
            surface_ended: false,
        })
    }

    fn stop_buffering(&mut self) -> Result<Vec<Segment>, CaptureError> {
        self.active = false;
        Ok(Vec::new())
    }

    fn release_surface(&mut self, _surface: SurfaceHandle) {
        self.released += 1;
    }
}

struct Clock;

impl WallClock for Clock {
    fn unix_millis(&self) -> u64 {
        1_700_000_000_000
    }
}

#[derive(Default)]
struct SimTicker {
    now: Millis,
    sleeps: u32,
}

impl Ticker for SimTicker {
    fn now(&self) -> Millis {
        self.now
    }

    fn sleep_until(&mut self, deadline: Millis) {
        assert!(deadline > self.now, "loop must make progress");
        self.now = deadline;
        self.sleeps += 1;
    }
}

fn studio() -> Studio {
    let mut settings = StudioSettings::default();
    settings.capture.fps = 10;
    Studio::new(settings, CardConfig::default().with_theme(Theme::Mario))
}

#[test]
fn capture_request_follows_settings() {
    let s = studio();
    let req = s.workflow().capture_request();
    assert_eq!((req.ideal_width, req.ideal_height, req.ideal_fps), (1920, 1080, 10));
    assert!(!req.audio);
}

#[test]
fn edits_apply_while_idle() {
    let mut s = studio();
    assert!(s.apply_edit(Edit::Text("GAME OVER".into())));
    assert_eq!(s.config().text, "GAME OVER");
    assert_eq!(s.stage().mode, StageMode::Editing);
    assert!(!s.panel().export.disabled);
}

#[test]
fn edits_are_ignored_during_export() {
    let mut s = studio();
    let mut host = ScriptedHost::default();
    assert_eq!(s.request_export(&mut host, 0), ExportRequest::Started);

    assert!(!s.apply_edit(Edit::Theme(Theme::Snake)));
    assert!(!s.set_config(CardConfig::default()));
    assert_eq!(s.config().theme, Theme::Mario);
    assert_eq!(s.stage().mode, StageMode::Recording);
    assert!(s.panel().export.disabled);
    assert_eq!(s.request_export(&mut host, 10), ExportRequest::Ignored);
}

#[test]
fn drive_export_runs_to_completion_in_simulated_time() {
    let mut s = studio();
    let mut host = ScriptedHost::default();
    let mut downloads = MemoryDownloads::default();
    let mut ticker = SimTicker::default();

    let done = s
        .drive_export(&mut host, &mut downloads, &Clock, &mut ticker)
        .unwrap();

    let ExportFinished::Completed(outcome) = done else {
        panic!("expected a file, got {done:?}");
    };
    assert_eq!(outcome.file_name, "pac-card-mario-1700000000000.webm");
    assert_eq!(ticker.now, SETTLE_DELAY_MS + CAPTURE_DURATION_MS);
    assert_eq!(downloads.delivered.len(), 1);
    assert_eq!(downloads.delivered[0].1.mime, "video/webm");
    assert_eq!(host.released, 1);
    assert_eq!(s.status(), RecordingStatus::Idle);

    // Frame-interval wakeups while recording; the stage is in recording mode throughout.
    assert!(ticker.sleeps >= 60);
    assert!(host.pumps.iter().all(|(_, mode)| *mode == StageMode::Recording));
}

#[test]
fn denied_surface_finishes_without_sleeping() {
    let mut s = studio();
    let mut host = ScriptedHost {
        deny: true,
        ..ScriptedHost::default()
    };
    let mut downloads = MemoryDownloads::default();
    let mut ticker = SimTicker::default();

    let done = s
        .drive_export(&mut host, &mut downloads, &Clock, &mut ticker)
        .unwrap();
    assert!(matches!(done, ExportFinished::Aborted(_)));
    assert_eq!(ticker.sleeps, 0);
    assert!(downloads.delivered.is_empty());
    assert_eq!(s.status(), RecordingStatus::Idle);
}

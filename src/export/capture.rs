//! Capability interface the export workflow drives.
//!
//! Any environment that can show a surface, encode it and hand out a file implements
//! [`CaptureHost`] and [`DownloadSink`]; the state machine never touches the host directly.

use std::path::PathBuf;

use crate::foundation::core::Millis;
use crate::foundation::error::CardResult;
use crate::studio::stage::StageTree;

/// Capability-level failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user (or host policy) refused or cancelled the capture prompt.
    #[error("capture denied: {0}")]
    Denied(String),
    /// The host cannot capture at all (missing encoder, no display).
    #[error("capture unavailable: {0}")]
    Unavailable(String),
    /// Any failure after the surface was granted.
    #[error("capture failed: {0}")]
    Failed(String),
}

impl CaptureError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// What surface the workflow asks for.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptureRequest {
    /// Ideal surface width in pixels.
    pub ideal_width: u32,
    /// Ideal surface height in pixels.
    pub ideal_height: u32,
    /// Ideal frame rate.
    pub ideal_fps: u32,
    /// Always `false`: export is video only.
    pub audio: bool,
    /// Preferred surface kind (`"browser"` = the current tab/stage).
    pub display_surface: String,
    /// Ask the host to preselect the current tab/stage.
    pub prefer_current_tab: bool,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            ideal_width: 1920,
            ideal_height: 1080,
            ideal_fps: 60,
            audio: false,
            display_surface: "browser".to_string(),
            prefer_current_tab: true,
        }
    }
}

/// Handle to a granted capture surface. Owned by exactly one recording session.
#[derive(Debug, PartialEq, Eq)]
pub struct SurfaceHandle {
    /// Host-assigned id.
    pub id: u64,
    /// Granted width in pixels.
    pub width: u32,
    /// Granted height in pixels.
    pub height: u32,
    /// Granted frame rate.
    pub fps: u32,
}

/// Encoded container/codec choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VideoFormat {
    /// WebM with VP9; preferred.
    WebmVp9,
    /// Plain WebM (host default codec); fallback.
    Webm,
}

impl VideoFormat {
    /// Preference order.
    pub const PREFERENCE: [Self; 2] = [Self::WebmVp9, Self::Webm];

    pub fn mime(self) -> &'static str {
        match self {
            Self::WebmVp9 => "video/webm;codecs=vp9",
            Self::Webm => "video/webm",
        }
    }

    /// First supported format, falling back to plain WebM when nothing matches.
    pub fn negotiate(supports: impl Fn(Self) -> bool) -> Self {
        Self::PREFERENCE
            .into_iter()
            .find(|f| supports(*f))
            .unwrap_or(Self::Webm)
    }
}

/// Whether the host encoder is currently buffering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferState {
    Inactive,
    Active,
}

/// One encoded chunk, in delivery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment(pub Vec<u8>);

/// Output of one [`CaptureHost::pump`] call.
#[derive(Debug, Default)]
pub struct PumpReport {
    /// Segments that became available since the last pump.
    pub segments: Vec<Segment>,
    /// The host ended the surface on its own (user revoked sharing, source closed).
    pub surface_ended: bool,
}

/// Assembled export file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    /// Container mime type.
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Blob {
    /// Concatenate segments in order.
    pub fn concat(segments: Vec<Segment>, mime: &'static str) -> Self {
        let total = segments.iter().map(|s| s.0.len()).sum();
        let mut bytes = Vec::with_capacity(total);
        for seg in segments {
            bytes.extend_from_slice(&seg.0);
        }
        Self { mime, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Host capture and encoding capability.
pub trait CaptureHost {
    /// Ask for a capture surface. May prompt the user; may be denied.
    fn acquire_surface(&mut self, request: &CaptureRequest) -> Result<SurfaceHandle, CaptureError>;

    /// Whether the host encoder can produce `format`.
    fn supports_format(&self, format: VideoFormat) -> bool;

    /// Current encoder state.
    fn buffer_state(&self) -> BufferState;

    /// Begin encoding the surface. `at` is the workflow time buffering starts; captured frames
    /// are timed from it. Only called while [`BufferState::Inactive`].
    fn start_buffering(
        &mut self,
        surface: &SurfaceHandle,
        format: VideoFormat,
        at: Millis,
    ) -> Result<(), CaptureError>;

    /// Let the host capture whatever the stage shows at `now` and hand back new segments.
    fn pump(&mut self, now: Millis, stage: &StageTree) -> Result<PumpReport, CaptureError>;

    /// Stop encoding and flush. Returns every segment not yet handed out. Only called while
    /// [`BufferState::Active`].
    fn stop_buffering(&mut self) -> Result<Vec<Segment>, CaptureError>;

    /// Stop all underlying tracks of the surface.
    fn release_surface(&mut self, surface: SurfaceHandle);
}

/// Client-side download mechanism.
pub trait DownloadSink {
    /// Hand the assembled file to the user. Returns where it ended up.
    fn deliver(&mut self, file_name: &str, blob: &Blob) -> CardResult<PathBuf>;
}

/// Source of wall-clock timestamps for file names.
pub trait WallClock {
    fn unix_millis(&self) -> u64;
}

/// [`WallClock`] backed by `SystemTime`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn unix_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

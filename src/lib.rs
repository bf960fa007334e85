#![forbid(unsafe_code)]

//! Themed pixel-art cards: a pure card renderer, a CPU rasterizer for the live stage and a
//! fixed-length WebM export workflow driven against a capture host.

pub mod card;
pub mod config;
pub mod export;
pub mod foundation;
pub mod panel;
pub mod render;
pub mod studio;

pub use card::tree::{CardTree, render};
pub use config::model::{
    AspectRatio, CardConfig, ConfigPatch, FontFamily, HorizontalAlign, Theme, VerticalAlign,
};
pub use config::settings::{CaptureSettings, StudioSettings};
pub use export::capture::{
    Blob, CaptureError, CaptureHost, CaptureRequest, DownloadSink, SystemWallClock, VideoFormat,
    WallClock,
};
pub use export::download::{DirectoryDownloads, MemoryDownloads};
pub use export::ffmpeg::{FfmpegCaptureHost, is_ffmpeg_on_path};
pub use export::state::RecordingStatus;
pub use export::workflow::{ExportFinished, ExportOutcome, ExportRequest, ExportWorkflow};
pub use foundation::core::{Millis, Rgba8, Viewport};
pub use foundation::error::{CardError, CardResult};
pub use panel::{ControlPanel, Edit, PanelView};
pub use render::frame::FrameRGBA;
pub use render::raster::CardRasterizer;
pub use render::text::FontLibrary;
pub use studio::app::Studio;
pub use studio::stage::{StageTree, render_stage};

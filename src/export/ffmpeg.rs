//! Capture host backed by an offscreen stage rasterizer and the system `ffmpeg`.

use std::cell::OnceCell;
use std::io::{Read, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::config::settings::CaptureSettings;
use crate::export::capture::{
    BufferState, CaptureError, CaptureHost, CaptureRequest, PumpReport, Segment, SurfaceHandle,
    VideoFormat,
};
use crate::foundation::core::{Millis, Rgba8};
use crate::foundation::error::{CardError, CardResult};
use crate::render::frame::flatten_to_opaque_rgba8;
use crate::render::raster::CardRasterizer;
use crate::studio::stage::StageTree;

const STDOUT_CHUNK: usize = 64 * 1024;

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Output of `ffmpeg -encoders`, or empty when it cannot be run.
fn probe_encoders() -> String {
    Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).into_owned())
        .unwrap_or_default()
}

/// `ffmpeg` encoder used for a container format.
pub fn encoder_name(format: VideoFormat) -> &'static str {
    match format {
        VideoFormat::WebmVp9 => "libvpx-vp9",
        VideoFormat::Webm => "libvpx",
    }
}

/// Whether an `ffmpeg -encoders` listing contains `encoder` as a whole word.
pub fn listing_has_encoder(listing: &str, encoder: &str) -> bool {
    listing
        .lines()
        .any(|line| line.split_whitespace().nth(1) == Some(encoder))
}

/// Frames that should have been captured by `now` when buffering started at `start`. Frame 0
/// sits at `start` itself.
pub fn frames_due(start: Millis, now: Millis, fps: u32) -> u64 {
    if now < start {
        return 0;
    }
    (now - start) * u64::from(fps) / 1000 + 1
}

/// Animation time of frame `index`.
pub fn frame_time(start: Millis, index: u64, fps: u32) -> Millis {
    start + index * 1000 / u64::from(fps.max(1))
}

#[derive(Clone, Copy, Debug)]
struct Surface {
    id: u64,
    width: u32,
    height: u32,
    fps: u32,
}

struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    segments: mpsc::Receiver<Segment>,
    stdout_drain: Option<JoinHandle<()>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    surface: Surface,
    started_at: Millis,
    frames_written: u64,
    scratch: Vec<u8>,
}

impl Encoder {
    fn spawn(surface: Surface, format: VideoFormat, started_at: Millis) -> Result<Self, CaptureError> {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", surface.width, surface.height),
            "-r",
            &surface.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            encoder_name(format),
            "-deadline",
            "realtime",
            "-cpu-used",
            "8",
            "-b:v",
            "4M",
            "-pix_fmt",
            "yuv420p",
            "-f",
            "webm",
            "pipe:1",
        ]);

        let mut child = cmd.spawn().map_err(|e| {
            CaptureError::Unavailable(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(mut stdout), Some(mut stderr)) = (stdin, stdout, stderr) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CaptureError::failed("failed to open ffmpeg pipes (unexpected)"));
        };

        let (tx, rx) = mpsc::channel();
        let stdout_drain = std::thread::spawn(move || {
            let mut buf = vec![0u8; STDOUT_CHUNK];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(Segment(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        Ok(Self {
            child,
            stdin: Some(stdin),
            segments: rx,
            stdout_drain: Some(stdout_drain),
            stderr_drain: Some(stderr_drain),
            surface,
            started_at,
            frames_written: 0,
            scratch: vec![0u8; surface.width as usize * surface.height as usize * 4],
        })
    }

    fn drain_segments(&self) -> Vec<Segment> {
        self.segments.try_iter().collect()
    }

    fn write_frame(&mut self, data: &[u8], premultiplied: bool) -> Result<(), CaptureError> {
        flatten_to_opaque_rgba8(&mut self.scratch, data, premultiplied, Rgba8::BLACK)
            .map_err(|e| CaptureError::failed(e.to_string()))?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CaptureError::failed("ffmpeg encoder is already finalized"));
        };
        stdin
            .write_all(&self.scratch)
            .map_err(|e| CaptureError::failed(format!("failed to write frame to ffmpeg stdin: {e}")))
    }

    /// Close stdin, wait for exit and collect everything still in flight.
    fn finish(mut self) -> CardResult<Vec<Segment>> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| CardError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;

        if let Some(handle) = self.stdout_drain.take()
            && handle.join().is_err()
        {
            return Err(CardError::encode("ffmpeg stdout drain thread panicked"));
        }
        let segments = self.drain_segments();

        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| CardError::encode("ffmpeg stderr drain thread panicked"))??,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(CardError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(segments)
    }

    fn kill(mut self) {
        drop(self.stdin.take());
        if let Err(err) = self.child.kill() {
            tracing::debug!(error = %err, "ffmpeg kill failed");
        }
        let _ = self.child.wait();
        if let Some(h) = self.stdout_drain.take() {
            let _ = h.join();
        }
        if let Some(h) = self.stderr_drain.take() {
            let _ = h.join();
        }
    }
}

/// [`CaptureHost`] that rasterizes the stage offscreen and encodes WebM with `ffmpeg`.
///
/// The surface size comes from the capture request unless `overrides` is set.
pub struct FfmpegCaptureHost {
    rasterizer: CardRasterizer,
    overrides: Option<CaptureSettings>,
    encoders: OnceCell<String>,
    next_surface: u64,
    surface: Option<Surface>,
    encoder: Option<Encoder>,
}

impl FfmpegCaptureHost {
    pub fn new(rasterizer: CardRasterizer, overrides: Option<CaptureSettings>) -> Self {
        Self {
            rasterizer,
            overrides,
            encoders: OnceCell::new(),
            next_surface: 0,
            surface: None,
            encoder: None,
        }
    }

    /// Frames sent to the encoder in the current buffering run.
    pub fn frames_written(&self) -> u64 {
        self.encoder.as_ref().map_or(0, |e| e.frames_written)
    }
}

impl CaptureHost for FfmpegCaptureHost {
    fn acquire_surface(&mut self, request: &CaptureRequest) -> Result<SurfaceHandle, CaptureError> {
        if self.surface.is_some() {
            return Err(CaptureError::failed("capture surface already in use"));
        }
        if !is_ffmpeg_on_path() {
            return Err(CaptureError::Unavailable(
                "ffmpeg is required for export, but was not found on PATH".to_string(),
            ));
        }

        let settings = self.overrides.unwrap_or(CaptureSettings {
            width: request.ideal_width,
            height: request.ideal_height,
            fps: request.ideal_fps,
        });
        settings
            .validate()
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;

        self.next_surface += 1;
        let surface = Surface {
            id: self.next_surface,
            width: settings.width,
            height: settings.height,
            fps: settings.fps,
        };
        self.surface = Some(surface);
        tracing::debug!(
            id = surface.id,
            width = surface.width,
            height = surface.height,
            fps = surface.fps,
            "offscreen capture surface created"
        );

        Ok(SurfaceHandle {
            id: surface.id,
            width: surface.width,
            height: surface.height,
            fps: surface.fps,
        })
    }

    fn supports_format(&self, format: VideoFormat) -> bool {
        let listing = self.encoders.get_or_init(probe_encoders);
        listing_has_encoder(listing, encoder_name(format))
    }

    fn buffer_state(&self) -> BufferState {
        if self.encoder.is_some() {
            BufferState::Active
        } else {
            BufferState::Inactive
        }
    }

    fn start_buffering(
        &mut self,
        surface: &SurfaceHandle,
        format: VideoFormat,
        at: Millis,
    ) -> Result<(), CaptureError> {
        if self.encoder.is_some() {
            return Err(CaptureError::failed("encoder already running"));
        }
        let Some(active) = self.surface.filter(|s| s.id == surface.id) else {
            return Err(CaptureError::failed("unknown capture surface"));
        };
        tracing::debug!(encoder = encoder_name(format), "spawning ffmpeg");
        self.encoder = Some(Encoder::spawn(active, format, at)?);
        Ok(())
    }

    fn pump(&mut self, now: Millis, stage: &StageTree) -> Result<PumpReport, CaptureError> {
        let Some(enc) = self.encoder.as_mut() else {
            return Ok(PumpReport::default());
        };

        let due = frames_due(enc.started_at, now, enc.surface.fps);
        while enc.frames_written < due {
            let anim_ms = frame_time(enc.started_at, enc.frames_written, enc.surface.fps);
            let frame = self
                .rasterizer
                .render_stage(stage, anim_ms, enc.surface.width, enc.surface.height)
                .map_err(|e| CaptureError::failed(e.to_string()))?;
            enc.write_frame(&frame.data, frame.premultiplied)?;
            enc.frames_written += 1;
        }

        Ok(PumpReport {
            segments: enc.drain_segments(),
            surface_ended: false,
        })
    }

    fn stop_buffering(&mut self) -> Result<Vec<Segment>, CaptureError> {
        let enc = self
            .encoder
            .take()
            .ok_or_else(|| CaptureError::failed("encoder is not running"))?;
        let frames = enc.frames_written;
        let segments = enc
            .finish()
            .map_err(|e| CaptureError::failed(e.to_string()))?;
        tracing::debug!(frames, segments = segments.len(), "ffmpeg finished");
        Ok(segments)
    }

    fn release_surface(&mut self, surface: SurfaceHandle) {
        if let Some(enc) = self.encoder.take() {
            tracing::debug!("killing running ffmpeg on release");
            enc.kill();
        }
        if self.surface.is_some_and(|s| s.id == surface.id) {
            self.surface = None;
        }
    }
}

impl Drop for FfmpegCaptureHost {
    fn drop(&mut self) {
        if let Some(enc) = self.encoder.take() {
            enc.kill();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/ffmpeg.rs"]
mod tests;

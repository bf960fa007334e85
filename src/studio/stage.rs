//! Page-level composition around the card: sidebar, preview area, recording mode.

use crate::card::tree::{self, CardTree};
use crate::config::model::CardConfig;
use crate::export::state::RecordingStatus;
use crate::foundation::core::{Point, Rect, Rgba8, Viewport};

/// Width of the control sidebar in editing mode.
pub const PANEL_WIDTH: f64 = 340.0;
/// Card scale while recording.
pub const RECORDING_CARD_SCALE: f64 = 1.25;
/// Page background in editing mode.
pub const EDITING_BACKGROUND: Rgba8 = Rgba8::hex(0xf9fafb);
/// Preview area background in editing mode.
pub const PREVIEW_BACKGROUND: Rgba8 = Rgba8::hex(0xe5e7eb);
/// Sidebar background.
pub const PANEL_BACKGROUND: Rgba8 = Rgba8::rgba(255, 255, 255, 230);

/// Whether the stage shows the editor or the capture-ready view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageMode {
    Editing,
    Recording,
}

impl From<RecordingStatus> for StageMode {
    fn from(status: RecordingStatus) -> Self {
        if status.is_active() {
            Self::Recording
        } else {
            Self::Editing
        }
    }
}

/// Visual description of the whole viewport.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageTree {
    pub viewport: Viewport,
    pub mode: StageMode,
    /// Page background.
    pub background: Rgba8,
    /// Sidebar region; `None` while recording.
    pub panel: Option<Rect>,
    /// Region the card is centered in.
    pub preview: Rect,
    /// Preview area fill (drawn over `background`).
    pub preview_background: Rgba8,
    /// Top-left hint label; `None` while recording.
    pub preview_label: Option<String>,
    pub card: CardTree,
    /// Top-left of the card after scaling, in viewport coordinates.
    pub card_origin: Point,
    /// Uniform card scale (1.0 editing, 1.25 recording).
    pub card_scale: f64,
}

impl StageTree {
    /// Viewport-space rectangle covered by the (scaled) card container.
    pub fn card_rect(&self) -> Rect {
        let s = self.card.container.size;
        Rect::new(
            self.card_origin.x,
            self.card_origin.y,
            self.card_origin.x + s.width * self.card_scale,
            self.card_origin.y + s.height * self.card_scale,
        )
    }
}

/// Compose the stage for a configuration and recording status. Pure.
pub fn render_stage(config: &CardConfig, status: RecordingStatus, viewport: Viewport) -> StageTree {
    let card = tree::render(config, viewport);
    let mode = StageMode::from(status);

    let (background, panel, preview, preview_background, preview_label, card_scale) = match mode {
        StageMode::Editing => {
            let panel_w = PANEL_WIDTH.min(viewport.width);
            (
                EDITING_BACKGROUND,
                Some(Rect::new(0.0, 0.0, panel_w, viewport.height)),
                Rect::new(panel_w, 0.0, viewport.width, viewport.height),
                PREVIEW_BACKGROUND,
                Some(format!("Preview: {} Aspect Ratio", config.aspect_ratio.id())),
                1.0,
            )
        }
        StageMode::Recording => (
            Rgba8::BLACK,
            None,
            Rect::new(0.0, 0.0, viewport.width, viewport.height),
            Rgba8::BLACK,
            None,
            RECORDING_CARD_SCALE,
        ),
    };

    let size = card.container.size;
    let center = preview.center();
    let card_origin = Point::new(
        center.x - size.width * card_scale / 2.0,
        center.y - size.height * card_scale / 2.0,
    );

    StageTree {
        viewport,
        mode,
        background,
        panel,
        preview,
        preview_background,
        preview_label,
        card,
        card_origin,
        card_scale,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/stage.rs"]
mod tests;

use crate::card::layout::{
    self, BORDER_WIDTH, CORNER_RADIUS, DecorationKind, DecorationSizing, DrivingDimension,
    LINE_HEIGHT,
};
use crate::config::model::{AspectRatio, CardConfig, FontFamily, HorizontalAlign, Theme, VerticalAlign};
use crate::foundation::core::{Rect, Rgba8, Size, Viewport};

/// Text shadow color (black at 50%).
pub const TEXT_SHADOW: Rgba8 = Rgba8::rgba(0, 0, 0, 128);
/// Text shadow vertical offset in CSS px.
pub const TEXT_SHADOW_OFFSET_Y: f64 = 4.0;

/// Where the text block sits vertically inside its box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

impl From<VerticalAlign> for VerticalAnchor {
    fn from(v: VerticalAlign) -> Self {
        match v {
            VerticalAlign::Start => Self::Top,
            VerticalAlign::Center => Self::Center,
            VerticalAlign::End => Self::Bottom,
        }
    }
}

/// Card container description.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Container {
    /// Size in CSS px.
    pub size: Size,
    /// Aspect ratio the size was derived from.
    pub aspect_ratio: AspectRatio,
    /// Which dimension was computed first.
    pub driving: DrivingDimension,
    /// Theme background color.
    pub background: Rgba8,
    /// Corner radius; contents are clipped to the rounded rect.
    pub corner_radius: f64,
    /// Inner border width.
    pub border_width: f64,
    /// Border color.
    pub border: Rgba8,
}

/// Text layer description.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextLayer {
    /// Source text, unchanged.
    pub text: String,
    /// Hard lines (split on `\n`).
    pub lines: Vec<String>,
    /// Font choice.
    pub font: FontFamily,
    /// Resolved family name.
    pub family_name: String,
    /// Font size in CSS px.
    pub size_px: f64,
    /// Line height in CSS px.
    pub line_height_px: f64,
    /// Horizontal flow alignment.
    pub align: HorizontalAlign,
    /// Vertical anchor inside `bounds`.
    pub anchor: VerticalAnchor,
    /// Layout box in container coordinates.
    pub bounds: Rect,
    /// Fill color.
    pub color: Rgba8,
    /// Drop shadow color.
    pub shadow: Rgba8,
    /// Drop shadow vertical offset in CSS px.
    pub shadow_offset_y: f64,
}

/// Decoration layer description.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecorationLayer {
    /// Theme the sprite belongs to.
    pub theme: Theme,
    /// Variant and sizing from the lookup table.
    pub sizing: DecorationSizing,
    /// Frame in container coordinates (may overflow the container).
    pub frame: Rect,
}

impl DecorationLayer {
    /// Variant shortcut.
    pub fn kind(&self) -> DecorationKind {
        self.sizing.kind
    }
}

/// Complete visual description of one card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardTree {
    pub container: Container,
    /// Drawn first, beneath the decoration.
    pub text: TextLayer,
    pub decoration: DecorationLayer,
}

/// Map a configuration to its visual tree. Pure and deterministic; never fails.
pub fn render(config: &CardConfig, viewport: Viewport) -> CardTree {
    let (size, driving) = layout::container_size(config.aspect_ratio, viewport);
    let sizing = layout::decoration_sizing(config.theme, config.aspect_ratio);
    let size_px = f64::from(config.text_size);

    CardTree {
        container: Container {
            size,
            aspect_ratio: config.aspect_ratio,
            driving,
            background: config.theme.color(),
            corner_radius: CORNER_RADIUS,
            border_width: BORDER_WIDTH,
            border: Rgba8::WHITE.with_alpha(51),
        },
        text: TextLayer {
            text: config.text.clone(),
            lines: config.text.split('\n').map(str::to_string).collect(),
            font: config.font,
            family_name: config.font.family_name().to_string(),
            size_px,
            line_height_px: size_px * LINE_HEIGHT,
            align: config.horizontal_align,
            anchor: config.vertical_align.into(),
            bounds: layout::text_box(size),
            color: Rgba8::WHITE,
            shadow: TEXT_SHADOW,
            shadow_offset_y: TEXT_SHADOW_OFFSET_Y,
        },
        decoration: DecorationLayer {
            theme: config.theme,
            sizing,
            frame: layout::decoration_frame(sizing, size),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/tree.rs"]
mod tests;

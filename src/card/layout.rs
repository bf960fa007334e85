//! Container and decoration sizing rules.
//!
//! [`decoration_sizing`] is the only place that maps `(theme, aspect ratio)` to a decoration
//! variant and its sizing fraction. Renderer code calls it; nothing else repeats the table.

use crate::config::model::{AspectRatio, Theme};
use crate::foundation::core::{Rect, Size, Viewport};

/// Fraction of the viewport height used by tall and square containers.
pub const HEIGHT_DRIVEN_VH: f64 = 0.85;
/// Absolute cap on the driving height, in CSS px.
pub const HEIGHT_DRIVEN_MAX: f64 = 800.0;
/// Fraction of the viewport width used by wide containers.
pub const WIDTH_DRIVEN_VW: f64 = 0.85;
/// Absolute cap on the driving width, in CSS px.
pub const WIDTH_DRIVEN_MAX: f64 = 1200.0;
/// Independent max-width/max-height caps as viewport fractions.
pub const VIEWPORT_CAP: f64 = 0.9;

/// Text layer inset on the top, left and right edges.
pub const TEXT_INSET: f64 = 32.0;
/// Text layer inset on the bottom edge; keeps text off the decoration.
pub const TEXT_INSET_BOTTOM: f64 = 128.0;
/// Line height as a multiple of the text size.
pub const LINE_HEIGHT: f64 = 1.625;

/// Card corner radius.
pub const CORNER_RADIUS: f64 = 12.0;
/// Card border width.
pub const BORDER_WIDTH: f64 = 4.0;

/// How far the pacman icon hangs below the container, as a fraction of container height.
pub const PACMAN_OVERFLOW: f64 = 0.10;

/// Which container dimension is computed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivingDimension {
    Width,
    Height,
}

/// Decoration variant selected by the theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    /// Circular icon with a jaw wedge, bottom center, overflowing below the edge.
    Jaw,
    /// Full-width strip along the bottom edge.
    Strip,
    /// Square figure anchored bottom right.
    Figure,
}

/// Container axis a sizing fraction applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingAxis {
    Width,
    Height,
}

/// Result of the `(theme, aspect ratio)` lookup.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecorationSizing {
    /// Variant to draw.
    pub kind: DecorationKind,
    /// Axis the fraction is measured along.
    pub axis: SizingAxis,
    /// Fraction of the container along `axis`.
    pub fraction: f64,
}

/// Decoration variant and size for a theme and ratio.
pub fn decoration_sizing(theme: Theme, ratio: AspectRatio) -> DecorationSizing {
    let (kind, axis) = theme_variant(theme);
    let fraction = match (theme, ratio) {
        (Theme::Pacman, AspectRatio::Story9x16) => 0.80,
        (Theme::Pacman, AspectRatio::Portrait4x5) => 0.60,
        (Theme::Pacman, AspectRatio::Square1x1) => 0.50,
        (Theme::Pacman, AspectRatio::Wide16x9) => 0.30,

        (Theme::Snake, AspectRatio::Story9x16) => 0.15,
        (Theme::Snake, AspectRatio::Portrait4x5) => 0.18,
        (Theme::Snake, AspectRatio::Square1x1) => 0.22,
        (Theme::Snake, AspectRatio::Wide16x9) => 0.30,

        (Theme::Mario, AspectRatio::Story9x16) => 0.90,
        (Theme::Mario, AspectRatio::Portrait4x5) => 0.70,
        (Theme::Mario, AspectRatio::Square1x1) => 0.55,
        (Theme::Mario, AspectRatio::Wide16x9) => 0.30,
    };
    DecorationSizing {
        kind,
        axis,
        fraction,
    }
}

/// Lenient lookup from a raw ratio label; unknown labels use each theme's fallback fraction.
pub fn sizing_for_ratio_label(theme: Theme, label: &str) -> DecorationSizing {
    match label.parse::<AspectRatio>() {
        Ok(ratio) => decoration_sizing(theme, ratio),
        Err(_) => {
            let (kind, axis) = theme_variant(theme);
            let fraction = match theme {
                Theme::Pacman => 0.80,
                Theme::Snake => 0.20,
                Theme::Mario => 0.60,
            };
            DecorationSizing {
                kind,
                axis,
                fraction,
            }
        }
    }
}

fn theme_variant(theme: Theme) -> (DecorationKind, SizingAxis) {
    match theme {
        Theme::Pacman => (DecorationKind::Jaw, SizingAxis::Width),
        Theme::Snake => (DecorationKind::Strip, SizingAxis::Height),
        Theme::Mario => (DecorationKind::Figure, SizingAxis::Width),
    }
}

/// Container size for a ratio inside a viewport.
///
/// Wide containers are width-driven, all others height-driven. The result is then scaled
/// uniformly until it fits the independent 90% viewport caps.
pub fn container_size(ratio: AspectRatio, viewport: Viewport) -> (Size, DrivingDimension) {
    let r = ratio.ratio();
    let (mut w, mut h, driving) = if ratio.is_landscape() {
        let w = (WIDTH_DRIVEN_VW * viewport.width).min(WIDTH_DRIVEN_MAX);
        (w, w / r, DrivingDimension::Width)
    } else {
        let h = (HEIGHT_DRIVEN_VH * viewport.height).min(HEIGHT_DRIVEN_MAX);
        (h * r, h, DrivingDimension::Height)
    };

    let max_w = VIEWPORT_CAP * viewport.width;
    let max_h = VIEWPORT_CAP * viewport.height;
    let fit = (max_w / w).min(max_h / h).min(1.0);
    if fit < 1.0 {
        w *= fit;
        h *= fit;
    }
    (Size::new(w, h), driving)
}

/// Decoration frame in container coordinates. May extend past the container bounds.
pub fn decoration_frame(sizing: DecorationSizing, container: Size) -> Rect {
    match sizing.kind {
        DecorationKind::Jaw => {
            let side = container.width * sizing.fraction;
            let bottom = container.height * (1.0 + PACMAN_OVERFLOW);
            let x0 = (container.width - side) / 2.0;
            Rect::new(x0, bottom - side, x0 + side, bottom)
        }
        DecorationKind::Strip => {
            let h = container.height * sizing.fraction;
            Rect::new(0.0, container.height - h, container.width, container.height)
        }
        DecorationKind::Figure => {
            let side = container.width * sizing.fraction;
            Rect::new(
                container.width - side,
                container.height - side,
                container.width,
                container.height,
            )
        }
    }
}

/// Box the text layer lays out in, in container coordinates.
pub fn text_box(container: Size) -> Rect {
    let x1 = (container.width - TEXT_INSET).max(TEXT_INSET);
    let y1 = (container.height - TEXT_INSET_BOTTOM).max(TEXT_INSET);
    Rect::new(TEXT_INSET, TEXT_INSET, x1, y1)
}

#[cfg(test)]
#[path = "../../tests/unit/card/layout.rs"]
mod tests;

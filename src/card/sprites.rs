//! Pixel-art decoration sprites as SVG documents.
//!
//! Each sprite lives in its own view box and is parameterized by animation time so the
//! rasterizer can produce any frame of the loop.

use std::fmt::Write as _;

use crate::card::layout::DecorationKind;
use crate::foundation::core::Millis;

/// Pacman chomp period.
pub const JAW_PERIOD_MS: Millis = 400;
/// Widest jaw half-angle in degrees.
pub const JAW_MAX_DEG: f64 = 40.0;
/// Time for the snake to cross the strip once.
pub const SNAKE_PERIOD_MS: Millis = 3000;
/// Mario hop period.
pub const HOP_PERIOD_MS: Millis = 800;
/// Hop height in sprite units.
pub const HOP_HEIGHT: f64 = 6.0;

/// View box `(width, height)` of each sprite.
pub fn view_box(kind: DecorationKind) -> (f64, f64) {
    match kind {
        DecorationKind::Jaw => (200.0, 200.0),
        DecorationKind::Strip => (400.0, 100.0),
        DecorationKind::Figure => (100.0, 100.0),
    }
}

/// SVG document for a decoration at `anim_ms`.
pub fn sprite_svg(kind: DecorationKind, anim_ms: Millis) -> String {
    match kind {
        DecorationKind::Jaw => jaw_svg(jaw_angle_deg(anim_ms)),
        DecorationKind::Strip => strip_svg(snake_offset(anim_ms)),
        DecorationKind::Figure => figure_svg(hop_offset(anim_ms)),
    }
}

/// Loop position in `[0, 1)`.
fn phase(anim_ms: Millis, period: Millis) -> f64 {
    (anim_ms % period) as f64 / period as f64
}

/// Triangle wave over the period, `0 -> 1 -> 0`.
fn triangle(anim_ms: Millis, period: Millis) -> f64 {
    let p = phase(anim_ms, period);
    1.0 - (2.0 * p - 1.0).abs()
}

/// Jaw half-angle at `anim_ms`.
pub fn jaw_angle_deg(anim_ms: Millis) -> f64 {
    JAW_MAX_DEG * triangle(anim_ms, JAW_PERIOD_MS)
}

/// Snake x-offset in strip units; the body enters from the left and exits right.
pub fn snake_offset(anim_ms: Millis) -> f64 {
    // Body spans 0..178; travel far enough to leave the 400-wide strip.
    -180.0 + 580.0 * phase(anim_ms, SNAKE_PERIOD_MS)
}

/// Upward hop in sprite units.
pub fn hop_offset(anim_ms: Millis) -> f64 {
    let p = phase(anim_ms, HOP_PERIOD_MS);
    // Parabolic arc: 0 at both ends of the period, HOP_HEIGHT at the middle.
    HOP_HEIGHT * 4.0 * p * (1.0 - p)
}

fn jaw_svg(angle: f64) -> String {
    let mut s = String::with_capacity(640);
    s.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200" overflow="visible">"#);
    s.push_str(r#"<g transform="rotate(-90 100 100)">"#);
    let _ = write!(
        s,
        r##"<g transform="rotate({top:.3} 100 100)"><path d="M100,100 L200,100 A100,100 0 0,0 0,100 Z" fill="#FFD700" stroke="black" stroke-width="6"/><circle cx="100" cy="45" r="10" fill="#1a1a1a"/></g>"##,
        top = -angle
    );
    let _ = write!(
        s,
        r##"<g transform="rotate({bottom:.3} 100 100)"><path d="M100,100 L0,100 A100,100 0 0,0 200,100 Z" fill="#FFD700" stroke="black" stroke-width="6"/></g>"##,
        bottom = angle
    );
    s.push_str("</g></svg>");
    s
}

fn strip_svg(offset: f64) -> String {
    let mut s = String::with_capacity(900);
    s.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="100" viewBox="0 0 400 100" preserveAspectRatio="xMidYMid meet">"#);
    let _ = write!(s, r#"<g transform="translate({offset:.3} 0)">"#);
    for x in [0, 35, 70, 105, 140] {
        let _ = write!(
            s,
            r##"<rect x="{x}" y="40" width="30" height="30" fill="#0f380f"/>"##
        );
    }
    // Eye and tongue on the head segment.
    s.push_str(r##"<rect x="155" y="45" width="5" height="5" fill="#8bac0f"/>"##);
    s.push_str(r##"<rect x="168" y="52" width="10" height="4" fill="#8bac0f"/>"##);
    s.push_str("</g>");
    s.push_str(r##"<g transform="translate(300 40)"><rect x="5" y="5" width="20" height="20" rx="4" fill="#0f380f"/><rect x="12" y="0" width="4" height="6" fill="#0f380f"/></g>"##);
    s.push_str("</svg>");
    s
}

/// `(x, y, w, h, fill)` cells of the 12x12 figure, before the 3x scale.
const FIGURE_CELLS: &[(u8, u8, u8, u8, &str)] = &[
    // hat
    (3, 0, 5, 1, "#E52521"),
    (2, 1, 9, 1, "#E52521"),
    // face
    (2, 2, 7, 1, "#FBD000"),
    (2, 3, 1, 1, "#FBD000"),
    (4, 3, 1, 1, "#FBD000"),
    (6, 3, 3, 1, "#FBD000"),
    (1, 4, 1, 1, "#FBD000"),
    (3, 4, 1, 1, "#FBD000"),
    (5, 4, 3, 1, "#FBD000"),
    // hair and mustache
    (2, 3, 1, 1, "#443300"),
    (3, 3, 1, 2, "#443300"),
    (2, 4, 1, 1, "#443300"),
    (4, 4, 1, 1, "#443300"),
    (9, 3, 1, 1, "#443300"),
    // shirt
    (2, 5, 6, 1, "#E52521"),
    (1, 6, 3, 1, "#E52521"),
    (5, 6, 4, 1, "#E52521"),
    // overalls
    (4, 6, 1, 1, "#0000AA"),
    (1, 7, 8, 1, "#0000AA"),
    (0, 8, 10, 2, "#0000AA"),
    // buttons
    (2, 7, 1, 1, "#FBD000"),
    (7, 7, 1, 1, "#FBD000"),
    // shoes
    (0, 10, 3, 2, "#443300"),
    (7, 10, 3, 2, "#443300"),
];

fn figure_svg(hop: f64) -> String {
    let mut s = String::with_capacity(2048);
    s.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100" overflow="visible">"#);
    let _ = write!(
        s,
        r#"<g transform="translate(45 {y:.3}) scale(3)">"#,
        y = 64.0 - hop
    );
    for &(x, y, w, h, fill) in FIGURE_CELLS {
        let _ = write!(
            s,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#
        );
    }
    s.push_str("</g>");
    // The block bumps up while the figure is at the top of its hop.
    let _ = write!(
        s,
        r#"<g transform="translate(85 {y:.3}) scale(2)">"#,
        y = 24.0 - hop / 3.0
    );
    s.push_str(r##"<rect x="0" y="0" width="16" height="16" fill="#FBD000" stroke="black" stroke-width="1"/>"##);
    s.push_str(r##"<path d="M4,4 h8 v2 h-2 v2 h-2 v2 h2 v2 h-2 v-2 h2 v-2 h2 v-4 h-8 z" fill="#d97b00"/>"##);
    s.push_str(r##"<rect x="7" y="12" width="2" height="2" fill="#d97b00"/>"##);
    s.push_str(r#"<rect x="1" y="1" width="1" height="1" fill="white" opacity="0.5"/>"#);
    s.push_str("</g></svg>");
    s
}

#[cfg(test)]
#[path = "../../tests/unit/card/sprites.rs"]
mod tests;

use super::*;
use crate::card::tree;
use crate::config::model::{AspectRatio, CardConfig, Theme};
use crate::export::state::RecordingStatus;
use crate::foundation::core::Viewport;
use crate::studio::stage;

fn rasterizer() -> CardRasterizer {
    // No fonts: text layers are skipped, which keeps pixels deterministic across machines.
    CardRasterizer::new(FontLibrary::empty())
}

fn small_card(theme: Theme) -> CardTree {
    let cfg = CardConfig::default()
        .with_theme(theme)
        .with_aspect_ratio(AspectRatio::Square1x1);
    tree::render(&cfg, Viewport::new(400.0, 400.0).unwrap())
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    frame.pixel(x, y).unwrap()
}

#[test]
fn card_frame_matches_scaled_container() {
    let card = small_card(Theme::Pacman);
    let frame = rasterizer().render_card(&card, 0, 0.5).unwrap();
    assert_eq!(f64::from(frame.width), (card.container.size.width * 0.5).round());
    assert_eq!(f64::from(frame.height), (card.container.size.height * 0.5).round());
    assert!(frame.premultiplied);
}

#[test]
fn corners_are_transparent_and_body_is_theme_colored() {
    let card = small_card(Theme::Snake);
    let frame = rasterizer().render_card(&card, 0, 1.0).unwrap();
    let (w, h) = (frame.width, frame.height);
    for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        assert_eq!(px(&frame, x, y)[3], 0, "corner ({x},{y})");
    }
    let c = Theme::Snake.color();
    assert_eq!(px(&frame, w / 2, 20), [c.r, c.g, c.b, 255]);
}

#[test]
fn decoration_draws_inside_its_frame() {
    let card = small_card(Theme::Mario);
    let frame = rasterizer().render_card(&card, 0, 1.0).unwrap();
    let bg = Theme::Mario.color();
    let f = card.decoration.frame;
    let mut differs = 0;
    for y in (f.y0 as u32)..(f.y1 as u32).min(frame.height) {
        for x in (f.x0 as u32)..(f.x1 as u32).min(frame.width) {
            let p = px(&frame, x, y);
            if p[..3] != [bg.r, bg.g, bg.b] {
                differs += 1;
            }
        }
    }
    assert!(differs > 0);
}

#[test]
fn rendering_is_deterministic() {
    let card = small_card(Theme::Pacman);
    let mut r = rasterizer();
    let a = r.render_card(&card, 120, 1.0).unwrap();
    let b = r.render_card(&card, 120, 1.0).unwrap();
    let c = rasterizer().render_card(&card, 120, 1.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn animation_time_changes_sprite() {
    let card = small_card(Theme::Pacman);
    let mut r = rasterizer();
    let closed = r.render_card(&card, 0, 1.0).unwrap();
    let open = r.render_card(&card, 200, 1.0).unwrap();
    assert_ne!(closed.data, open.data);
}

#[test]
fn rejects_bad_scale() {
    let card = small_card(Theme::Pacman);
    assert!(rasterizer().render_card(&card, 0, 0.0).is_err());
    assert!(rasterizer().render_card(&card, 0, f64::NAN).is_err());
}

#[test]
fn editing_stage_paints_panel_and_preview() {
    let st = stage::render_stage(&CardConfig::default(), RecordingStatus::Idle, Viewport::default());
    let frame = rasterizer().render_stage(&st, 0, 960, 540).unwrap();
    assert_eq!((frame.width, frame.height), (960, 540));

    let panel = px(&frame, 5, 250);
    assert!(panel[0] >= 249 && panel[3] == 255, "{panel:?}");
    let preview = px(&frame, 200, 535);
    assert_eq!(preview, [0xe5, 0xe7, 0xeb, 255]);
}

#[test]
fn recording_stage_is_black_around_card() {
    let st = stage::render_stage(
        &CardConfig::default(),
        RecordingStatus::Recording,
        Viewport::default(),
    );
    let frame = rasterizer().render_stage(&st, 0, 960, 540).unwrap();
    assert_eq!(px(&frame, 2, 270), [0, 0, 0, 255]);

    let r = st.card_rect();
    let cx = (r.center().x * 0.5) as u32;
    let c = Theme::Pacman.color();
    let got = px(&frame, cx, 30);
    for (g, want) in got.iter().zip([c.r, c.g, c.b, 255]) {
        assert!((i32::from(*g) - i32::from(want)).abs() <= 2, "{got:?}");
    }
}

#[test]
fn stage_letterboxes_mismatched_output() {
    let st = stage::render_stage(
        &CardConfig::default(),
        RecordingStatus::Recording,
        Viewport::new(100.0, 100.0).unwrap(),
    );
    let frame = rasterizer().render_stage(&st, 0, 200, 100).unwrap();
    assert_eq!(px(&frame, 5, 50), [0, 0, 0, 255]);
}

#[test]
fn rounded_mask_clears_corners_only() {
    let mut data = vec![255u8; 10 * 10 * 4];
    mask_rounded_corners(&mut data, 10, 10, 4.0);
    let alpha = |x: usize, y: usize| data[(y * 10 + x) * 4 + 3];
    assert_eq!(alpha(0, 0), 0);
    assert_eq!(alpha(9, 9), 0);
    assert_eq!(alpha(5, 5), 255);
    assert_eq!(alpha(0, 5), 255);
    assert_eq!(alpha(5, 0), 255);
}

#[test]
fn sprite_svg_rasterizes() {
    let svg = sprites::sprite_svg(DecorationKind::Figure, 0);
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
    let data = rasterize_svg_to_premul_rgba8(&tree, 50, 50).unwrap();
    assert_eq!(data.len(), 50 * 50 * 4);
    assert!(data.chunks_exact(4).any(|p| p[3] == 255));
}

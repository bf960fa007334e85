use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn table_is_total_and_in_range() {
    for theme in Theme::ALL {
        for ratio in AspectRatio::ALL {
            let s = decoration_sizing(theme, ratio);
            assert!(s.fraction > 0.0 && s.fraction <= 1.0, "{theme:?} {ratio:?}");
        }
    }
}

#[test]
fn pacman_gets_narrower_on_wide_cards() {
    let f = |r| decoration_sizing(Theme::Pacman, r).fraction;
    assert!(close(f(AspectRatio::Story9x16), 0.80));
    assert!(close(f(AspectRatio::Portrait4x5), 0.60));
    assert!(close(f(AspectRatio::Square1x1), 0.50));
    assert!(close(f(AspectRatio::Wide16x9), 0.30));
}

#[test]
fn snake_strip_gets_taller_on_wide_cards() {
    let s = decoration_sizing(Theme::Snake, AspectRatio::Story9x16);
    assert_eq!(s.kind, DecorationKind::Strip);
    assert_eq!(s.axis, SizingAxis::Height);
    assert!(close(s.fraction, 0.15));
    assert!(close(
        decoration_sizing(Theme::Snake, AspectRatio::Wide16x9).fraction,
        0.30
    ));
}

#[test]
fn mario_table_is_distinct_from_pacman() {
    let m = decoration_sizing(Theme::Mario, AspectRatio::Story9x16);
    assert_eq!(m.kind, DecorationKind::Figure);
    assert!(close(m.fraction, 0.90));
    assert!(close(
        decoration_sizing(Theme::Mario, AspectRatio::Square1x1).fraction,
        0.55
    ));
}

#[test]
fn unknown_ratio_labels_use_theme_fallbacks() {
    assert!(close(sizing_for_ratio_label(Theme::Pacman, "3/2").fraction, 0.80));
    assert!(close(sizing_for_ratio_label(Theme::Snake, "3/2").fraction, 0.20));
    assert!(close(sizing_for_ratio_label(Theme::Mario, "3/2").fraction, 0.60));
    assert!(close(sizing_for_ratio_label(Theme::Mario, "4:5").fraction, 0.70));
}

#[test]
fn tall_container_is_height_driven() {
    let (size, driving) = container_size(AspectRatio::Story9x16, Viewport::default());
    assert_eq!(driving, DrivingDimension::Height);
    // min(0.85 * 1080, 800) = 800
    assert!(close(size.height, 800.0));
    assert!(close(size.width, 450.0));
}

#[test]
fn wide_container_is_width_driven() {
    let (size, driving) = container_size(AspectRatio::Wide16x9, Viewport::default());
    assert_eq!(driving, DrivingDimension::Width);
    // min(0.85 * 1920, 1200) = 1200 -> 675 tall, under the 972 cap.
    assert!(close(size.width, 1200.0));
    assert!(close(size.height, 675.0));
}

#[test]
fn caps_scale_down_keeping_ratio() {
    let vp = Viewport {
        width: 400.0,
        height: 1000.0,
    };
    let (size, _) = container_size(AspectRatio::Square1x1, vp);
    assert!(size.width <= 360.0 + 1e-9);
    assert!(size.height <= 900.0 + 1e-9);
    assert!(close(size.width, size.height));
}

#[test]
fn pacman_frame_overflows_bottom_center() {
    let container = Size::new(450.0, 800.0);
    let s = decoration_sizing(Theme::Pacman, AspectRatio::Story9x16);
    let r = decoration_frame(s, container);
    assert!(close(r.width(), 360.0));
    assert!(close(r.height(), 360.0));
    assert!(close(r.center().x, 225.0));
    assert!(close(r.y1, 880.0));
}

#[test]
fn figure_and_strip_anchor_to_edges() {
    let container = Size::new(800.0, 800.0);
    let fig = decoration_frame(decoration_sizing(Theme::Mario, AspectRatio::Square1x1), container);
    assert!(close(fig.x1, 800.0));
    assert!(close(fig.y1, 800.0));
    assert!(close(fig.width(), 440.0));

    let strip = decoration_frame(decoration_sizing(Theme::Snake, AspectRatio::Square1x1), container);
    assert!(close(strip.x0, 0.0));
    assert!(close(strip.width(), 800.0));
    assert!(close(strip.height(), 176.0));
    assert!(close(strip.y1, 800.0));
}

#[test]
fn text_box_reserves_bottom_inset() {
    let b = text_box(Size::new(450.0, 800.0));
    assert_eq!(b, Rect::new(32.0, 32.0, 418.0, 672.0));
}

#[test]
fn each_theme_has_its_own_decoration_kind() {
    let kinds: std::collections::HashSet<DecorationKind> = Theme::ALL
        .into_iter()
        .map(|t| decoration_sizing(t, AspectRatio::Square1x1).kind)
        .collect();
    assert_eq!(kinds.len(), 3);
}

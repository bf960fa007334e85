use super::*;

#[test]
fn default_story_card_matches_reference_scenario() {
    let config = CardConfig {
        text: "Not a\nbootcamp.".to_string(),
        text_size: 24,
        horizontal_align: HorizontalAlign::Center,
        vertical_align: VerticalAlign::Center,
        theme: Theme::Pacman,
        aspect_ratio: AspectRatio::Story9x16,
        ..CardConfig::default()
    };
    let tree = render(&config, Viewport::default());

    assert!(tree.container.size.height > tree.container.size.width);
    assert_eq!(tree.container.driving, DrivingDimension::Height);
    assert_eq!(tree.text.lines, vec!["Not a", "bootcamp."]);
    assert_eq!(tree.text.align, HorizontalAlign::Center);
    assert_eq!(tree.text.anchor, VerticalAnchor::Center);
    assert_eq!(tree.decoration.kind(), DecorationKind::Jaw);
    assert!((tree.decoration.sizing.fraction - 0.80).abs() < 1e-12);
    assert!((tree.decoration.frame.width() - 0.80 * tree.container.size.width).abs() < 1e-9);
}

#[test]
fn render_is_deterministic() {
    let config = CardConfig::default().with_theme(Theme::Snake);
    let a = render(&config, Viewport::default());
    let b = render(&config, Viewport::default());
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn theme_switch_changes_only_the_decoration() {
    let snake = CardConfig::default().with_theme(Theme::Snake);
    let mario = snake.with_theme(Theme::Mario);

    let a = render(&snake, Viewport::default());
    let b = render(&mario, Viewport::default());

    assert_eq!(a.text, b.text);
    assert_eq!(a.container.size, b.container.size);
    assert_ne!(a.decoration, b.decoration);
    assert_eq!(b.decoration.kind(), DecorationKind::Figure);
}

#[test]
fn vertical_align_maps_to_anchor() {
    for (v, anchor) in [
        (VerticalAlign::Start, VerticalAnchor::Top),
        (VerticalAlign::Center, VerticalAnchor::Center),
        (VerticalAlign::End, VerticalAnchor::Bottom),
    ] {
        let tree = render(&CardConfig::default().with_vertical_align(v), Viewport::default());
        assert_eq!(tree.text.anchor, anchor);
    }
}

#[test]
fn padding_does_not_affect_output() {
    let a = render(&CardConfig::default().with_padding(0), Viewport::default());
    let b = render(&CardConfig::default().with_padding(99), Viewport::default());
    assert_eq!(a, b);
}

#[test]
fn text_size_and_font_flow_into_text_layer() {
    let config = CardConfig::default()
        .with_text_size(64)
        .with_font(FontFamily::Oswald);
    let tree = render(&config, Viewport::default());
    assert_eq!(tree.text.size_px, 64.0);
    assert_eq!(tree.text.line_height_px, 104.0);
    assert_eq!(tree.text.family_name, "Oswald");
    assert_eq!(tree.container.background, Theme::Pacman.color());
}

use super::*;

#[test]
fn describes_controls_in_sidebar_order() {
    let view = ControlPanel::describe(&CardConfig::default(), RecordingStatus::Idle);
    let fields: Vec<_> = view.controls.iter().map(Control::field).collect();
    assert_eq!(
        fields,
        [
            "theme",
            "aspectRatio",
            "text",
            "font",
            "textSize",
            "verticalAlign",
            "horizontalAlign"
        ]
    );
}

#[test]
fn theme_picker_has_swatches() {
    let view = ControlPanel::describe(&CardConfig::default(), RecordingStatus::Idle);
    let Some(Control::Picker {
        options, selected, ..
    }) = view.control("theme")
    else {
        panic!("theme picker missing");
    };
    assert_eq!(selected, "pacman");
    let swatches: Vec<_> = options.iter().map(|o| o.swatch.as_deref()).collect();
    assert_eq!(
        swatches,
        [Some("#5ac4f3"), Some("#a569bd"), Some("#74c365")]
    );
    assert_eq!(options[0].label, "Pac-Man");
}

#[test]
fn slider_shows_pixels_and_bounds() {
    let cfg = CardConfig::default().with_text_size(64);
    let view = ControlPanel::describe(&cfg, RecordingStatus::Idle);
    assert_eq!(
        view.control("textSize"),
        Some(&Control::Slider {
            field: "textSize",
            label: "Size",
            min: 12,
            max: 128,
            value: 64,
            display: "64px".to_string(),
        })
    );
}

#[test]
fn export_button_tracks_status() {
    let cfg = CardConfig::default();
    let idle = ControlPanel::describe(&cfg, RecordingStatus::Idle);
    assert_eq!(idle.export.label, "Export HD Video");
    assert!(!idle.export.disabled);

    for status in [
        RecordingStatus::Selecting,
        RecordingStatus::Recording,
        RecordingStatus::Processing,
    ] {
        let busy = ControlPanel::describe(&cfg, status);
        assert_eq!(busy.export.label, "Recording...");
        assert!(busy.export.disabled);
    }
}

#[test]
fn apply_returns_new_config_and_leaves_input_alone() {
    let before = CardConfig::default();
    let after = ControlPanel::apply(&before, Edit::Theme(Theme::Mario));
    assert_eq!(after.theme, Theme::Mario);
    assert_eq!(before.theme, Theme::Pacman);
    assert_eq!(after.text, before.text);

    let clamped = ControlPanel::apply(&before, Edit::TextSize(4));
    assert_eq!(clamped.text_size, 12);
}

#[test]
fn view_serializes_with_kind_tags() {
    let view = ControlPanel::describe(&CardConfig::default(), RecordingStatus::Idle);
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["controls"][2]["kind"], "text_area");
    assert_eq!(json["controls"][4]["display"], "24px");
    assert!(json["controls"][1]["options"][0].get("swatch").is_none());
}

use super::*;

#[test]
fn defaults_are_valid() {
    let s = StudioSettings::default();
    s.validate().unwrap();
    assert_eq!(s.capture.width, 1920);
    assert_eq!(s.capture.height, 1080);
    assert_eq!(s.capture.fps, 60);
}

#[test]
fn capture_validation_catches_bad_values() {
    for bad in [
        CaptureSettings {
            width: 0,
            height: 10,
            fps: 30,
        },
        CaptureSettings {
            width: 11,
            height: 10,
            fps: 30,
        },
        CaptureSettings {
            width: 10,
            height: 10,
            fps: 0,
        },
        CaptureSettings {
            width: 70_000,
            height: 10,
            fps: 30,
        },
    ] {
        assert!(bad.validate().is_err(), "{bad:?}");
    }
}

#[test]
fn partial_json_fills_defaults() {
    let s: StudioSettings =
        serde_json::from_str(r#"{ "capture": { "fps": 24 }, "downloads_dir": "out" }"#).unwrap();
    assert_eq!(s.capture.fps, 24);
    assert_eq!(s.capture.width, 1920);
    assert_eq!(s.downloads_dir, PathBuf::from("out"));
    assert_eq!(s.viewport, Viewport::default());
}

#[test]
fn load_reads_file_and_validates() {
    let dir = PathBuf::from("target").join("settings_unit");
    std::fs::create_dir_all(&dir).unwrap();

    let ok = dir.join("ok.json");
    std::fs::write(&ok, r#"{ "viewport": { "width": 800, "height": 600 } }"#).unwrap();
    let s = StudioSettings::load(&ok).unwrap();
    assert_eq!(s.viewport.width, 800.0);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "capture": { "width": 7 } }"#).unwrap();
    assert!(StudioSettings::load(&bad).is_err());

    assert!(StudioSettings::load(&dir.join("missing.json")).is_err());
}

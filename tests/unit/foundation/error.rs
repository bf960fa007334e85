use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CardError::render("x").to_string().contains("render error:"));
    assert!(CardError::encode("x").to_string().contains("encode error:"));
    assert!(
        CardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn capture_errors_convert_with_prefix() {
    let err: CardError = crate::export::capture::CaptureError::Denied("user cancelled".into()).into();
    let msg = err.to_string();
    assert!(msg.starts_with("capture error:"), "{msg}");
    assert!(msg.contains("user cancelled"), "{msg}");
}

#[test]
fn json_errors_map_to_serde_variant() {
    let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(CardError::from(bad), CardError::Serde(_)));
}

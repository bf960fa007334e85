use super::*;

#[test]
fn flatten_premul_over_black() {
    // Premultiplied red at 50%.
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, Rgba8::BLACK).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_white() {
    let src = vec![0u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, Rgba8::WHITE).unwrap();
    assert_eq!(dst, vec![127, 127, 127, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], true, Rgba8::BLACK).is_err());
}

#[test]
fn straight_conversion_undoes_premultiply() {
    let frame = FrameRGBA::filled(2, 1, Rgba8::rgba(200, 100, 0, 128));
    let straight = frame.to_straight_rgba8();
    for px in straight.chunks_exact(4) {
        assert!((i32::from(px[0]) - 200).abs() <= 2, "{px:?}");
        assert!((i32::from(px[1]) - 100).abs() <= 2, "{px:?}");
        assert_eq!(px[3], 128);
    }
}

#[test]
fn pixel_bounds() {
    let frame = FrameRGBA::filled(3, 2, Rgba8::WHITE);
    assert_eq!(frame.pixel(2, 1), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(3, 0), None);
    assert_eq!(frame.data.len(), 3 * 2 * 4);
}

#[test]
fn png_is_written() {
    let path = std::path::PathBuf::from("target")
        .join("frame_unit")
        .join("solid.png");
    FrameRGBA::filled(4, 4, Rgba8::hex(0x5ac4f3))
        .write_png(&path)
        .unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 4));
    assert_eq!(img.get_pixel(1, 1).0, [0x5a, 0xc4, 0xf3, 255]);
}

use super::*;

fn any_system_font() -> Option<ResolvedFont> {
    let mut lib = FontLibrary::new(None);
    let font = lib.resolve("Press Start 2P");
    if font.is_none() {
        eprintln!("skipping: no system fonts available");
    }
    font
}

fn style(align: HorizontalAlign) -> BlockStyle {
    BlockStyle {
        size_px: 24.0,
        line_height_px: 39.0,
        max_width_px: 300.0,
        align,
    }
}

#[test]
fn empty_library_resolves_nothing() {
    let mut lib = FontLibrary::empty();
    assert_eq!(lib.face_count(), 0);
    assert!(lib.resolve("VT323").is_none());
    // Cached miss stays a miss.
    assert!(lib.resolve("VT323").is_none());
}

#[test]
fn missing_directory_is_not_fatal() {
    let mut lib = FontLibrary::empty();
    lib.load_dir(Path::new("target/definitely/not/here"));
    assert_eq!(lib.face_count(), 0);
}

#[test]
fn hard_lines_stack_at_fixed_line_height() {
    let Some(font) = any_system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let lines = vec!["Not a".to_string(), "bootcamp.".to_string()];
    let block = engine
        .layout_block(&lines, &font, &style(HorizontalAlign::Left))
        .unwrap();
    assert_eq!(block.lines.len(), 2);
    assert_eq!(block.height, 78.0);
    let y0 = block.lines[0].glyphs[0].y;
    let y1 = block.lines[1].glyphs[0].y;
    assert!((y1 - y0 - 39.0).abs() < 0.01, "{y0} {y1}");
}

#[test]
fn blank_lines_keep_their_slot() {
    let Some(font) = any_system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let lines = vec!["a".to_string(), String::new(), "b".to_string()];
    let block = engine
        .layout_block(&lines, &font, &style(HorizontalAlign::Center))
        .unwrap();
    assert_eq!(block.lines.len(), 3);
    assert!(block.lines[1].glyphs.is_empty());
}

#[test]
fn alignment_moves_glyphs_right() {
    let Some(font) = any_system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let lines = vec!["hi".to_string()];
    let left = engine
        .layout_block(&lines, &font, &style(HorizontalAlign::Left))
        .unwrap();
    let right = engine
        .layout_block(&lines, &font, &style(HorizontalAlign::Right))
        .unwrap();
    assert!(right.lines[0].glyphs[0].x > left.lines[0].glyphs[0].x);
}

#[test]
fn rejects_bad_size() {
    let Some(font) = any_system_font() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let mut s = style(HorizontalAlign::Left);
    s.size_px = 0.0;
    assert!(engine.layout_block(&["x".to_string()], &font, &s).is_err());
}

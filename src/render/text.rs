//! Font resolution and text shaping.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::model::HorizontalAlign;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{CardError, CardResult};

/// Font bytes resolved for one family, shared between the shaper and the glyph renderer.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Family name of the face actually picked (may differ from the request after fallback).
    pub family: String,
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
}

/// Font database for card text.
///
/// Holds system fonts plus any user directory. Lookups go by family name, then monospace,
/// then sans-serif.
pub struct FontLibrary {
    db: usvg::fontdb::Database,
    resolved: HashMap<String, Option<ResolvedFont>>,
}

impl FontLibrary {
    /// System fonts plus `fonts_dir` when given.
    pub fn new(fonts_dir: Option<&Path>) -> Self {
        let mut lib = Self::empty();
        lib.db.load_system_fonts();
        if let Some(dir) = fonts_dir {
            lib.load_dir(dir);
        }
        tracing::debug!(faces = lib.face_count(), "font library ready");
        lib
    }

    /// No fonts at all. Every lookup misses until fonts are added.
    pub fn empty() -> Self {
        Self {
            db: usvg::fontdb::Database::new(),
            resolved: HashMap::new(),
        }
    }

    /// Load `.ttf`/`.otf`/`.ttc` files directly inside `dir`. Unreadable entries are skipped.
    pub fn load_dir(&mut self, dir: &Path) {
        let Ok(rd) = std::fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "font directory not readable");
            return;
        };

        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            if let Err(err) = self.db.load_font_file(&path) {
                tracing::debug!(path = %path.display(), error = %err, "font file skipped");
            }
        }
        self.resolved.clear();
    }

    /// Add an in-memory font.
    pub fn load_font_data(&mut self, bytes: Vec<u8>) {
        self.db.load_font_data(bytes);
        self.resolved.clear();
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Font for `family`, falling back to monospace and then sans-serif. `None` when the
    /// database has nothing usable.
    pub fn resolve(&mut self, family: &str) -> Option<ResolvedFont> {
        if let Some(hit) = self.resolved.get(family) {
            return hit.clone();
        }
        let found = self.query(family);
        match &found {
            Some(f) if f.family != family => {
                tracing::debug!(requested = family, picked = %f.family, "font fallback");
            }
            Some(_) => {}
            None => tracing::debug!(requested = family, "no font available"),
        }
        self.resolved.insert(family.to_string(), found.clone());
        found
    }

    fn query(&self, family: &str) -> Option<ResolvedFont> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let families = [Family::Name(family), Family::Monospace, Family::SansSerif];
        let id = self.db.query(&Query {
            families: &families,
            weight: Weight(400),
            stretch: Stretch::Normal,
            style: Style::Normal,
        })?;

        let face = self.db.face(id)?;
        let picked = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| family.to_string());
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;

        Some(ResolvedFont {
            family: picked,
            bytes: Arc::new(bytes),
            index,
        })
    }
}

/// One shaped line of glyphs, positioned relative to the text box.
#[derive(Clone, Debug, Default)]
pub struct ShapedLine {
    pub glyphs: Vec<vello_cpu::Glyph>,
    pub font_size: f32,
}

/// Parameters for [`TextLayoutEngine::layout_block`].
#[derive(Clone, Debug)]
pub struct BlockStyle {
    pub size_px: f32,
    pub line_height_px: f32,
    pub max_width_px: f32,
    pub align: HorizontalAlign,
}

/// Shaped text block. Every line occupies exactly `line_height_px`.
#[derive(Clone, Debug, Default)]
pub struct ShapedBlock {
    pub lines: Vec<ShapedLine>,
    pub height: f32,
}

/// Parley contexts reused across frames.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: HashMap<usize, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &ResolvedFont) -> CardResult<String> {
        let key = Arc::as_ptr(&font.bytes) as usize;
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::render("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::render("registered font family has no name"))?
            .to_string();

        self.families.insert(key, name.clone());
        Ok(name)
    }

    /// Shape hard `lines`, wrapping each to `max_width_px` and stacking every visual line at a
    /// fixed line height. Glyph positions are relative to the top-left of the block.
    pub fn layout_block(
        &mut self,
        lines: &[String],
        font: &ResolvedFont,
        style: &BlockStyle,
    ) -> CardResult<ShapedBlock> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(CardError::validation("text size_px must be finite and > 0"));
        }
        let family = self.family_for(font)?;
        let alignment = match style.align {
            HorizontalAlign::Left => parley::Alignment::Start,
            HorizontalAlign::Center => parley::Alignment::Center,
            HorizontalAlign::Right => parley::Alignment::End,
            HorizontalAlign::Justify => parley::Alignment::Justify,
        };
        let max_w = style.max_width_px.max(1.0);

        let mut out = ShapedBlock::default();
        for text in lines {
            if text.is_empty() {
                out.lines.push(ShapedLine {
                    glyphs: Vec::new(),
                    font_size: style.size_px,
                });
                continue;
            }

            let mut builder = self
                .layout_ctx
                .ranged_builder(&mut self.font_ctx, text, 1.0, true);
            builder.push_default(parley::style::StyleProperty::FontStack(
                parley::style::FontStack::Source(std::borrow::Cow::Owned(family.clone())),
            ));
            builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
            builder.push_default(parley::style::StyleProperty::Brush(Rgba8::WHITE));

            let mut layout: parley::Layout<Rgba8> = builder.build(text);
            layout.break_all_lines(Some(max_w));
            layout.align(Some(max_w), alignment, parley::AlignmentOptions::default());

            for line in layout.lines() {
                let m = line.metrics();
                let top = out.lines.len() as f32 * style.line_height_px;
                let baseline =
                    top + (style.line_height_px - (m.ascent + m.descent)) / 2.0 + m.ascent;
                let shift = baseline - m.baseline;

                let mut shaped = ShapedLine {
                    glyphs: Vec::new(),
                    font_size: style.size_px,
                };
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    shaped.font_size = run.run().font_size();
                    shaped
                        .glyphs
                        .extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y + shift,
                        }));
                }
                out.lines.push(shaped);
            }
        }

        out.height = out.lines.len() as f32 * style.line_height_px;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;

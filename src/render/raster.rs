//! CPU rasterizer for cards and stages.

use std::collections::HashMap;
use std::sync::Arc;

use crate::card::layout::DecorationKind;
use crate::card::sprites;
use crate::card::tree::{CardTree, DecorationLayer, TextLayer, VerticalAnchor};
use crate::foundation::core::{Affine, Millis, Rect, Rgba8, Vec2};
use crate::foundation::error::{CardError, CardResult};
use crate::render::frame::FrameRGBA;
use crate::render::text::{BlockStyle, FontLibrary, ResolvedFont, ShapedBlock, TextLayoutEngine};
use crate::studio::stage::{PANEL_BACKGROUND, StageTree};

/// Preview label size in CSS px.
pub const LABEL_SIZE_PX: f64 = 14.0;
/// Preview label color.
pub const LABEL_COLOR: Rgba8 = Rgba8::hex(0x6b7280);
/// Label inset from the preview area's top-left corner.
pub const LABEL_INSET: f64 = 16.0;
/// Family asked for when drawing stage chrome.
pub const CHROME_FAMILY: &str = "Inter";
/// Largest raster edge accepted.
pub const MAX_DIM: u32 = u16::MAX as u32;

const SPRITE_CACHE_CAP: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SpriteKey {
    kind: DecorationKind,
    anim_ms: Millis,
    width: u32,
    height: u32,
}

/// Turns card and stage trees into premultiplied RGBA8 frames.
pub struct CardRasterizer {
    fonts: FontLibrary,
    text: TextLayoutEngine,
    font_data: HashMap<usize, vello_cpu::peniko::FontData>,
    sprites: HashMap<SpriteKey, vello_cpu::Image>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CardRasterizer {
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts,
            text: TextLayoutEngine::new(),
            font_data: HashMap::new(),
            sprites: HashMap::new(),
            ctx: None,
        }
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CardResult<R>,
    ) -> CardResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }

    /// Render one card at `scale` device pixels per CSS px. The frame is exactly the scaled
    /// container with rounded corners masked out.
    #[tracing::instrument(level = "trace", skip(self, card))]
    pub fn render_card(&mut self, card: &CardTree, anim_ms: Millis, scale: f64) -> CardResult<FrameRGBA> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CardError::validation("card scale must be finite and > 0"));
        }
        let size = card.container.size;
        let w = px_dim(size.width * scale)?;
        let h = px_dim(size.height * scale)?;

        let base = Affine::scale(scale);

        let pixmap = self.with_ctx_mut(w, h, |this, ctx| {
            fill_rect(
                ctx,
                base,
                Rect::new(0.0, 0.0, size.width, size.height),
                card.container.background,
            );
            this.draw_text(ctx, base, &card.text)?;
            this.draw_decoration(ctx, base, &card.decoration, anim_ms)?;
            draw_border(ctx, base, card);

            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;

        let mut data = pixmap.data_as_u8_slice().to_vec();
        mask_rounded_corners(
            &mut data,
            u32::from(w),
            u32::from(h),
            card.container.corner_radius * scale,
        );

        Ok(FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data,
            premultiplied: true,
        })
    }

    /// Render the whole stage into `out_w × out_h`, fitting the viewport with its aspect
    /// preserved. Letterbox bars are black.
    #[tracing::instrument(level = "trace", skip(self, stage))]
    pub fn render_stage(
        &mut self,
        stage: &StageTree,
        anim_ms: Millis,
        out_w: u32,
        out_h: u32,
    ) -> CardResult<FrameRGBA> {
        let w = px_dim(f64::from(out_w))?;
        let h = px_dim(f64::from(out_h))?;
        let vp = stage.viewport;
        let fit = (f64::from(out_w) / vp.width).min(f64::from(out_h) / vp.height);
        let offset = Vec2::new(
            (f64::from(out_w) - vp.width * fit) / 2.0,
            (f64::from(out_h) - vp.height * fit) / 2.0,
        );
        let base = Affine::translate(offset) * Affine::scale(fit);
        let card = self.render_card(&stage.card, anim_ms, stage.card_scale * fit)?;
        let origin = base * stage.card_origin;

        let pixmap = self.with_ctx_mut(w, h, |this, ctx| {
            fill_rect(
                ctx,
                Affine::IDENTITY,
                Rect::new(0.0, 0.0, f64::from(out_w), f64::from(out_h)),
                Rgba8::BLACK,
            );
            fill_rect(
                ctx,
                base,
                Rect::new(0.0, 0.0, vp.width, vp.height),
                stage.background,
            );
            fill_rect(ctx, base, stage.preview, stage.preview_background);
            if let Some(panel) = stage.panel {
                fill_rect(ctx, base, panel, PANEL_BACKGROUND);
            }
            if let Some(label) = &stage.preview_label {
                this.draw_label(ctx, base, stage.preview, label)?;
            }
            draw_premul_image(
                ctx,
                Affine::translate((origin.x.round(), origin.y.round())),
                &card.data,
                card.width,
                card.height,
            )?;

            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;

        Ok(FrameRGBA {
            width: out_w,
            height: out_h,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn font_data_for(&mut self, font: &ResolvedFont) -> vello_cpu::peniko::FontData {
        let key = Arc::as_ptr(&font.bytes) as usize;
        self.font_data
            .entry(key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
                    font.index,
                )
            })
            .clone()
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: Affine,
        layer: &TextLayer,
    ) -> CardResult<()> {
        let Some(font) = self.fonts.resolve(&layer.family_name) else {
            tracing::warn!(family = %layer.family_name, "font not found; text layer skipped");
            return Ok(());
        };

        let block = self.text.layout_block(
            &layer.lines,
            &font,
            &BlockStyle {
                size_px: layer.size_px as f32,
                line_height_px: layer.line_height_px as f32,
                max_width_px: layer.bounds.width() as f32,
                align: layer.align,
            },
        )?;

        let height = f64::from(block.height);
        let top = match layer.anchor {
            VerticalAnchor::Top => layer.bounds.y0,
            VerticalAnchor::Center => layer.bounds.center().y - height / 2.0,
            VerticalAnchor::Bottom => layer.bounds.y1 - height,
        };
        let origin = base * Affine::translate((layer.bounds.x0, top));
        let shadow = base * Affine::translate((layer.bounds.x0, top + layer.shadow_offset_y));
        let font_data = self.font_data_for(&font);

        draw_block(ctx, shadow, &font_data, &block, layer.shadow);
        draw_block(ctx, origin, &font_data, &block, layer.color);
        Ok(())
    }

    fn draw_decoration(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: Affine,
        layer: &DecorationLayer,
        anim_ms: Millis,
    ) -> CardResult<()> {
        let kind = layer.kind();
        let (vb_w, vb_h) = sprites::view_box(kind);
        let frame = base.transform_rect_bbox(layer.frame);

        // Meet-fit the view box into the frame, centered.
        let fit = (frame.width() / vb_w).min(frame.height() / vb_h);
        let w = (vb_w * fit).round().max(1.0) as u32;
        let h = (vb_h * fit).round().max(1.0) as u32;
        let x = frame.x0 + (frame.width() - f64::from(w)) / 2.0;
        let y = frame.y0 + (frame.height() - f64::from(h)) / 2.0;

        let paint = self.sprite_paint(kind, anim_ms, w, h)?;
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(Affine::translate((x.round(), y.round()))));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        Ok(())
    }

    fn sprite_paint(
        &mut self,
        kind: DecorationKind,
        anim_ms: Millis,
        width: u32,
        height: u32,
    ) -> CardResult<vello_cpu::Image> {
        let key = SpriteKey {
            kind,
            anim_ms,
            width,
            height,
        };
        if let Some(paint) = self.sprites.get(&key) {
            return Ok(paint.clone());
        }

        let svg = sprites::sprite_svg(kind, anim_ms);
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
            .map_err(|e| CardError::render(format!("parse sprite svg: {e}")))?;
        let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
        let pixmap = premul_bytes_to_pixmap(&rgba8_premul, width, height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        if self.sprites.len() >= SPRITE_CACHE_CAP {
            self.sprites.clear();
        }
        self.sprites.insert(key, paint.clone());
        Ok(paint)
    }

    fn draw_label(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        base: Affine,
        preview: Rect,
        label: &str,
    ) -> CardResult<()> {
        let Some(font) = self.fonts.resolve(CHROME_FAMILY) else {
            tracing::debug!("no font for preview label");
            return Ok(());
        };
        let block = self.text.layout_block(
            &[label.to_string()],
            &font,
            &BlockStyle {
                size_px: LABEL_SIZE_PX as f32,
                line_height_px: (LABEL_SIZE_PX * 1.5) as f32,
                max_width_px: (preview.width() - 2.0 * LABEL_INSET).max(1.0) as f32,
                align: crate::config::model::HorizontalAlign::Left,
            },
        )?;
        let font_data = self.font_data_for(&font);
        let origin = base * Affine::translate((preview.x0 + LABEL_INSET, preview.y0 + LABEL_INSET));
        draw_block(ctx, origin, &font_data, &block, LABEL_COLOR);
        Ok(())
    }
}

fn px_dim(v: f64) -> CardResult<u16> {
    if !v.is_finite() || v < 1.0 {
        return Err(CardError::validation(format!("raster size {v} is too small")));
    }
    let px = v.round();
    if px > f64::from(MAX_DIM) {
        return Err(CardError::validation(format!(
            "raster size {px} exceeds {MAX_DIM}"
        )));
    }
    Ok(px as u16)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn paint_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn fill_rect(ctx: &mut vello_cpu::RenderContext, transform: Affine, rect: Rect, color: Rgba8) {
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint_color(color));
    ctx.fill_rect(&rect_to_cpu(rect));
}

fn draw_block(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    font: &vello_cpu::peniko::FontData,
    block: &ShapedBlock,
    color: Rgba8,
) {
    if color.a == 0 {
        return;
    }
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint_color(color));
    for line in &block.lines {
        if line.glyphs.is_empty() {
            continue;
        }
        ctx.glyph_run(font)
            .font_size(line.font_size)
            .fill_glyphs(line.glyphs.iter().cloned());
    }
}

fn draw_border(ctx: &mut vello_cpu::RenderContext, base: Affine, card: &CardTree) {
    use vello_cpu::kurbo::Shape as _;

    let c = &card.container;
    if c.border_width <= 0.0 || c.border.a == 0 {
        return;
    }
    let half = c.border_width / 2.0;
    let rr = vello_cpu::kurbo::RoundedRect::new(
        half,
        half,
        c.size.width - half,
        c.size.height - half,
        (c.corner_radius - half).max(0.0),
    );
    ctx.set_transform(affine_to_cpu(base));
    ctx.set_paint(paint_color(c.border));
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(c.border_width));
    ctx.stroke_path(&rr.to_path(0.1));
}

fn draw_premul_image(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    data: &[u8],
    width: u32,
    height: u32,
) -> CardResult<()> {
    let pixmap = premul_bytes_to_pixmap(data, width, height)?;
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));
    Ok(())
}

/// Rasterize an SVG tree into premultiplied RGBA8 of exactly `width × height`.
pub fn rasterize_svg_to_premul_rgba8(tree: &usvg::Tree, width: u32, height: u32) -> CardResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.data().to_vec())
}

fn premul_bytes_to_pixmap(rgba8_premul: &[u8], width: u32, height: u32) -> CardResult<vello_cpu::Pixmap> {
    let w = px_dim(f64::from(width))?;
    let h = px_dim(f64::from(height))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::render("premultiplied byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Scale premultiplied pixels outside a rounded rectangle of `radius` px to transparent, with
/// one pixel of antialiasing along the arc.
pub fn mask_rounded_corners(data: &mut [u8], width: u32, height: u32, radius: f64) {
    let (w, h) = (f64::from(width), f64::from(height));
    let r = radius.min(w / 2.0).min(h / 2.0);
    if r <= 0.0 {
        return;
    }
    let span = r.ceil() as u32;

    let mut apply = |x: u32, y: u32, cx: f64, cy: f64| {
        let dx = f64::from(x) + 0.5 - cx;
        let dy = f64::from(y) + 0.5 - cy;
        let dist = (dx * dx + dy * dy).sqrt();
        let coverage = (r + 0.5 - dist).clamp(0.0, 1.0);
        if coverage >= 1.0 {
            return;
        }
        let i = (y as usize * width as usize + x as usize) * 4;
        if let Some(px) = data.get_mut(i..i + 4) {
            for c in px {
                *c = (f64::from(*c) * coverage).round() as u8;
            }
        }
    };

    for y in 0..span.min(height) {
        for x in 0..span.min(width) {
            let (rx, by) = (width - 1 - x, height - 1 - y);
            apply(x, y, r, r);
            apply(rx, y, w - r, r);
            apply(x, by, r, h - r);
            apply(rx, by, w - r, h - r);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;

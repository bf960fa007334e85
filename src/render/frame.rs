use std::path::Path;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{CardError, CardResult};

/// A rendered frame in RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Frame where every pixel is `rgba` (stored premultiplied).
    pub fn filled(width: u32, height: u32, rgba: Rgba8) -> Self {
        let px = rgba.premul_bytes();
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// Raw `[r, g, b, a]` at `(x, y)`, in the frame's own alpha convention.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Opaque copy composited over `bg`.
    pub fn flatten_over(&self, bg: Rgba8) -> CardResult<Vec<u8>> {
        let mut out = vec![0u8; self.data.len()];
        flatten_to_opaque_rgba8(&mut out, &self.data, self.premultiplied, bg)?;
        Ok(out)
    }

    /// Write a straight-alpha PNG, creating parent directories.
    pub fn write_png(&self, path: &Path) -> CardResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| CardError::render(format!("write png '{}': {e}", path.display())))
    }
}

/// Composite `src` over an opaque `bg` into `dst`. Both buffers are RGBA8 of equal length.
pub fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> CardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CardError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }

    let (bg_r, bg_g, bg_b) = (u16::from(bg.r), u16::from(bg.g), u16::from(bg.b));

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255 - a;
        let over = |c: u8, bgc: u16| -> u8 {
            let fg = if src_is_premul {
                u16::from(c)
            } else {
                mul_div255(u16::from(c), a)
            };
            (fg + mul_div255(bgc, inv)).min(255) as u8
        };

        d[0] = over(s[0], bg_r);
        d[1] = over(s[1], bg_g);
        d[2] = over(s[2], bg_b);
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;

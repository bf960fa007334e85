//! Card configuration value type.
//!
//! A [`CardConfig`] is replaced as a whole on every edit. Builders and [`CardConfig::apply`]
//! return new values; nothing here mutates a configuration the renderer may be observing.

use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{CardError, CardResult};

/// Smallest text size offered by the size slider.
pub const TEXT_SIZE_MIN: u32 = 12;
/// Largest text size offered by the size slider.
pub const TEXT_SIZE_MAX: u32 = 128;

/// Horizontal text-flow alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Flush left.
    Left,
    /// Centered lines.
    #[default]
    Center,
    /// Flush right.
    Right,
    /// Justified lines (last line flush start).
    Justify,
}

/// Vertical anchoring of the text block inside the card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Anchor to the top inset.
    Start,
    /// Center inside the insets.
    #[default]
    Center,
    /// Anchor to the bottom inset.
    End,
}

/// Card theme; selects both the background color and the decoration variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Rotating-jaw icon, bottom center.
    #[default]
    Pacman,
    /// Scrolling sprite strip along the bottom edge.
    Snake,
    /// Game figure with a question block, bottom right.
    Mario,
}

/// Display font choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// "Press Start 2P".
    #[default]
    Arcade,
    /// "Jersey 15".
    Jersey,
    /// "VT323".
    Vt323,
    /// "Oswald".
    Oswald,
}

/// Card aspect ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    /// 9:16 story format.
    #[default]
    Story9x16,
    /// 4:5 portrait post.
    Portrait4x5,
    /// 1:1 square.
    Square1x1,
    /// 16:9 landscape.
    Wide16x9,
}

impl HorizontalAlign {
    /// All variants in control order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Center, Self::Right, Self::Justify];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

impl VerticalAlign {
    /// All variants in control order.
    pub const ALL: [Self; 3] = [Self::Start, Self::Center, Self::End];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

impl Theme {
    /// All variants in control order.
    pub const ALL: [Self; 3] = [Self::Pacman, Self::Snake, Self::Mario];

    /// Stable identifier, also used in export file names.
    pub fn id(self) -> &'static str {
        match self {
            Self::Pacman => "pacman",
            Self::Snake => "snake",
            Self::Mario => "mario",
        }
    }

    /// Human label shown on the theme picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pacman => "Pac-Man",
            Self::Snake => "Snake",
            Self::Mario => "Mario",
        }
    }

    /// Card background color.
    pub fn color(self) -> Rgba8 {
        match self {
            Self::Pacman => Rgba8::hex(0x5ac4f3),
            Self::Snake => Rgba8::hex(0xa569bd),
            Self::Mario => Rgba8::hex(0x74c365),
        }
    }
}

impl FontFamily {
    /// All variants in control order.
    pub const ALL: [Self; 4] = [Self::Arcade, Self::Jersey, Self::Vt323, Self::Oswald];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Arcade => "arcade",
            Self::Jersey => "jersey",
            Self::Vt323 => "vt323",
            Self::Oswald => "oswald",
        }
    }

    /// Font family name used to resolve the font resource.
    pub fn family_name(self) -> &'static str {
        match self {
            Self::Arcade => "Press Start 2P",
            Self::Jersey => "Jersey 15",
            Self::Vt323 => "VT323",
            Self::Oswald => "Oswald",
        }
    }

    /// Human label shown on the font picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Arcade => "Arcade",
            Self::Jersey => "Jersey 15",
            Self::Vt323 => "VT323",
            Self::Oswald => "Oswald",
        }
    }
}

impl AspectRatio {
    /// All variants in control order.
    pub const ALL: [Self; 4] = [
        Self::Story9x16,
        Self::Portrait4x5,
        Self::Square1x1,
        Self::Wide16x9,
    ];

    /// Stable identifier (`"9/16"` style).
    pub fn id(self) -> &'static str {
        match self {
            Self::Story9x16 => "9/16",
            Self::Portrait4x5 => "4/5",
            Self::Square1x1 => "1/1",
            Self::Wide16x9 => "16/9",
        }
    }

    /// Human label shown on the format picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Story9x16 => "Story (9:16)",
            Self::Portrait4x5 => "Portrait (4:5)",
            Self::Square1x1 => "Square (1:1)",
            Self::Wide16x9 => "Wide (16:9)",
        }
    }

    /// `(width, height)` ratio terms.
    pub fn terms(self) -> (u32, u32) {
        match self {
            Self::Story9x16 => (9, 16),
            Self::Portrait4x5 => (4, 5),
            Self::Square1x1 => (1, 1),
            Self::Wide16x9 => (16, 9),
        }
    }

    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        let (w, h) = self.terms();
        f64::from(w) / f64::from(h)
    }

    /// Whether width is the driving dimension of the container.
    pub fn is_landscape(self) -> bool {
        matches!(self, Self::Wide16x9)
    }
}

macro_rules! impl_id_parse {
    ($ty:ty, $what:literal, |$s:ident| $extra:expr) => {
        impl FromStr for $ty {
            type Err = CardError;

            fn from_str(raw: &str) -> CardResult<Self> {
                let $s = raw.trim();
                if let Some(v) = <$ty>::ALL.into_iter().find(|v| v.id().eq_ignore_ascii_case($s)) {
                    return Ok(v);
                }
                let extra: Option<$ty> = $extra;
                extra.ok_or_else(|| {
                    CardError::validation(format!("unknown {} '{}'", $what, raw))
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.id())
            }
        }

        /// Unknown values fall back to the default variant.
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(raw.parse().unwrap_or_else(|_| {
                    tracing::debug!(value = %raw, "unknown {}; using default", $what);
                    Self::default()
                }))
            }
        }
    };
}

impl_id_parse!(HorizontalAlign, "horizontal alignment", |_s| None);
impl_id_parse!(VerticalAlign, "vertical alignment", |_s| None);
impl_id_parse!(Theme, "theme", |_s| None);
impl_id_parse!(FontFamily, "font", |s| {
    FontFamily::ALL
        .into_iter()
        .find(|f| f.family_name().eq_ignore_ascii_case(s))
});
impl_id_parse!(AspectRatio, "aspect ratio", |s| {
    let slashed = s.replace(':', "/");
    AspectRatio::ALL.into_iter().find(|r| r.id() == slashed)
});

/// Everything needed to render one card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardConfig {
    /// Card text; `\n` starts a new line.
    pub text: String,
    /// Text size in CSS pixels.
    pub text_size: u32,
    /// Horizontal text-flow alignment.
    pub horizontal_align: HorizontalAlign,
    /// Vertical anchoring of the text block.
    pub vertical_align: VerticalAlign,
    /// Reserved; carried but not consumed by rendering.
    pub padding: u32,
    /// Theme (colors and decoration).
    pub theme: Theme,
    /// Display font.
    pub font: FontFamily,
    /// Card aspect ratio.
    pub aspect_ratio: AspectRatio,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            text: "Not a\nbootcamp.".to_string(),
            text_size: 24,
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Center,
            padding: 32,
            theme: Theme::Pacman,
            font: FontFamily::Arcade,
            aspect_ratio: AspectRatio::Story9x16,
        }
    }
}

/// Partial replacement of a [`CardConfig`]. `None` fields keep the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub text: Option<String>,
    pub text_size: Option<u32>,
    pub horizontal_align: Option<HorizontalAlign>,
    pub vertical_align: Option<VerticalAlign>,
    pub padding: Option<u32>,
    pub theme: Option<Theme>,
    pub font: Option<FontFamily>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl CardConfig {
    /// Return a new configuration with the patch's fields replaced.
    pub fn apply(&self, patch: ConfigPatch) -> Self {
        Self {
            text: patch.text.unwrap_or_else(|| self.text.clone()),
            text_size: patch.text_size.unwrap_or(self.text_size),
            horizontal_align: patch.horizontal_align.unwrap_or(self.horizontal_align),
            vertical_align: patch.vertical_align.unwrap_or(self.vertical_align),
            padding: patch.padding.unwrap_or(self.padding),
            theme: patch.theme.unwrap_or(self.theme),
            font: patch.font.unwrap_or(self.font),
            aspect_ratio: patch.aspect_ratio.unwrap_or(self.aspect_ratio),
        }
    }

    /// Replace the text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Replace the text size.
    pub fn with_text_size(&self, text_size: u32) -> Self {
        Self {
            text_size,
            ..self.clone()
        }
    }

    /// Replace the horizontal alignment.
    pub fn with_horizontal_align(&self, horizontal_align: HorizontalAlign) -> Self {
        Self {
            horizontal_align,
            ..self.clone()
        }
    }

    /// Replace the vertical alignment.
    pub fn with_vertical_align(&self, vertical_align: VerticalAlign) -> Self {
        Self {
            vertical_align,
            ..self.clone()
        }
    }

    /// Replace the reserved padding value.
    pub fn with_padding(&self, padding: u32) -> Self {
        Self {
            padding,
            ..self.clone()
        }
    }

    /// Replace the theme.
    pub fn with_theme(&self, theme: Theme) -> Self {
        Self {
            theme,
            ..self.clone()
        }
    }

    /// Replace the font.
    pub fn with_font(&self, font: FontFamily) -> Self {
        Self {
            font,
            ..self.clone()
        }
    }

    /// Replace the aspect ratio.
    pub fn with_aspect_ratio(&self, aspect_ratio: AspectRatio) -> Self {
        Self {
            aspect_ratio,
            ..self.clone()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> CardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &std::path::Path) -> CardResult<Self> {
        use anyhow::Context as _;
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read card config '{}'", path.display()))?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;

use std::str::FromStr;

use crate::config::model::{
    AspectRatio, ConfigPatch, FontFamily, HorizontalAlign, TEXT_SIZE_MAX, TEXT_SIZE_MIN, Theme,
    VerticalAlign,
};
use crate::foundation::error::CardError;

/// One field change coming from a control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    Text(String),
    /// Raw slider value; clamped when applied.
    TextSize(i64),
    HorizontalAlign(HorizontalAlign),
    VerticalAlign(VerticalAlign),
    Padding(u32),
    Theme(Theme),
    Font(FontFamily),
    AspectRatio(AspectRatio),
}

/// Clamp a raw size to the slider range.
pub fn clamp_text_size(raw: i64) -> u32 {
    raw.clamp(i64::from(TEXT_SIZE_MIN), i64::from(TEXT_SIZE_MAX)) as u32
}

impl Edit {
    /// Field name as it appears in card JSON.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::TextSize(_) => "textSize",
            Self::HorizontalAlign(_) => "horizontalAlign",
            Self::VerticalAlign(_) => "verticalAlign",
            Self::Padding(_) => "padding",
            Self::Theme(_) => "theme",
            Self::Font(_) => "font",
            Self::AspectRatio(_) => "aspectRatio",
        }
    }

    /// Single-field patch, with the size already clamped.
    pub fn into_patch(self) -> ConfigPatch {
        let mut patch = ConfigPatch::default();
        match self {
            Self::Text(v) => patch.text = Some(v),
            Self::TextSize(v) => patch.text_size = Some(clamp_text_size(v)),
            Self::HorizontalAlign(v) => patch.horizontal_align = Some(v),
            Self::VerticalAlign(v) => patch.vertical_align = Some(v),
            Self::Padding(v) => patch.padding = Some(v),
            Self::Theme(v) => patch.theme = Some(v),
            Self::Font(v) => patch.font = Some(v),
            Self::AspectRatio(v) => patch.aspect_ratio = Some(v),
        }
        patch
    }
}

/// `field=value`. Field names accept camelCase, snake_case and the control labels
/// (`size`, `align`, `position`, `format`). A literal `\n` in text values becomes a newline.
impl FromStr for Edit {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| CardError::validation(format!("expected field=value, got '{s}'")))?;
        let key = key.trim().to_ascii_lowercase().replace(['_', '-', ' '], "");

        let edit = match key.as_str() {
            "text" | "content" => Self::Text(value.replace("\\n", "\n")),
            "textsize" | "size" => Self::TextSize(value.trim().parse().map_err(|_| {
                CardError::validation(format!("text size must be an integer, got '{value}'"))
            })?),
            "horizontalalign" | "textalign" | "align" => Self::HorizontalAlign(value.trim().parse()?),
            "verticalalign" | "verticalposition" | "position" => {
                Self::VerticalAlign(value.trim().parse()?)
            }
            "padding" => Self::Padding(value.trim().parse().map_err(|_| {
                CardError::validation(format!("padding must be a non-negative integer, got '{value}'"))
            })?),
            "theme" => Self::Theme(value.trim().parse()?),
            "font" | "fontfamily" => Self::Font(value.trim().parse()?),
            "aspectratio" | "ratio" | "format" => Self::AspectRatio(value.trim().parse()?),
            other => {
                return Err(CardError::validation(format!("unknown card field '{other}'")));
            }
        };
        Ok(edit)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/panel/edit.rs"]
mod tests;

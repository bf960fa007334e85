//! Control panel: a serializable description of every control and the edit path back into a
//! [`CardConfig`].

pub mod edit;

pub use edit::{Edit, clamp_text_size};

use crate::config::model::{
    AspectRatio, CardConfig, FontFamily, HorizontalAlign, TEXT_SIZE_MAX, TEXT_SIZE_MIN, Theme,
    VerticalAlign,
};
use crate::export::state::RecordingStatus;

/// Export button label while idle.
pub const EXPORT_LABEL_IDLE: &str = "Export HD Video";
/// Export button label during any active export.
pub const EXPORT_LABEL_BUSY: &str = "Recording...";

/// One selectable option of a picker.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    /// Color chip shown next to the label (theme picker only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swatch: Option<String>,
}

/// A control in the sidebar, in display order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Picker {
        field: &'static str,
        label: &'static str,
        options: Vec<ChoiceOption>,
        selected: String,
    },
    TextArea {
        field: &'static str,
        label: &'static str,
        value: String,
    },
    Slider {
        field: &'static str,
        label: &'static str,
        min: u32,
        max: u32,
        value: u32,
        display: String,
    },
}

impl Control {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Picker { field, .. } | Self::TextArea { field, .. } | Self::Slider { field, .. } => {
                *field
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExportButton {
    pub label: &'static str,
    pub disabled: bool,
}

/// Everything the sidebar shows.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PanelView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub controls: Vec<Control>,
    pub export: ExportButton,
}

impl PanelView {
    pub fn control(&self, field: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.field() == field)
    }
}

fn options<T: Copy>(
    all: impl IntoIterator<Item = T>,
    id: impl Fn(T) -> &'static str,
    label: impl Fn(T) -> &'static str,
) -> Vec<ChoiceOption> {
    all.into_iter()
        .map(|v| ChoiceOption {
            id: id(v).to_string(),
            label: label(v).to_string(),
            swatch: None,
        })
        .collect()
}

/// Stateless view/edit logic for the sidebar.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanel;

impl ControlPanel {
    /// Describe every control for `config`.
    pub fn describe(config: &CardConfig, status: RecordingStatus) -> PanelView {
        let themes = Theme::ALL
            .into_iter()
            .map(|t| ChoiceOption {
                id: t.id().to_string(),
                label: t.label().to_string(),
                swatch: Some(t.color().css_hex()),
            })
            .collect();

        let controls = vec![
            Control::Picker {
                field: "theme",
                label: "Theme",
                options: themes,
                selected: config.theme.id().to_string(),
            },
            Control::Picker {
                field: "aspectRatio",
                label: "Format",
                options: options(AspectRatio::ALL, AspectRatio::id, AspectRatio::label),
                selected: config.aspect_ratio.id().to_string(),
            },
            Control::TextArea {
                field: "text",
                label: "Content",
                value: config.text.clone(),
            },
            Control::Picker {
                field: "font",
                label: "Font",
                options: options(FontFamily::ALL, FontFamily::id, FontFamily::label),
                selected: config.font.id().to_string(),
            },
            Control::Slider {
                field: "textSize",
                label: "Size",
                min: TEXT_SIZE_MIN,
                max: TEXT_SIZE_MAX,
                value: config.text_size,
                display: format!("{}px", config.text_size),
            },
            Control::Picker {
                field: "verticalAlign",
                label: "Vertical Position",
                options: options(VerticalAlign::ALL, VerticalAlign::id, VerticalAlign::id),
                selected: config.vertical_align.id().to_string(),
            },
            Control::Picker {
                field: "horizontalAlign",
                label: "Text Align",
                options: options(HorizontalAlign::ALL, HorizontalAlign::id, HorizontalAlign::id),
                selected: config.horizontal_align.id().to_string(),
            },
        ];

        let idle = !status.is_active();
        PanelView {
            title: "Settings",
            subtitle: "Customize your animation card",
            controls,
            export: ExportButton {
                label: if idle {
                    EXPORT_LABEL_IDLE
                } else {
                    EXPORT_LABEL_BUSY
                },
                disabled: !idle,
            },
        }
    }

    /// New configuration with one field replaced.
    pub fn apply(config: &CardConfig, edit: Edit) -> CardConfig {
        tracing::trace!(field = edit.field(), "panel edit");
        config.apply(edit.into_patch())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/panel/mod.rs"]
mod tests;

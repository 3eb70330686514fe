//! Named page-size presets plus the "custom" mode.
//!
//! Selecting a named preset overwrites the whole layout. Selecting custom
//! only reveals the width/height/margin fields so the current values can be
//! edited by hand. The preset shown to the user is derived from the layout's
//! width and height; anything without an exact match is custom.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{PageLayout, PageUnit, Side, Spacing};
use crate::state::EditorState;

/// A named, fixed page size and margin combination, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutPreset {
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
    pub margin: Spacing,
}

impl LayoutPreset {
    pub fn layout(&self) -> PageLayout {
        PageLayout {
            width: self.width,
            height: self.height,
            unit: PageUnit::Mm,
            margin: self.margin,
        }
    }

    fn matches(&self, layout: &PageLayout) -> bool {
        layout.width == self.width && layout.height == self.height
    }
}

pub const A4: LayoutPreset = LayoutPreset {
    name: "A4",
    width: 210.0,
    height: 297.0,
    margin: Spacing::uniform(10.0),
};

pub const A5: LayoutPreset = LayoutPreset {
    name: "A5",
    width: 148.0,
    height: 210.0,
    margin: Spacing::uniform(8.0),
};

pub static PRESETS: [LayoutPreset; 2] = [A4, A5];

/// Layout a new template starts with.
pub const DEFAULT_PRESET: LayoutPreset = A4;

/// Name shown for layouts that match no preset.
pub const CUSTOM: &str = "Custom";

/// What the preset picker is set to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresetChoice {
    Named(&'static LayoutPreset),
    Custom,
}

impl PresetChoice {
    pub fn name(&self) -> &'static str {
        match self {
            PresetChoice::Named(p) => p.name,
            PresetChoice::Custom => CUSTOM,
        }
    }
}

/// Derive the active preset from the layout's page size.
pub fn active_preset(layout: &PageLayout) -> PresetChoice {
    PRESETS
        .iter()
        .find(|p| p.matches(layout))
        .map(PresetChoice::Named)
        .unwrap_or(PresetChoice::Custom)
}

/// Apply a picker choice to the editor.
///
/// A named preset overwrites width, height and margins. Custom leaves the
/// layout alone and only reveals the manual fields.
pub fn select_preset(editor: &mut EditorState, choice: PresetChoice) -> Result<(), AppError> {
    match choice {
        PresetChoice::Named(preset) => {
            editor.set_layout(preset.layout())?;
            editor.set_custom_fields(false);
        }
        PresetChoice::Custom => editor.set_custom_fields(true),
    }
    tracing::debug!(preset = choice.name(), "page preset selected");
    Ok(())
}

/// A manually editable layout value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutField {
    Width,
    Height,
    Margin(Side),
}

/// Set one layout value (in mm) from the custom fields.
pub fn edit_layout_field(
    editor: &mut EditorState,
    field: LayoutField,
    value: f64,
) -> Result<(), AppError> {
    let mut layout = editor.template().layout;
    match field {
        LayoutField::Width => layout.width = value,
        LayoutField::Height => layout.height = value,
        LayoutField::Margin(side) => layout.margin = layout.margin.with(side, value),
    }
    editor.set_layout(layout)
}

//! Properties editor for the selected component.
//!
//! [`inspect`] describes the editable fields of the current selection, or a
//! placeholder when nothing is selected. [`apply_edit`] turns one field edit
//! into a single-field [`PropsPatch`] and applies it immediately.
//!
//! The field set is gated by component type: a logo exposes its image source
//! plus the sizing and spacing fields, every other type exposes text,
//! typography and the same sizing and spacing fields.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{
    Alignment, CanvasComponent, ComponentId, ComponentKind, PropsPatch, Side,
};
use crate::state::EditorState;

/// One editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyField {
    ImageSource,
    Text,
    FontSize,
    Alignment,
    Width,
    Height,
    Background,
    Padding,
    Margin(Side),
}

const LOGO_FIELDS: &[PropertyField] = &[
    PropertyField::ImageSource,
    PropertyField::Width,
    PropertyField::Height,
    PropertyField::Background,
    PropertyField::Padding,
    PropertyField::Margin(Side::Top),
    PropertyField::Margin(Side::Right),
    PropertyField::Margin(Side::Bottom),
    PropertyField::Margin(Side::Left),
];

const TEXT_FIELDS: &[PropertyField] = &[
    PropertyField::Text,
    PropertyField::FontSize,
    PropertyField::Alignment,
    PropertyField::Width,
    PropertyField::Height,
    PropertyField::Background,
    PropertyField::Padding,
    PropertyField::Margin(Side::Top),
    PropertyField::Margin(Side::Right),
    PropertyField::Margin(Side::Bottom),
    PropertyField::Margin(Side::Left),
];

/// Fields exposed for a component type, in display order.
pub fn fields_for(kind: ComponentKind) -> &'static [PropertyField] {
    if kind.is_text_bearing() {
        TEXT_FIELDS
    } else {
        LOGO_FIELDS
    }
}

/// Current value of a field, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    Alignment(Option<Alignment>),
    Color(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub field: PropertyField,
    pub value: FieldValue,
}

/// What the properties panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PropertiesPanel {
    /// Nothing is selected.
    Placeholder,
    Editing {
        component_id: ComponentId,
        kind: ComponentKind,
        fields: Vec<FieldView>,
    },
}

fn field_value(component: &CanvasComponent, field: PropertyField) -> FieldValue {
    let style = component.props.style();
    match field {
        PropertyField::ImageSource => {
            FieldValue::Text(component.props.image_url().unwrap_or_default().to_string())
        }
        PropertyField::Text => {
            FieldValue::Text(component.props.text().unwrap_or_default().to_string())
        }
        PropertyField::FontSize => FieldValue::Number(style.font_size),
        PropertyField::Alignment => FieldValue::Alignment(style.alignment),
        PropertyField::Width => FieldValue::Number(style.width),
        PropertyField::Height => FieldValue::Number(style.height),
        PropertyField::Background => FieldValue::Color(style.background.clone()),
        PropertyField::Padding => FieldValue::Number(style.padding),
        PropertyField::Margin(side) => FieldValue::Number(Some(style.margin.get(side))),
    }
}

/// Describe the properties panel for the current selection.
pub fn inspect(editor: &EditorState) -> PropertiesPanel {
    let Some(component) = editor.selected_component() else {
        return PropertiesPanel::Placeholder;
    };
    let kind = component.kind();
    PropertiesPanel::Editing {
        component_id: component.id.clone(),
        kind,
        fields: fields_for(kind)
            .iter()
            .map(|&field| FieldView {
                field,
                value: field_value(component, field),
            })
            .collect(),
    }
}

/// A single edited field and its new value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    ImageSource(String),
    Text(String),
    FontSize(f64),
    Alignment(Alignment),
    Width(f64),
    Height(f64),
    Background(String),
    Padding(f64),
    Margin(Side, f64),
}

impl FieldEdit {
    pub fn field(&self) -> PropertyField {
        match self {
            FieldEdit::ImageSource(_) => PropertyField::ImageSource,
            FieldEdit::Text(_) => PropertyField::Text,
            FieldEdit::FontSize(_) => PropertyField::FontSize,
            FieldEdit::Alignment(_) => PropertyField::Alignment,
            FieldEdit::Width(_) => PropertyField::Width,
            FieldEdit::Height(_) => PropertyField::Height,
            FieldEdit::Background(_) => PropertyField::Background,
            FieldEdit::Padding(_) => PropertyField::Padding,
            FieldEdit::Margin(side, _) => PropertyField::Margin(*side),
        }
    }

    fn into_patch(self, component: &CanvasComponent) -> PropsPatch {
        let mut patch = PropsPatch::default();
        match self {
            FieldEdit::ImageSource(v) => patch.image_url = Some(v),
            FieldEdit::Text(v) => patch.text = Some(v),
            FieldEdit::FontSize(v) => patch.font_size = Some(v),
            FieldEdit::Alignment(v) => patch.alignment = Some(v),
            FieldEdit::Width(v) => patch.width = Some(v),
            FieldEdit::Height(v) => patch.height = Some(v),
            FieldEdit::Background(v) => patch.background = Some(v),
            FieldEdit::Padding(v) => patch.padding = Some(v),
            FieldEdit::Margin(side, v) => {
                patch.margin = Some(component.props.style().margin.with(side, v));
            }
        }
        patch
    }
}

/// Apply `edit` to the selected component.
///
/// Returns `Ok(None)` without changing anything when nothing is selected, and
/// [`AppError::InvalidInput`] when the field is not exposed for the selected
/// component's type.
pub fn apply_edit(
    editor: &mut EditorState,
    edit: FieldEdit,
) -> Result<Option<CanvasComponent>, AppError> {
    let Some(component) = editor.selected_component() else {
        return Ok(None);
    };
    let kind = component.kind();
    let field = edit.field();
    if !fields_for(kind).contains(&field) {
        return Err(AppError::InvalidInput(format!(
            "{field:?} is not editable on {kind} components"
        )));
    }

    let id = component.id.clone();
    let patch = edit.into_patch(component);
    let updated = editor.update_component_props(&id, &patch)?;
    tracing::debug!(%id, ?field, "property edited");
    Ok(Some(updated.clone()))
}
